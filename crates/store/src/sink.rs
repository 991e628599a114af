//! The `DocumentSink` trait.

use async_trait::async_trait;

use crate::error::StoreResult;

/// Destination for rendered documents (delivery notes). Saving is
/// fire-and-forget from the engine's point of view; a sink failure is
/// reported but triggers no retry.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn save(&self, filename: &str, bytes: &[u8]) -> StoreResult<()>;
}
