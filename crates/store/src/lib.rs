//! `sesamo-store` — record persistence boundary.
//!
//! The engine talks to storage through the [`RecordStore`] and
//! [`DocumentSink`] traits; the in-memory implementations back tests and
//! development.

pub mod error;
pub mod memory;
pub mod record_store;
pub mod sink;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryDocumentSink, InMemoryRecordStore};
pub use record_store::RecordStore;
pub use sink::DocumentSink;
