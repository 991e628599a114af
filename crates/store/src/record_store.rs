//! The `RecordStore` trait.

use async_trait::async_trait;

use sesamo_catalog::Item;
use sesamo_clients::{Client, OrderSnapshot};
use sesamo_core::{ClientId, ItemId, OrderId};
use sesamo_orders::{Order, OrderStatus};

use crate::error::StoreResult;

/// Persistence boundary for the three record collections.
///
/// Identifiers are generated caller-side; inserts never assign ids.
/// Deleting an order cascades to its lines. Deleting an item does not
/// cascade into orders that reference it; callers refresh any
/// denormalized display instead.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All clients, newest first.
    async fn list_clients(&self) -> StoreResult<Vec<Client>>;
    async fn insert_client(&self, client: Client) -> StoreResult<()>;
    async fn update_client(&self, client: Client) -> StoreResult<()>;
    async fn delete_client(&self, id: ClientId) -> StoreResult<()>;
    /// Replace the client's remembered last order without touching the
    /// rest of the record.
    async fn update_client_last_order(
        &self,
        id: ClientId,
        snapshot: OrderSnapshot,
    ) -> StoreResult<()>;

    /// All catalog items, sorted by name.
    async fn list_items(&self) -> StoreResult<Vec<Item>>;
    async fn insert_item(&self, item: Item) -> StoreResult<()>;
    async fn update_item(&self, item: Item) -> StoreResult<()>;
    async fn delete_item(&self, id: ItemId) -> StoreResult<()>;

    /// All orders with their lines embedded, newest first.
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
    async fn insert_order(&self, order: Order) -> StoreResult<()>;
    /// Replaces the whole record including the line set.
    async fn update_order(&self, order: Order) -> StoreResult<()>;
    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> StoreResult<()>;
    async fn delete_order(&self, id: OrderId) -> StoreResult<()>;
}
