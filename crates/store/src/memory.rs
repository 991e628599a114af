//! In-memory store and sink for tests and development.

use std::collections::HashMap;
use std::sync::{
    RwLock, RwLockReadGuard, RwLockWriteGuard,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;

use sesamo_catalog::Item;
use sesamo_clients::{Client, OrderSnapshot};
use sesamo_core::{ClientId, ItemId, OrderId};
use sesamo_orders::{Order, OrderLine, OrderStatus};

use crate::error::{StoreError, StoreResult};
use crate::record_store::RecordStore;
use crate::sink::DocumentSink;

#[derive(Debug, Default)]
struct Tables {
    clients: HashMap<ClientId, Client>,
    items: HashMap<ItemId, Item>,
    /// Order headers; lines live in their own table so cascade behavior
    /// is observable.
    orders: HashMap<OrderId, Order>,
    lines: HashMap<OrderId, Vec<OrderLine>>,
}

/// `RecordStore` over process-local hash maps.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a backend error. Used to
    /// exercise partial-failure paths in multi-step operations.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of line rows stored for `id`; zero after a cascade delete.
    pub fn line_rows(&self, id: OrderId) -> usize {
        match self.read() {
            Ok(tables) => tables.lines.get(&id).map(Vec::len).unwrap_or(0),
            Err(_) => 0,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated backend failure".into()));
        }
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let tables = self.read()?;
        let mut clients: Vec<Client> = tables.clients.values().cloned().collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    async fn insert_client(&self, client: Client) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.clients.insert(client.id, client);
        Ok(())
    }

    async fn update_client(&self, client: Client) -> StoreResult<()> {
        let mut tables = self.write()?;
        if !tables.clients.contains_key(&client.id) {
            return Err(StoreError::NotFound);
        }
        tables.clients.insert(client.id, client);
        Ok(())
    }

    async fn delete_client(&self, id: ClientId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.clients.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn update_client_last_order(
        &self,
        id: ClientId,
        snapshot: OrderSnapshot,
    ) -> StoreResult<()> {
        let mut tables = self.write()?;
        let client = tables.clients.get_mut(&id).ok_or(StoreError::NotFound)?;
        client.last_order = Some(snapshot);
        Ok(())
    }

    async fn list_items(&self) -> StoreResult<Vec<Item>> {
        let tables = self.read()?;
        let mut items: Vec<Item> = tables.items.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn insert_item(&self, item: Item) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.items.insert(item.id, item);
        Ok(())
    }

    async fn update_item(&self, item: Item) -> StoreResult<()> {
        let mut tables = self.write()?;
        if !tables.items.contains_key(&item.id) {
            return Err(StoreError::NotFound);
        }
        tables.items.insert(item.id, item);
        Ok(())
    }

    async fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.items.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        let tables = self.read()?;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .map(|order| {
                let mut order = order.clone();
                order.lines = tables.lines.get(&order.id).cloned().unwrap_or_default();
                order
            })
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn insert_order(&self, order: Order) -> StoreResult<()> {
        let mut tables = self.write()?;
        let mut header = order;
        let lines = core::mem::take(&mut header.lines);
        tables.lines.insert(header.id, lines);
        tables.orders.insert(header.id, header);
        Ok(())
    }

    async fn update_order(&self, order: Order) -> StoreResult<()> {
        let mut tables = self.write()?;
        if !tables.orders.contains_key(&order.id) {
            return Err(StoreError::NotFound);
        }
        let mut header = order;
        let lines = core::mem::take(&mut header.lines);
        tables.lines.insert(header.id, lines);
        tables.orders.insert(header.id, header);
        Ok(())
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> StoreResult<()> {
        let mut tables = self.write()?;
        let order = tables.orders.get_mut(&id).ok_or(StoreError::NotFound)?;
        order.status = status;
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.orders.remove(&id).ok_or(StoreError::NotFound)?;
        tables.lines.remove(&id);
        Ok(())
    }
}

/// `DocumentSink` that keeps saved documents in memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentSink {
    saved: RwLock<Vec<(String, Vec<u8>)>>,
}

impl InMemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filenames saved so far, in save order.
    pub fn filenames(&self) -> Vec<String> {
        match self.saved.read() {
            Ok(saved) => saved.iter().map(|(name, _)| name.clone()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl DocumentSink for InMemoryDocumentSink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> StoreResult<()> {
        let mut saved = self
            .saved
            .write()
            .map_err(|_| StoreError::Backend("sink lock poisoned".into()))?;
        saved.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_order(client_id: ClientId, lines: Vec<OrderLine>) -> Order {
        Order {
            id: OrderId::new(),
            client_id,
            lines,
            delivery_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            status: OrderStatus::Pending,
            notes: String::new(),
            total: 0.0,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn delete_order_cascades_to_lines() {
        let store = InMemoryRecordStore::new();
        let order = test_order(
            ClientId::new(),
            vec![OrderLine { item_id: ItemId::new(), quantity: 2, price: 10.0 }],
        );
        let id = order.id;
        store.insert_order(order).await.unwrap();
        assert_eq!(store.line_rows(id), 1);

        store.delete_order(id).await.unwrap();
        assert_eq!(store.line_rows(id), 0);
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_orders_embeds_lines() {
        let store = InMemoryRecordStore::new();
        let order = test_order(
            ClientId::new(),
            vec![OrderLine { item_id: ItemId::new(), quantity: 3, price: 7.0 }],
        );
        store.insert_order(order.clone()).await.unwrap();

        let listed = store.list_orders().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].lines, order.lines);
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = InMemoryRecordStore::new();
        let order = test_order(ClientId::new(), vec![]);
        assert_eq!(
            store.update_order(order).await.unwrap_err(),
            StoreError::NotFound
        );
        assert_eq!(
            store
                .update_order_status(OrderId::new(), OrderStatus::Confirmed)
                .await
                .unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn fail_writes_rejects_mutations_but_not_reads() {
        let store = InMemoryRecordStore::new();
        let client = Client::new(ClientId::new(), "Bistro U Lípy").unwrap();
        store.insert_client(client).await.unwrap();

        store.fail_writes(true);
        let other = Client::new(ClientId::new(), "Kavárna Sever").unwrap();
        assert!(matches!(
            store.insert_client(other).await.unwrap_err(),
            StoreError::Backend(_)
        ));
        assert_eq!(store.list_clients().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn item_listing_sorts_by_name() {
        let store = InMemoryRecordStore::new();
        for name in ["Sýr", "Chléb", "Mouka"] {
            store
                .insert_item(Item::new(ItemId::new(), name, 10.0).unwrap())
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .list_items()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Chléb", "Mouka", "Sýr"]);
    }
}
