//! Order commands: create, edit, delete, duplicate, merge, invoice.
//!
//! Every command validates before touching the store, writes through the
//! [`RecordStore`], then refreshes the ledger. Commands run sequentially;
//! there is no transaction spanning multiple writes, so a multi-step
//! command that fails midway leaves earlier writes in place and reports
//! the failure.

use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use sesamo_clients::{OrderSnapshot, SnapshotLine};
use sesamo_core::{ClientId, DomainError, DomainResult, ItemId, OrderId, round_cents};
use sesamo_invoicing::{InvoiceDocument, render};
use sesamo_orders::{
    DraftLine, Order, OrderDraft, OrderLine, OrderStatus, combine_lines, compute_discount,
    merge_notes,
};
use sesamo_store::{DocumentSink, RecordStore};

use crate::ledger::OrderLedger;

/// Command layer over a record store and a document sink.
pub struct OrderService {
    store: Arc<dyn RecordStore>,
    sink: Arc<dyn DocumentSink>,
    ledger: RwLock<OrderLedger>,
}

impl OrderService {
    pub fn new(store: Arc<dyn RecordStore>, sink: Arc<dyn DocumentSink>) -> Self {
        Self {
            store,
            sink,
            ledger: RwLock::new(OrderLedger::default()),
        }
    }

    /// Re-read all three collections from the store and replace the
    /// ledger with the result.
    pub async fn refresh(&self) -> DomainResult<()> {
        let clients = self.store.list_clients().await?;
        let items = self.store.list_items().await?;
        let orders = self.store.list_orders().await?;
        let mut ledger = self
            .ledger
            .write()
            .map_err(|_| DomainError::store("ledger lock poisoned"))?;
        *ledger = OrderLedger { clients, items, orders };
        Ok(())
    }

    /// Current ledger snapshot.
    pub fn ledger(&self) -> DomainResult<OrderLedger> {
        Ok(self
            .ledger
            .read()
            .map_err(|_| DomainError::store("ledger lock poisoned"))?
            .clone())
    }

    /// Validate a draft and persist it as a new pending order. The cached
    /// total is the discounted final total of the priced lines.
    pub async fn create_order(&self, draft: OrderDraft) -> DomainResult<Order> {
        let (client_id, delivery_date) = draft.validate()?;
        let ledger = self.ledger()?;
        if ledger.client(client_id).is_none() {
            return Err(DomainError::not_found());
        }
        let lines = price_lines(&ledger, &draft.lines)?;
        let subtotal = round_cents(lines.iter().map(OrderLine::line_total).sum());
        let order = Order {
            id: OrderId::new(),
            client_id,
            lines,
            delivery_date,
            status: OrderStatus::Pending,
            notes: draft.notes,
            total: compute_discount(subtotal).final_total,
            created_at: Utc::now(),
        };
        self.store.insert_order(order.clone()).await?;
        self.remember_snapshot(&order).await;
        self.refresh_best_effort().await;
        info!(order_id = %order.id, client_id = %client_id, total = order.total, "order created");
        Ok(order)
    }

    /// Replace an existing order's client, delivery date, notes and the
    /// entire line set. Status and creation time are preserved.
    pub async fn update_order(&self, id: OrderId, draft: OrderDraft) -> DomainResult<Order> {
        let (client_id, delivery_date) = draft.validate()?;
        let ledger = self.ledger()?;
        let existing = ledger.order(id).ok_or(DomainError::NotFound)?.clone();
        let lines = price_lines(&ledger, &draft.lines)?;
        let subtotal = round_cents(lines.iter().map(OrderLine::line_total).sum());
        let order = Order {
            id,
            client_id,
            lines,
            delivery_date,
            status: existing.status,
            notes: draft.notes,
            total: compute_discount(subtotal).final_total,
            created_at: existing.created_at,
        };
        self.store.update_order(order.clone()).await?;
        self.remember_snapshot(&order).await;
        self.refresh_best_effort().await;
        info!(order_id = %order.id, total = order.total, "order updated");
        Ok(order)
    }

    /// Remove an order and its lines. Allowed from any status.
    pub async fn delete_order(&self, id: OrderId) -> DomainResult<()> {
        self.store.delete_order(id).await?;
        self.refresh_best_effort().await;
        info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Combine two or more orders of one client into a fresh order with
    /// status `merge`, and mark the sources delivered.
    ///
    /// The merged total is the raw line sum; no discount is applied.
    /// Source-status updates happen after the merged order is persisted;
    /// a failure there leaves the merged order in place and is surfaced
    /// to the caller.
    pub async fn merge_orders(
        &self,
        order_ids: &[OrderId],
        delivery_date: NaiveDate,
    ) -> DomainResult<Order> {
        let ledger = self.ledger()?;
        // An id listed twice is still one source order.
        let mut unique_ids: Vec<OrderId> = Vec::new();
        for id in order_ids {
            if !unique_ids.contains(id) {
                unique_ids.push(*id);
            }
        }
        let sources: Vec<Order> = unique_ids
            .iter()
            .filter_map(|id| ledger.order(*id).cloned())
            .collect();
        if sources.len() < 2 {
            return Err(DomainError::precondition(
                "merging requires at least two distinct existing orders",
            ));
        }
        let client_id = sources[0].client_id;
        if sources.iter().any(|o| o.client_id != client_id) {
            return Err(DomainError::precondition(
                "orders of different clients cannot be merged",
            ));
        }
        for source in &sources {
            source.status.transition(OrderStatus::Delivered)?;
        }

        let lines = combine_lines(&sources);
        let total = round_cents(lines.iter().map(OrderLine::line_total).sum());
        let source_ids: Vec<OrderId> = sources.iter().map(|o| o.id).collect();
        let merged = Order {
            id: OrderId::new(),
            client_id,
            lines,
            delivery_date,
            status: OrderStatus::Merge,
            notes: merge_notes(&source_ids),
            total,
            created_at: Utc::now(),
        };
        self.store.insert_order(merged.clone()).await?;

        let mut first_failure: Option<DomainError> = None;
        for id in &source_ids {
            if let Err(err) = self
                .store
                .update_order_status(*id, OrderStatus::Delivered)
                .await
            {
                warn!(order_id = %id, error = %err, "source status update failed after merge");
                first_failure.get_or_insert(err.into());
            }
        }
        self.refresh_best_effort().await;
        if let Some(err) = first_failure {
            return Err(err);
        }
        info!(order_id = %merged.id, sources = source_ids.len(), total = merged.total, "orders merged");
        Ok(merged)
    }

    /// Render the delivery note for an order and save it to the document
    /// sink. A pending order is confirmed once the document is saved.
    pub async fn download_invoice(&self, order_id: OrderId) -> DomainResult<InvoiceDocument> {
        let ledger = self.ledger()?;
        let order = ledger.order(order_id).ok_or(DomainError::NotFound)?.clone();
        let client = ledger
            .client(order.client_id)
            .ok_or(DomainError::NotFound)?
            .clone();
        let lines = ledger.resolve_invoice_lines(&order);
        let doc = render(&order, &client, &lines);
        self.sink.save(&doc.filename, &doc.bytes).await?;
        if order.status == OrderStatus::Pending {
            let next = order.status.transition(OrderStatus::Confirmed)?;
            self.store.update_order_status(order.id, next).await?;
            self.refresh_best_effort().await;
        }
        info!(order_id = %order.id, filename = %doc.filename, "invoice rendered");
        Ok(doc)
    }

    /// Draft pre-filled from the client's remembered last order. Reads
    /// only; nothing is persisted until the draft is submitted.
    pub async fn duplicate_last_order(&self, client_id: ClientId) -> DomainResult<OrderDraft> {
        let ledger = self.ledger()?;
        let client = ledger.client(client_id).ok_or(DomainError::NotFound)?;
        let snapshot = client.last_order.as_ref().ok_or_else(|| {
            DomainError::precondition("client has no remembered order to duplicate")
        })?;
        Ok(OrderDraft {
            client_id: Some(client_id),
            delivery_date: None,
            lines: snapshot
                .lines
                .iter()
                .map(|l| DraftLine { item_id: l.item_id, quantity: l.quantity })
                .collect(),
            notes: snapshot.notes.clone(),
        })
    }

    /// Add one unit of an item to the client's open pending order,
    /// creating a same-day pending order when there is none.
    pub async fn add_to_cart(&self, client_id: ClientId, item_id: ItemId) -> DomainResult<Order> {
        let ledger = self.ledger()?;
        if ledger.client(client_id).is_none() {
            return Err(DomainError::not_found());
        }
        let price = ledger
            .item(item_id)
            .map(|item| item.price)
            .ok_or_else(|| DomainError::validation("unknown catalog item"))?;

        let open = ledger
            .orders_for_client(client_id)
            .into_iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .max_by_key(|o| o.created_at)
            .cloned();

        let order = match open {
            Some(mut order) => {
                match order.lines.iter_mut().find(|l| l.item_id == item_id) {
                    Some(line) => line.quantity += 1,
                    None => order
                        .lines
                        .push(OrderLine { item_id, quantity: 1, price }),
                }
                order.total = compute_discount(order.subtotal()).final_total;
                self.store.update_order(order.clone()).await?;
                order
            }
            None => {
                let order = Order {
                    id: OrderId::new(),
                    client_id,
                    lines: vec![OrderLine { item_id, quantity: 1, price }],
                    delivery_date: Utc::now().date_naive(),
                    status: OrderStatus::Pending,
                    notes: String::new(),
                    total: compute_discount(price).final_total,
                    created_at: Utc::now(),
                };
                self.store.insert_order(order.clone()).await?;
                order
            }
        };
        self.refresh_best_effort().await;
        info!(order_id = %order.id, item_id = %item_id, "item added to cart");
        Ok(order)
    }

    /// Remember the order on its client so a follow-up order can be
    /// pre-filled. Best effort; a failure is logged, never fatal.
    async fn remember_snapshot(&self, order: &Order) {
        let snapshot = OrderSnapshot {
            lines: order
                .lines
                .iter()
                .map(|l| SnapshotLine {
                    item_id: l.item_id,
                    quantity: l.quantity,
                    price: l.price,
                })
                .collect(),
            notes: order.notes.clone(),
        };
        if let Err(err) = self
            .store
            .update_client_last_order(order.client_id, snapshot)
            .await
        {
            warn!(client_id = %order.client_id, error = %err, "last-order snapshot not saved");
        }
    }

    async fn refresh_best_effort(&self) {
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "ledger refresh failed; projection is stale");
        }
    }
}

/// Resolve draft lines against the catalog, capturing current prices.
fn price_lines(ledger: &OrderLedger, lines: &[DraftLine]) -> DomainResult<Vec<OrderLine>> {
    lines
        .iter()
        .map(|line| {
            let item = ledger.item(line.item_id).ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown catalog item {}",
                    line.item_id.short()
                ))
            })?;
            Ok(OrderLine {
                item_id: line.item_id,
                quantity: line.quantity,
                price: item.price,
            })
        })
        .collect()
}
