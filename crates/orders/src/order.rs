//! Order entity and order drafts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use sesamo_core::{ClientId, DomainError, DomainResult, ItemId, OrderId, round_cents};

use crate::status::OrderStatus;

/// One line of an order.
///
/// The unit price is captured when the line is created and never follows
/// later catalog price changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: u32,
    pub price: f64,
}

impl OrderLine {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// An order placed by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: ClientId,
    pub lines: Vec<OrderLine>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    #[serde(default)]
    pub notes: String,
    /// Cached total as of the last save. For regular orders this is the
    /// discount-adjusted final total; orders created by merging cache the
    /// raw line sum instead.
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Raw sum of `price × quantity` over all lines, before any discount.
    pub fn subtotal(&self) -> f64 {
        round_cents(self.lines.iter().map(OrderLine::line_total).sum())
    }
}

/// One line of an order form: item reference plus quantity. The unit price
/// is resolved from the catalog when the draft is turned into an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// An order form as filled in so far. Everything is optional until
/// [`OrderDraft::validate`] checks it as a whole; validation runs before
/// any store write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub client_id: Option<ClientId>,
    pub delivery_date: Option<NaiveDate>,
    pub lines: Vec<DraftLine>,
    #[serde(default)]
    pub notes: String,
}

impl OrderDraft {
    /// Check the draft is complete: a client, a delivery date, at least one
    /// line, every quantity at least 1 and no item listed twice.
    pub fn validate(&self) -> DomainResult<(ClientId, NaiveDate)> {
        let client_id = self
            .client_id
            .ok_or_else(|| DomainError::validation("order requires a client"))?;
        let delivery_date = self
            .delivery_date
            .ok_or_else(|| DomainError::validation("order requires a delivery date"))?;
        if self.lines.is_empty() {
            return Err(DomainError::validation("order requires at least one line"));
        }
        let mut seen = HashSet::new();
        for line in &self.lines {
            if line.quantity < 1 {
                return Err(DomainError::validation(
                    "order line quantity must be at least 1",
                ));
            }
            if !seen.insert(line.item_id) {
                return Err(DomainError::validation(format!(
                    "item {} appears on more than one line",
                    line.item_id.short()
                )));
            }
        }
        Ok((client_id, delivery_date))
    }
}
