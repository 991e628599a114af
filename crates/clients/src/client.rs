//! Client entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sesamo_core::{ClientId, DomainError, DomainResult, ItemId};

/// One line of a remembered order (item reference, quantity, unit price at
/// the time the order was submitted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLine {
    pub item_id: ItemId,
    pub quantity: u32,
    pub price: f64,
}

/// Snapshot of the client's most recently submitted order, kept on the
/// client record so a follow-up order can be pre-filled with one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub lines: Vec<SnapshotLine>,
    #[serde(default)]
    pub notes: String,
}

/// A client of the distribution business — the owner of orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// Free-text postal address; the invoice renderer splits it on commas.
    #[serde(default)]
    pub address: String,
    /// VAT / company registration string, printed verbatim on invoices.
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Most recently submitted order, if any. Updated on every order save.
    #[serde(default)]
    pub last_order: Option<OrderSnapshot>,
}

impl Client {
    /// Create a client record. The name is required; everything else is
    /// free text filled in as the relationship develops.
    pub fn new(id: ClientId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("client name must not be empty"));
        }
        Ok(Self {
            id,
            name,
            address: String::new(),
            tax_id: String::new(),
            phone: String::new(),
            email: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
            last_order: None,
        })
    }

    /// Replace the remembered last order.
    pub fn remember_order(&mut self, snapshot: OrderSnapshot) {
        self.last_order = Some(snapshot);
    }
}
