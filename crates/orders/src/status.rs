//! Order lifecycle state machine.

use serde::{Deserialize, Serialize};

use sesamo_core::{DomainError, DomainResult};

/// Order status.
///
/// Transitions are one-directional:
/// - `pending → confirmed` when an invoice is generated (or confirmed
///   explicitly),
/// - `pending → delivered` when the order is absorbed into a merge,
/// - `merge` exists only at creation time, for orders produced by merging.
///
/// `delivered` and `merge` are terminal. Deletion is allowed from any
/// status; it is removal of the record, not a transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Merge,
    Delivered,
}

impl OrderStatus {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Delivered)
        )
    }

    /// Validated transition; fails with a precondition error when the move
    /// is not allowed by the lifecycle.
    pub fn transition(self, next: OrderStatus) -> DomainResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::precondition(format!(
                "order status cannot change from {self} to {next}"
            )))
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Merge)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Merge => "merge",
            OrderStatus::Delivered => "delivered",
        };
        f.write_str(s)
    }
}
