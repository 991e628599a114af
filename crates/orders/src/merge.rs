//! Pure order-merge combination.
//!
//! Only the line/notes arithmetic lives here; fetching the source orders,
//! the same-client check and the status transitions are orchestrated by
//! the order service.

use sesamo_core::OrderId;

use crate::order::{Order, OrderLine};

/// Combine the lines of several orders into one line set.
///
/// Quantities accumulate per item id. When the same item appears at
/// different unit prices, the price of the first order listing it wins.
/// Lines keep the order in which their item was first seen.
pub fn combine_lines(orders: &[Order]) -> Vec<OrderLine> {
    let mut combined: Vec<OrderLine> = Vec::new();
    for order in orders {
        for line in &order.lines {
            match combined.iter_mut().find(|c| c.item_id == line.item_id) {
                Some(existing) => existing.quantity += line.quantity,
                None => combined.push(line.clone()),
            }
        }
    }
    combined
}

/// Provenance note for a merged order: the short form of every source id.
pub fn merge_notes(source_ids: &[OrderId]) -> String {
    let shorts: Vec<String> = source_ids.iter().map(OrderId::short).collect();
    format!("Merged from orders: {}", shorts.join(", "))
}
