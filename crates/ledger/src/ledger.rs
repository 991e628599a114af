//! The order ledger: a read-side projection of the three collections.
//!
//! The ledger is replaced wholesale after the store confirms a write; it
//! is never mutated speculatively. Readers that see a stale ledger after
//! a failed refresh re-fetch authoritative state from the store.

use sesamo_catalog::Item;
use sesamo_clients::Client;
use sesamo_core::{ClientId, ItemId, OrderId, round_cents};
use sesamo_invoicing::ResolvedLine;
use sesamo_orders::{Order, OrderStatus, compute_discount};

/// Snapshot of clients, items and orders as last confirmed by the store.
#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    pub clients: Vec<Client>,
    pub items: Vec<Item>,
    pub orders: Vec<Order>,
}

impl OrderLedger {
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn orders_for_client(&self, client_id: ClientId) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|o| o.client_id == client_id)
            .collect()
    }

    pub fn orders_with_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.status == status).collect()
    }

    /// Orders whose owning client's name contains `term`
    /// (case-insensitive), or whose id contains it verbatim.
    pub fn search_orders(&self, term: &str) -> Vec<&Order> {
        let needle = term.to_lowercase();
        self.orders
            .iter()
            .filter(|order| {
                let by_name = self
                    .client(order.client_id)
                    .is_some_and(|c| c.name.to_lowercase().contains(&needle));
                by_name || order.id.to_string().contains(term)
            })
            .collect()
    }

    /// Join an order's lines with catalog item names for display or
    /// rendering. A line whose item has since been deleted keeps its
    /// captured price and shows as "Unknown Item".
    pub fn resolve_invoice_lines(&self, order: &Order) -> Vec<ResolvedLine> {
        order
            .lines
            .iter()
            .map(|line| ResolvedLine {
                name: self
                    .item(line.item_id)
                    .map(|item| item.name.clone())
                    .unwrap_or_else(|| "Unknown Item".to_string()),
                quantity: line.quantity,
                price: line.price,
            })
            .collect()
    }

    /// Recompute what an order's cached total should be from its lines:
    /// the discounted final total, except for orders created by merging,
    /// which cache the raw line sum.
    pub fn recompute_total(&self, order: &Order) -> f64 {
        let subtotal = order.subtotal();
        if order.status == OrderStatus::Merge {
            round_cents(subtotal)
        } else {
            compute_discount(subtotal).final_total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sesamo_orders::OrderLine;

    fn fixture() -> (OrderLedger, OrderId) {
        let client = Client::new(ClientId::new(), "Bistro U Lípy").unwrap();
        let item = Item::new(ItemId::new(), "Chléb", 35.0).unwrap();
        let order = Order {
            id: OrderId::new(),
            client_id: client.id,
            lines: vec![OrderLine { item_id: item.id, quantity: 2, price: 35.0 }],
            delivery_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            status: OrderStatus::Pending,
            notes: String::new(),
            total: 70.0,
            created_at: Utc::now(),
        };
        let order_id = order.id;
        (
            OrderLedger {
                clients: vec![client],
                items: vec![item],
                orders: vec![order],
            },
            order_id,
        )
    }

    #[test]
    fn search_matches_client_name_case_insensitively() {
        let (ledger, order_id) = fixture();
        assert_eq!(ledger.search_orders("lípy").len(), 1);
        assert_eq!(ledger.search_orders("nothing").len(), 0);
        assert_eq!(ledger.search_orders(&order_id.short()).len(), 1);
    }

    #[test]
    fn resolve_falls_back_to_unknown_item() {
        let (mut ledger, order_id) = fixture();
        ledger.items.clear();
        let order = ledger.order(order_id).unwrap().clone();
        let resolved = ledger.resolve_invoice_lines(&order);
        assert_eq!(resolved[0].name, "Unknown Item");
        assert_eq!(resolved[0].price, 35.0);
    }

    #[test]
    fn recompute_total_applies_discount_except_for_merges() {
        let (mut ledger, order_id) = fixture();
        {
            let order = &mut ledger.orders[0];
            order.lines[0].quantity = 20; // subtotal 700, 10% tier
        }
        let order = ledger.order(order_id).unwrap().clone();
        assert_eq!(ledger.recompute_total(&order), 630.0);

        ledger.orders[0].status = OrderStatus::Merge;
        let order = ledger.order(order_id).unwrap().clone();
        assert_eq!(ledger.recompute_total(&order), 700.0);
    }
}
