//! Delivery-note document rendering.

use chrono::NaiveDate;

use sesamo_clients::Client;
use sesamo_core::OrderId;
use sesamo_orders::{Order, discount::discount_percentage, discount_factor};

use crate::layout::PageWriter;

/// VAT rate applied to every line.
pub const VAT_RATE: f64 = 0.12;

const TITLE: &str = "DODACÍ LIST";
const ISSUER: [&str; 5] = [
    "Sesamo Food s.r.o.",
    "Purkyňova 3091/97",
    "612 00 Brno",
    "IČO: 9075526",
    "DIČ: CZ09075526",
];
const FOOTER_WEB: &str = "https://sesamobrno.cz/";
const FOOTER_CONTACT: &str = "Sesamo Obchodní <sesamosales@gmail.com>";

/// An order line joined with its catalog item name for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// A rendered delivery note: paginated document bytes plus the filename
/// it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Filename for a delivery note. Pure: same inputs, same name.
///
/// Whitespace runs in the client name become single underscores so the
/// name is safe for downloads.
pub fn invoice_filename(delivery_date: NaiveDate, order_id: OrderId, client_name: &str) -> String {
    let safe_name: String = client_name.split_whitespace().collect::<Vec<_>>().join("_");
    format!(
        "Dodaci_list-{}-{}-{}.pdf",
        delivery_date.format("%Y-%m-%d"),
        order_id.short(),
        safe_name
    )
}

/// Render the delivery note for `order`.
///
/// `lines` are the order's lines already joined with item names, in order.
/// The discount tier is recomputed from the line subtotal; per-line amounts
/// are expressed multiplicatively (`price × factor × (1 − VAT)`), so the
/// footer totals agree with the column sums to the cent.
pub fn render(order: &Order, client: &Client, lines: &[ResolvedLine]) -> InvoiceDocument {
    let subtotal: f64 = lines.iter().map(|l| l.price * l.quantity as f64).sum();
    let factor = discount_factor(subtotal);
    let pct = discount_percentage(subtotal);

    let mut w = PageWriter::new();

    w.line_with(TITLE, 12.0);
    w.blank();

    for issuer_line in ISSUER {
        w.line(issuer_line);
    }
    w.blank();

    w.line(&format!("Odběratel: {}", client.name));
    for segment in client.address.split(',') {
        let segment = segment.trim();
        if !segment.is_empty() {
            w.line(segment);
        }
    }
    if !client.tax_id.is_empty() {
        w.line(&format!("IČO: {}", client.tax_id));
    }
    w.blank();
    w.line(&format!(
        "Datum dodání: {}",
        order.delivery_date.format("%d.%m.%Y")
    ));

    // Table never starts higher than 110 even on a short header.
    w.advance_to((w.cursor() + 20.0).max(110.0));
    w.line(&format!(
        "{:<30} {:>8} {:>12} {:>14} {:>10} {:>14}",
        "Popis položky", "Množství", "Cena za MJ", "Celkem bez DPH", "DPH", "Celkem s DPH"
    ));

    for line in lines {
        let qty = line.quantity as f64;
        let unit_excl = line.price * factor * (1.0 - VAT_RATE);
        let total_excl = line.price * qty * factor * (1.0 - VAT_RATE);
        let total_incl = line.price * qty * factor;
        w.line(&format!(
            "{:<30} {:>8} {:>12.2} {:>14.2} {:>10} {:>14.2}",
            line.name, line.quantity, unit_excl, total_excl, "12 %", total_incl,
        ));
    }

    w.blank();
    if pct > 0.0 {
        w.line(&format!("Sleva: {pct:.0} %"));
    }
    w.line(&format!(
        "Celkem bez DPH: {:.2}",
        subtotal * factor * (1.0 - VAT_RATE)
    ));
    w.line(&format!("DPH 12 %: {:.2}", subtotal * factor * VAT_RATE));
    w.line(&format!("Celkem s DPH: {:.2}", subtotal * factor));
    w.blank();
    w.line(FOOTER_WEB);
    w.line(FOOTER_CONTACT);

    InvoiceDocument {
        bytes: w.into_bytes(),
        filename: invoice_filename(order.delivery_date, order.id, &client.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core::str::FromStr;
    use sesamo_core::ClientId;
    use sesamo_orders::{OrderLine, OrderStatus};
    use uuid::Uuid;

    fn test_client(name: &str) -> Client {
        let mut client = Client::new(ClientId::new(), name).unwrap();
        client.address = "Dlouhá 12, 110 00 Praha".into();
        client.tax_id = "12345678".into();
        client
    }

    fn test_order(lines: Vec<OrderLine>) -> Order {
        Order {
            id: OrderId::new(),
            client_id: ClientId::new(),
            lines,
            delivery_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
            status: OrderStatus::Pending,
            notes: String::new(),
            total: 0.0,
            created_at: Utc::now(),
        }
    }

    fn resolved(name: &str, quantity: u32, price: f64) -> ResolvedLine {
        ResolvedLine { name: name.into(), quantity, price }
    }

    #[test]
    fn filename_is_pure_and_normalizes_whitespace() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
        let id = OrderId::from_uuid(
            Uuid::from_str("6d9072f0-72ab-4c9f-a2cd-0123456789ab").unwrap(),
        );
        let name = invoice_filename(date, id, "Bistro  U   Lípy");
        assert_eq!(name, "Dodaci_list-2026-09-15-456789ab-Bistro_U_Lípy.pdf");
        assert_eq!(invoice_filename(date, id, "Bistro  U   Lípy"), name);
    }

    #[test]
    fn totals_are_internally_consistent() {
        let lines = vec![resolved("Chléb", 10, 35.0), resolved("Sýr", 4, 120.0)];
        let subtotal: f64 = lines.iter().map(|l| l.price * l.quantity as f64).sum();
        let factor = discount_factor(subtotal);
        let excl = subtotal * factor * (1.0 - VAT_RATE);
        let tax = subtotal * factor * VAT_RATE;
        let incl = subtotal * factor;
        assert!((excl + tax - incl).abs() < 0.01);
    }

    #[test]
    fn footer_totals_reflect_discount_tier() {
        let order = test_order(vec![]);
        let client = test_client("Kavárna Sever");
        // subtotal 700 sits in the 10% tier
        let doc = render(&order, &client, &[resolved("Mouka", 7, 100.0)]);
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.contains("Sleva: 10 %"));
        assert!(text.contains("Celkem s DPH: 630.00"));
        assert!(text.contains("Celkem bez DPH: 554.40"));
        assert!(text.contains("DPH 12 %: 75.60"));
    }

    #[test]
    fn no_discount_line_below_first_tier() {
        let order = test_order(vec![]);
        let client = test_client("Kavárna Sever");
        let doc = render(&order, &client, &[resolved("Mouka", 1, 100.0)]);
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(!text.contains("Sleva"));
        assert!(text.contains("Celkem s DPH: 100.00"));
    }

    #[test]
    fn short_note_fits_one_page_long_note_breaks() {
        let order = test_order(vec![]);
        let client = test_client("Kavárna Sever");

        let few: Vec<ResolvedLine> =
            (0..3).map(|i| resolved(&format!("Položka {i}"), 1, 10.0)).collect();
        let doc = render(&order, &client, &few);
        let text = String::from_utf8(doc.bytes).unwrap();
        assert_eq!(text.matches('\u{c}').count(), 0);

        let many: Vec<ResolvedLine> =
            (0..60).map(|i| resolved(&format!("Položka {i}"), 1, 10.0)).collect();
        let doc = render(&order, &client, &many);
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.matches('\u{c}').count() >= 1);
        for line in many.iter().map(|l| l.name.as_str()) {
            assert!(text.contains(line));
        }
    }
}
