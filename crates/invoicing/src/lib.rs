//! `sesamo-invoicing` — delivery-note rendering: tax and discount
//! arithmetic, line layout and pagination.

pub mod layout;
pub mod render;

pub use layout::{LINE_HEIGHT, PAGE_BREAK_Y, PageWriter, TOP_MARGIN_Y};
pub use render::{InvoiceDocument, ResolvedLine, invoice_filename, render};
