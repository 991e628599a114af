//! `sesamo-orders` — orders, their lifecycle, discount tiers and the
//! pure merge algorithm.

pub mod discount;
pub mod merge;
pub mod order;
pub mod status;

pub use discount::{DiscountBreakdown, compute_discount, discount_factor};
pub use merge::{combine_lines, merge_notes};
pub use order::{DraftLine, Order, OrderDraft, OrderLine};
pub use status::OrderStatus;
