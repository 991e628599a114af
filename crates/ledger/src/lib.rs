//! `sesamo-ledger` — in-memory projection of the record collections and
//! the order command layer on top of it.

pub mod ledger;
pub mod service;

pub use ledger::OrderLedger;
pub use service::OrderService;
