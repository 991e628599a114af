//! `sesamo-catalog` — catalog item records.

pub mod item;

pub use item::Item;
