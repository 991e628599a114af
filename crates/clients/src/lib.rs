//! `sesamo-clients` — client records and the last-order snapshot.

pub mod client;

pub use client::{Client, OrderSnapshot, SnapshotLine};
