//! Buyer collection querying

pub mod filter;

pub use filter::{BuyerFilter, FlagFilter, QuickFilter};
