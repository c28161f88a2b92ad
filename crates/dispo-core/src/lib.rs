//! Dispo Core Library
//!
//! Core domain logic for the dispo buyer disposition console.

pub mod buyer;
pub mod bulk;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod group;
pub mod id;
pub mod logging;
pub mod query;
pub mod records;
pub mod selection;
pub mod state;
pub mod store;
pub mod tag;
