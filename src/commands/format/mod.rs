//! Shared output formatting helpers for commands
//!
//! Provides common patterns for JSON status messages and Records
//! headers repeated across command modules.

pub mod dispatch;
pub mod status;

pub use status::{print_json_status, print_records_header};
