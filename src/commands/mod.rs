//! CLI commands for dispo

pub mod dispatch;
pub mod format;
pub mod helpers;
