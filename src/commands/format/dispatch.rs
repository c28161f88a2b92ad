//! Format dispatch macros for command output
//!
//! The macros live in `crate::cli::format` and are re-exported here for
//! convenient access from command modules.

pub use crate::output_by_format;
pub use crate::output_by_format_result;
