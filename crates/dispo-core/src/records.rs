//! Utilities for records output format
//!
//! Line-oriented output for scripting: one `H` header line, then one
//! `B` line per buyer.

use crate::buyer::Buyer;

/// Escape double quotes in a string for records format.
/// Replaces `"` with `\"` to allow safe embedding in quoted fields.
pub fn escape_quotes(s: &str) -> String {
    s.replace('\"', r#"\""#)
}

/// Comma-joined list, or `-` when empty
pub fn csv_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(",")
    }
}

/// `B <id> <status> score=<n> "<name>" tags=<csv|->`
pub fn buyer_line(buyer: &Buyer) -> String {
    format!(
        "B {} {} score={} \"{}\" tags={}",
        buyer.id,
        buyer.status,
        buyer.score,
        escape_quotes(&buyer.display_name()),
        csv_or_dash(&buyer.tags)
    )
}
