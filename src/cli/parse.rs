//! Value parsers for clap arguments.
//!
//! clap wants `Result<T, String>`, so each parser wraps the core
//! `FromStr` impl and stringifies the error.

use chrono::{DateTime, NaiveDate, Utc};

use dispo_core::buyer::BuyerStatus;
use dispo_core::export::ExportMode;
use dispo_core::format::OutputFormat;
use dispo_core::query::filter::{FlagFilter, QuickFilter};

/// Parse output format from string
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse buyer status from string
pub fn parse_status(s: &str) -> std::result::Result<BuyerStatus, String> {
    s.parse::<BuyerStatus>().map_err(|e| e.to_string())
}

/// Parse a yes/no/any flag constraint from string
pub fn parse_flag_filter(s: &str) -> std::result::Result<FlagFilter, String> {
    s.parse::<FlagFilter>().map_err(|e| e.to_string())
}

/// Parse a quick-filter toggle from string
pub fn parse_quick(s: &str) -> std::result::Result<QuickFilter, String> {
    s.parse::<QuickFilter>().map_err(|e| e.to_string())
}

/// Parse export mode from string
pub fn parse_export_mode(s: &str) -> std::result::Result<ExportMode, String> {
    s.parse::<ExportMode>().map_err(|e| e.to_string())
}

/// Parse a score, enforcing the 0-100 range
pub fn parse_score(s: &str) -> std::result::Result<u8, String> {
    let score: u8 = s
        .parse()
        .map_err(|_| format!("invalid score '{}': expected a number from 0 to 100", s))?;
    if score > 100 {
        return Err(format!("score {} is out of range (0-100)", score));
    }
    Ok(score)
}

/// Parse an instant from an RFC 3339 timestamp or a bare YYYY-MM-DD
/// date (read as midnight UTC).
pub fn parse_date(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}': expected RFC 3339 or YYYY-MM-DD", s))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => Ok(DateTime::from_naive_utc_and_offset(naive, Utc)),
        None => Err(format!("invalid date '{}'", s)),
    }
}
