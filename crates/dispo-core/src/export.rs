//! Export serializers for buyer records
//!
//! CSV follows RFC 4180 quoting; list-valued fields are joined with
//! `"; "` so spreadsheet columns stay flat. JSON is the full record
//! array, pretty-printed, and re-importable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::buyer::Buyer;
use crate::error::{DispoError, Result};

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Comma-separated values (default)
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl FromStr for ExportMode {
    type Err = DispoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportMode::Csv),
            "json" => Ok(ExportMode::Json),
            other => Err(DispoError::unsupported("export mode", other, "csv, json")),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Csv => write!(f, "csv"),
            ExportMode::Json => write!(f, "json"),
        }
    }
}

/// Column order matches the buyer record's field order
const CSV_HEADER: &str = "id,fname,lname,full_name,email,phone,phone2,phone3,company,score,notes,\
     mailing_address,mailing_city,mailing_state,mailing_zip,locations,tags,vetted,vip,\
     can_receive_sms,can_receive_email,property_types,budget_min,budget_max,timeline,source,\
     status,created_at,updated_at";

/// Serialize buyers as CSV, header first
pub fn to_csv(buyers: &[Buyer]) -> String {
    let mut out = String::with_capacity(256 * (buyers.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for buyer in buyers {
        let record = csv_record(buyer);
        let escaped: Vec<String> = record.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    out
}

/// Serialize buyers as a pretty-printed JSON array
pub fn to_json(buyers: &[Buyer]) -> Result<String> {
    Ok(serde_json::to_string_pretty(buyers)?)
}

/// Serialize buyers in the given mode
pub fn serialize(buyers: &[Buyer], mode: ExportMode) -> Result<String> {
    match mode {
        ExportMode::Csv => Ok(to_csv(buyers)),
        ExportMode::Json => to_json(buyers),
    }
}

/// `buyers-export-<date>.<ext>`, dated in UTC
pub fn default_filename(mode: ExportMode, now: DateTime<Utc>) -> String {
    format!("buyers-export-{}.{}", now.format("%Y-%m-%d"), mode)
}

fn csv_record(buyer: &Buyer) -> Vec<String> {
    vec![
        buyer.id.clone(),
        opt(&buyer.fname),
        opt(&buyer.lname),
        opt(&buyer.full_name),
        opt(&buyer.email),
        opt(&buyer.phone),
        opt(&buyer.phone2),
        opt(&buyer.phone3),
        opt(&buyer.company),
        buyer.score.to_string(),
        opt(&buyer.notes),
        opt(&buyer.mailing_address),
        opt(&buyer.mailing_city),
        opt(&buyer.mailing_state),
        opt(&buyer.mailing_zip),
        buyer.locations.join("; "),
        buyer.tags.join("; "),
        buyer.vetted.to_string(),
        buyer.vip.to_string(),
        buyer.can_receive_sms.to_string(),
        buyer.can_receive_email.to_string(),
        buyer.property_types.join("; "),
        opt_num(buyer.budget_min),
        opt_num(buyer.budget_max),
        opt(&buyer.timeline),
        opt(&buyer.source),
        buyer.status.to_string(),
        buyer.created_at.to_rfc3339(),
        buyer.updated_at.to_rfc3339(),
    ]
}

fn opt(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

fn opt_num(field: Option<f64>) -> String {
    field.map(|n| n.to_string()).unwrap_or_default()
}

/// Quote a field when it contains a comma, quote, or line break
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn buyer() -> Buyer {
        let created = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let mut b = Buyer::new("by-a1b2", created);
        b.fname = Some("Jane".to_string());
        b.lname = Some("Doe".to_string());
        b.email = Some("jane@example.com".to_string());
        b.locations = vec!["Austin".to_string(), "San Antonio".to_string()];
        b.tags = vec!["cash buyer".to_string()];
        b.vip = true;
        b
    }

    #[test]
    fn test_csv_header_and_field_counts_match() {
        let csv = to_csv(&[buyer()]);
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        let row = lines.next().unwrap();

        assert!(header.starts_with("id,fname,lname"));
        assert_eq!(header.split(',').count(), 29);
        assert_eq!(row.split(',').count(), 29);
    }

    #[test]
    fn test_csv_joins_lists_and_renders_flags() {
        let csv = to_csv(&[buyer()]);
        let row = csv.lines().nth(1).unwrap();

        assert!(row.contains("Austin; San Antonio"));
        assert!(row.contains("cash buyer"));
        assert!(row.contains(",true,"));
        assert!(row.contains("2024-04-01T12:00:00+00:00"));
    }

    #[test]
    fn test_csv_quotes_commas_and_doubles_quotes() {
        let mut b = buyer();
        b.company = Some("Smith, Jones & Co".to_string());
        b.notes = Some("asked for \"land only\"".to_string());

        let csv = to_csv(&[b]);
        assert!(csv.contains("\"Smith, Jones & Co\""));
        assert!(csv.contains("\"asked for \"\"land only\"\"\""));
    }

    #[test]
    fn test_csv_quotes_embedded_newlines() {
        let mut b = buyer();
        b.notes = Some("call after 5\nprefers text".to_string());

        let csv = to_csv(&[b]);
        assert!(csv.contains("\"call after 5\nprefers text\""));
    }

    #[test]
    fn test_csv_empty_optionals_stay_empty() {
        let csv = to_csv(&[buyer()]);
        let row = csv.lines().nth(1).unwrap();
        // phone/phone2/phone3/company are all unset
        assert!(row.contains("jane@example.com,,,,,"));
    }

    #[test]
    fn test_json_is_reimportable() {
        let json = to_json(&[buyer()]).unwrap();
        let parsed: Vec<Buyer> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "by-a1b2");
        assert_eq!(parsed[0].locations, vec!["Austin", "San Antonio"]);
    }

    #[test]
    fn test_default_filename_uses_utc_date() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 23, 59, 0).unwrap();
        assert_eq!(
            default_filename(ExportMode::Csv, now),
            "buyers-export-2024-04-01.csv"
        );
        assert_eq!(
            default_filename(ExportMode::Json, now),
            "buyers-export-2024-04-01.json"
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("csv".parse::<ExportMode>().unwrap(), ExportMode::Csv);
        assert_eq!("JSON".parse::<ExportMode>().unwrap(), ExportMode::Json);
        assert!("xml".parse::<ExportMode>().is_err());
    }
}
