//! Status message formatting helpers

use std::path::Path;

use serde_json::json;

use dispo_core::error::Result;

/// Print a JSON status message with optional fields
///
/// # Examples
/// ```ignore
/// print_json_status("ok", Some("store initialized"), &[("store", json!(path))])?;
/// ```
pub fn print_json_status(
    status: &str,
    message: Option<&str>,
    extra_fields: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut output = json!({ "status": status });

    if let Some(msg) = message {
        if let Some(obj) = output.as_object_mut() {
            obj.insert("message".to_string(), json!(msg));
        }
    }

    for (key, value) in extra_fields {
        if let Some(obj) = output.as_object_mut() {
            obj.insert(key.to_string(), value.clone());
        }
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print a Records format header
///
/// # Examples
/// ```ignore
/// print_records_header(store.root(), "list", &[("buyers", visible.len().to_string())]);
/// ```
pub fn print_records_header(store_root: &Path, mode: &str, extra_fields: &[(&str, String)]) {
    let mut parts = vec![
        "H dispo=1 records=1".to_string(),
        format!("store={}", store_root.display()),
        format!("mode={}", mode),
    ];

    for (key, value) in extra_fields {
        parts.push(format!("{}={}", key, value));
    }

    println!("{}", parts.join(" "));
}
