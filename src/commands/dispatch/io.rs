//! Handlers for moving buyer data in and out of the store

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cli::ExportArgs;
use crate::commands::format::{print_json_status, print_records_header};
use crate::commands::helpers::selected_buyers;
use crate::output_by_format_result;
use dispo_core::buyer::Buyer;
use dispo_core::error::{DispoError, Result};
use dispo_core::export;

use super::command::CommandContext;
use super::trace_command;

pub(super) fn handle_export(ctx: &CommandContext, args: &ExportArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let buyers = selected_buyers(&store, &args.selection, &args.filter)?;

    if buyers.is_empty() {
        // Mirror of the empty-selection warning: not an error, nothing written
        return output_by_format_result!(ctx.cli.format,
            json => {
                print_json_status("empty", Some("no buyers selected"), &[])
            },
            human => {
                if !ctx.cli.quiet {
                    println!("No buyers selected, nothing to export");
                }
            },
            records => {
                print_records_header(store.root(), "export", &[("buyers", "0".to_string())]);
            }
        );
    }

    let payload = export::serialize(&buyers, args.mode)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(export::default_filename(args.mode, Utc::now())));
    fs::write(&path, payload)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json_status(
                "ok",
                None,
                &[
                    ("path", serde_json::json!(path.display().to_string())),
                    ("mode", serde_json::json!(args.mode.to_string())),
                    ("count", serde_json::json!(buyers.len())),
                ],
            )
        },
        human => {
            if !ctx.cli.quiet {
                println!("Exported {} buyers to {}", buyers.len(), path.display());
            }
        },
        records => {
            print_records_header(
                store.root(),
                "export",
                &[
                    ("buyers", buyers.len().to_string()),
                    ("path", path.display().to_string()),
                    ("format", args.mode.to_string()),
                ],
            );
        }
    )
}

pub(super) fn handle_import(ctx: &CommandContext, file: &Path) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let content = fs::read_to_string(file)?;
    let mut buyers: Vec<Buyer> = serde_json::from_str(&content)?;

    // Validate the whole batch before the first insert so a bad record
    // does not leave a partial import behind.
    for buyer in &buyers {
        buyer.validate().map_err(|e| DispoError::InvalidValue {
            context: format!("imported buyer {}", buyer.id),
            value: e.to_string(),
        })?;
    }

    for buyer in &mut buyers {
        if buyer.id.is_empty() {
            let seed = format!(
                "{}|{}",
                buyer.display_name(),
                buyer.email.as_deref().unwrap_or("")
            );
            buyer.id = store.new_buyer_id(&seed)?;
        }
        store.put_buyer(buyer)?;
    }
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json_status(
                "ok",
                None,
                &[("count", serde_json::json!(buyers.len()))],
            )
        },
        human => {
            if !ctx.cli.quiet {
                println!("Imported {} buyers from {}", buyers.len(), file.display());
            }
        },
        records => {
            print_records_header(
                store.root(),
                "import",
                &[("buyers", buyers.len().to_string())],
            );
        }
    )
}
