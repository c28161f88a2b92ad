//! Handlers for store-level commands: init, stats

use std::collections::HashMap;

use crate::commands::format::{print_json_status, print_records_header};
use crate::output_by_format_result;
use dispo_core::buyer::BuyerStatus;
use dispo_core::error::{DispoError, Result};
use dispo_core::store::{InitOptions, Store};

use super::command::CommandContext;
use super::trace_command;

pub(super) fn handle_init(ctx: &CommandContext, visible: bool) -> Result<()> {
    let options = InitOptions { visible };

    let store = if let Some(path) = ctx.cli.store.as_ref() {
        let resolved = if path.is_absolute() {
            path.clone()
        } else {
            ctx.root.join(path)
        };
        Store::init_at(&resolved)?
    } else {
        Store::init(ctx.root, options)?
    };
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json_status(
                "ok",
                Some("Store initialized"),
                &[(
                    "store",
                    serde_json::json!(store.root().display().to_string()),
                )],
            )
        },
        human => {
            println!("Initialized dispo store at {}", store.root().display());
        },
        records => {
            print_records_header(store.root(), "init", &[("status", "ok".to_string())]);
        }
    )
}

pub(super) fn handle_stats(ctx: &CommandContext) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let buyers = store.buyers()?;
    let mut by_status: HashMap<&'static str, usize> = HashMap::new();
    let mut vip = 0usize;
    let mut vetted = 0usize;
    for buyer in &buyers {
        *by_status.entry(buyer.status.as_str()).or_insert(0) += 1;
        if buyer.vip {
            vip += 1;
        }
        if buyer.vetted {
            vetted += 1;
        }
    }

    let tags = store.db().tag_count()?;
    let groups = store.db().group_count()?;
    let memberships = store.db().member_count()?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            let status_counts: serde_json::Map<String, serde_json::Value> = BuyerStatus::ALL
                .iter()
                .map(|s| {
                    let count = by_status.get(s.as_str()).copied().unwrap_or(0);
                    (s.as_str().to_string(), serde_json::json!(count))
                })
                .collect();
            let output = serde_json::json!({
                "buyers": buyers.len(),
                "by_status": status_counts,
                "vip": vip,
                "vetted": vetted,
                "tags": tags,
                "groups": groups,
                "memberships": memberships,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), DispoError>(())
        },
        human => {
            println!("Buyers:      {}", buyers.len());
            let breakdown: Vec<String> = BuyerStatus::ALL
                .iter()
                .filter_map(|s| {
                    by_status
                        .get(s.as_str())
                        .map(|count| format!("{}: {}", s.as_str(), count))
                })
                .collect();
            if !breakdown.is_empty() {
                println!("  {}", breakdown.join("  "));
            }
            println!("  vip: {}  vetted: {}", vip, vetted);
            println!("Tags:        {}", tags);
            println!("Groups:      {}", groups);
            println!("Memberships: {}", memberships);
        },
        records => {
            print_records_header(
                store.root(),
                "stats",
                &[
                    ("buyers", buyers.len().to_string()),
                    ("tags", tags.to_string()),
                    ("groups", groups.to_string()),
                    ("memberships", memberships.to_string()),
                ],
            );
        }
    )
}
