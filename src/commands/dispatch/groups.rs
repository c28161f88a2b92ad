//! Handlers for group management commands

use chrono::Utc;

use crate::commands::format::{print_json_status, print_records_header};
use crate::commands::helpers::confirm;
use crate::output_by_format_result;
use dispo_core::bail_unsupported;
use dispo_core::error::{DispoError, Result};
use dispo_core::group::{Group, FOLDERS};
use dispo_core::records::{buyer_line, escape_quotes};
use dispo_core::store::Store;

use super::command::CommandContext;
use super::trace_command;

pub(super) fn handle_list(ctx: &CommandContext) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let groups = store.groups()?;
    let counts = store.db().member_counts()?;
    let members = |group: &Group| counts.get(&group.id).copied().unwrap_or(0);
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            let output: Vec<serde_json::Value> =
                groups.iter().map(|g| group_json(g, members(g))).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if groups.is_empty() {
                if !ctx.cli.quiet {
                    println!("No groups found");
                }
            } else {
                for folder in FOLDERS {
                    let in_folder: Vec<&Group> =
                        groups.iter().filter(|g| g.folder() == *folder).collect();
                    if in_folder.is_empty() {
                        continue;
                    }
                    println!("{}/", folder);
                    for group in in_folder {
                        println!("  {}  {} ({} members)", group.id, group.name, members(group));
                    }
                }
            }
        },
        records => {
            print_records_header(
                store.root(),
                "group.list",
                &[("groups", groups.len().to_string())],
            );
            for group in &groups {
                println!("{}", group_line(group, members(group)));
            }
        }
    )
}

pub(super) fn handle_create(
    ctx: &CommandContext,
    name: &str,
    description: Option<&str>,
    folder: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    if let Some(folder) = folder {
        check_folder(folder)?;
    }
    let group = store.create_group(name, description, folder, color)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_group(ctx, &store, &group, "group.create", "Created")
}

pub(super) fn handle_update(
    ctx: &CommandContext,
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
    folder: Option<&str>,
    color: Option<&str>,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let mut group = store.get_group(id)?;
    if let Some(name) = name {
        group.name = name.to_string();
    }
    if let Some(description) = description {
        group.description = Some(description.to_string());
    }
    if let Some(folder) = folder {
        check_folder(folder)?;
        group.set_folder(folder);
    }
    if let Some(color) = color {
        group.color = Some(color.to_string());
    }
    group.updated_at = Utc::now();
    store.db().insert_group(&group)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_group(ctx, &store, &group, "group.update", "Updated")
}

pub(super) fn handle_delete(ctx: &CommandContext, id: &str, yes: bool) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let group = store.get_group(id)?;

    if !yes && !confirm("Are you sure you want to delete this group?")? {
        if !ctx.cli.quiet {
            println!("Aborted");
        }
        return Ok(());
    }

    store.db().delete_group(id)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json_status("deleted", None, &[("group", serde_json::json!(id))])
        },
        human => {
            if !ctx.cli.quiet {
                println!("Deleted group {} ({})", group.id, group.name);
            }
        },
        records => {
            print_records_header(
                store.root(),
                "group.delete",
                &[("group", id.to_string())],
            );
        }
    )
}

pub(super) fn handle_members(ctx: &CommandContext, id: &str) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let group = store.get_group(id)?;
    let ids = store.db().member_ids(&group.id)?;
    let mut buyers = Vec::with_capacity(ids.len());
    for member_id in &ids {
        buyers.push(store.get_buyer(member_id)?);
    }
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&buyers)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if buyers.is_empty() {
                if !ctx.cli.quiet {
                    println!("No members in {} ({})", group.id, group.name);
                }
            } else {
                for buyer in &buyers {
                    println!("{}", super::buyers::list_line(buyer));
                }
            }
        },
        records => {
            print_records_header(
                store.root(),
                "group.members",
                &[
                    ("group", group.id.clone()),
                    ("buyers", buyers.len().to_string()),
                ],
            );
            for buyer in &buyers {
                println!("{}", buyer_line(buyer));
            }
        }
    )
}

/// Shared output for group create and update
fn output_group(
    ctx: &CommandContext,
    store: &Store,
    group: &Group,
    mode: &str,
    verb: &str,
) -> Result<()> {
    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&group_json(group, 0))?);
            Ok::<(), DispoError>(())
        },
        human => {
            if !ctx.cli.quiet {
                println!("{} group {} ({})", verb, group.id, group.name);
            }
        },
        records => {
            print_records_header(store.root(), mode, &[("group", group.id.clone())]);
            println!("{}", group_line(group, 0));
        }
    )
}

fn check_folder(folder: &str) -> Result<()> {
    if !FOLDERS.contains(&folder) {
        bail_unsupported!("folder", folder, FOLDERS.join(", "));
    }
    Ok(())
}

fn group_json(group: &Group, members: i64) -> serde_json::Value {
    serde_json::json!({
        "id": group.id,
        "name": group.name,
        "description": group.description,
        "type": group.kind.to_string(),
        "folder": group.folder(),
        "color": group.color,
        "members": members,
        "created_at": group.created_at.to_rfc3339(),
        "updated_at": group.updated_at.to_rfc3339(),
    })
}

fn group_line(group: &Group, members: i64) -> String {
    format!(
        "G {} {} \"{}\" members={}",
        group.id,
        group.folder(),
        escape_quotes(&group.name),
        members
    )
}
