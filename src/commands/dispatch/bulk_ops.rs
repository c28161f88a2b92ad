//! Handlers for bulk mutations over the selected buyers

use crate::cli::{FilterArgs, SelectionArgs};
use crate::commands::format::print_records_header;
use crate::commands::helpers::{confirm, selected_buyer_ids};
use crate::output_by_format_result;
use dispo_core::bulk::{self, BulkReport};
use dispo_core::error::{DispoError, Result};
use dispo_core::records::escape_quotes;
use dispo_core::store::Store;

use super::command::CommandContext;
use super::trace_command;

pub(super) fn handle_tag_add(
    ctx: &CommandContext,
    tags: &[String],
    selection: &SelectionArgs,
    filter: &FilterArgs,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let ids = selected_buyer_ids(&store, selection, filter)?;
    let report = bulk::add_tags(&store, &ids, tags)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_report(ctx, &store, &report, "Tagged")
}

pub(super) fn handle_tag_remove(
    ctx: &CommandContext,
    tags: &[String],
    selection: &SelectionArgs,
    filter: &FilterArgs,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let ids = selected_buyer_ids(&store, selection, filter)?;
    let report = bulk::remove_tags(&store, &ids, tags)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_report(ctx, &store, &report, "Untagged")
}

pub(super) fn handle_group_add(
    ctx: &CommandContext,
    group: &str,
    selection: &SelectionArgs,
    filter: &FilterArgs,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let ids = selected_buyer_ids(&store, selection, filter)?;
    let report = bulk::add_to_group(&store, &ids, group)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_report(ctx, &store, &report, "Grouped")
}

pub(super) fn handle_group_remove(
    ctx: &CommandContext,
    group: &str,
    selection: &SelectionArgs,
    filter: &FilterArgs,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let ids = selected_buyer_ids(&store, selection, filter)?;
    let report = bulk::remove_from_group(&store, &ids, group)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_report(ctx, &store, &report, "Ungrouped")
}

pub(super) fn handle_delete(
    ctx: &CommandContext,
    selection: &SelectionArgs,
    filter: &FilterArgs,
    yes: bool,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let ids = selected_buyer_ids(&store, selection, filter)?;

    if !ids.is_empty() && !yes {
        let prompt = format!(
            "Are you sure you want to delete {} buyers? This cannot be undone.",
            ids.len()
        );
        if !confirm(&prompt)? {
            if !ctx.cli.quiet {
                println!("Aborted");
            }
            return Ok(());
        }
    }

    let report = bulk::delete(&store, &ids)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_report(ctx, &store, &report, "Deleted")
}

/// Per-record report output, shared by every bulk command.
///
/// Partial failures are data: the report carries them and the command
/// still succeeds. Only a selection where every record failed turns
/// into an error (exit 1) after the report is printed.
fn output_report(
    ctx: &CommandContext,
    store: &Store,
    report: &BulkReport,
    verb: &str,
) -> Result<()> {
    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if !ctx.cli.quiet {
                println!("{} {} buyers", verb, report.succeeded.len());
            }
            if !report.is_complete() {
                println!("{} failed:", report.failed.len());
                for failure in &report.failed {
                    println!("  {}: {}", failure.id, failure.reason);
                }
            }
        },
        records => {
            print_records_header(
                store.root(),
                &report.operation,
                &[
                    ("succeeded", report.succeeded.len().to_string()),
                    ("failed", report.failed.len().to_string()),
                ],
            );
            for id in &report.succeeded {
                println!("R {} ok", id);
            }
            for failure in &report.failed {
                println!("R {} fail \"{}\"", failure.id, escape_quotes(&failure.reason));
            }
        }
    )?;

    if report.succeeded.is_empty() && !report.failed.is_empty() {
        return Err(DispoError::FailedOperation {
            operation: report.operation.clone(),
            reason: format!("all {} buyers failed", report.failed.len()),
        });
    }
    Ok(())
}
