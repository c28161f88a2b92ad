//! Handlers for tag registry commands

use crate::commands::format::{print_json_status, print_records_header};
use crate::output_by_format_result;
use dispo_core::error::{DispoError, Result};
use dispo_core::records::escape_quotes;
use dispo_core::tag::Tag;

use super::command::CommandContext;
use super::trace_command;

pub(super) fn handle_list(ctx: &CommandContext) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    // tags() recounts usage from the buyer collection first
    let tags = store.tags()?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&tags)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if tags.is_empty() {
                if !ctx.cli.quiet {
                    println!("No tags found");
                }
            } else {
                for tag in &tags {
                    let protected = if tag.is_protected { " [protected]" } else { "" };
                    println!("{} ({}){}", tag.name, tag.usage_count, protected);
                }
            }
        },
        records => {
            print_records_header(
                store.root(),
                "tag.list",
                &[("tags", tags.len().to_string())],
            );
            for tag in &tags {
                println!("{}", tag_line(tag));
            }
        }
    )
}

pub(super) fn handle_create(
    ctx: &CommandContext,
    name: &str,
    color: Option<&str>,
    protected: bool,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let tag = store.create_tag(name, color, protected)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&tag)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if !ctx.cli.quiet {
                println!("Created tag {} ({})", tag.name, tag.id);
            }
        },
        records => {
            print_records_header(store.root(), "tag.create", &[("tag", tag.id.clone())]);
            println!("{}", tag_line(&tag));
        }
    )
}

pub(super) fn handle_delete(ctx: &CommandContext, name: &str) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    store.db().delete_tag(name)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            print_json_status("deleted", None, &[("tag", serde_json::json!(name))])
        },
        human => {
            if !ctx.cli.quiet {
                println!("Deleted tag {}", name);
            }
        },
        records => {
            print_records_header(
                store.root(),
                "tag.delete",
                &[("tag", name.to_string())],
            );
        }
    )
}

fn tag_line(tag: &Tag) -> String {
    format!(
        "T {} \"{}\" color={} protected={} usage={}",
        tag.id,
        escape_quotes(&tag.name),
        tag.color,
        tag.is_protected,
        tag.usage_count
    )
}
