//! Command implementations for all dispo commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use dispo_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        dispatch_command::execute(self, ctx)
    }
}

pub(super) mod dispatch_command {
    use super::*;

    use crate::cli::{GroupCommands, TagCommands};
    use crate::commands::dispatch::{bulk_ops, buyers, groups, io, maintenance, tags};

    pub(super) fn execute(cmd: &Commands, ctx: &CommandContext) -> Result<()> {
        match cmd {
            Commands::Init { visible } => maintenance::handle_init(ctx, *visible),
            Commands::Add(args) => buyers::handle_add(ctx, args),
            Commands::Show { id } => buyers::handle_show(ctx, id),
            Commands::Update(args) => buyers::handle_update(ctx, args),
            Commands::List { filter, limit } => buyers::handle_list(ctx, filter, *limit),
            Commands::Tag { command } => execute_tag(ctx, command),
            Commands::Group { command } => execute_group(ctx, command),
            Commands::Delete {
                selection,
                filter,
                yes,
            } => bulk_ops::handle_delete(ctx, selection, filter, *yes),
            Commands::Export(args) => io::handle_export(ctx, args),
            Commands::Import { file } => io::handle_import(ctx, file),
            Commands::Stats => maintenance::handle_stats(ctx),
        }
    }

    fn execute_tag(ctx: &CommandContext, command: &TagCommands) -> Result<()> {
        match command {
            TagCommands::Add {
                tags,
                selection,
                filter,
            } => bulk_ops::handle_tag_add(ctx, tags, selection, filter),
            TagCommands::Remove {
                tags,
                selection,
                filter,
            } => bulk_ops::handle_tag_remove(ctx, tags, selection, filter),
            TagCommands::List => tags::handle_list(ctx),
            TagCommands::Create {
                name,
                color,
                protected,
            } => tags::handle_create(ctx, name, color.as_deref(), *protected),
            TagCommands::Delete { name } => tags::handle_delete(ctx, name),
        }
    }

    fn execute_group(ctx: &CommandContext, command: &GroupCommands) -> Result<()> {
        match command {
            GroupCommands::List => groups::handle_list(ctx),
            GroupCommands::Create {
                name,
                description,
                folder,
                color,
            } => groups::handle_create(
                ctx,
                name,
                description.as_deref(),
                folder.as_deref(),
                color.as_deref(),
            ),
            GroupCommands::Update {
                id,
                name,
                description,
                folder,
                color,
            } => groups::handle_update(
                ctx,
                id,
                name.as_deref(),
                description.as_deref(),
                folder.as_deref(),
                color.as_deref(),
            ),
            GroupCommands::Delete { id, yes } => groups::handle_delete(ctx, id, *yes),
            GroupCommands::Members { id } => groups::handle_members(ctx, id),
            GroupCommands::Add {
                group,
                selection,
                filter,
            } => bulk_ops::handle_group_add(ctx, group, selection, filter),
            GroupCommands::Remove {
                group,
                selection,
                filter,
            } => bulk_ops::handle_group_remove(ctx, group, selection, filter),
        }
    }
}
