//! CLI argument parsing for dispo
//!
//! Supports global flags: --root, --store, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod args;
pub mod format;
pub mod parse;
pub mod paths;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{AddArgs, ExportArgs, FilterArgs, SelectionArgs, UpdateArgs};
pub use dispo_core::format::OutputFormat;

use parse::parse_format;

/// Dispo - buyer disposition back-office CLI
#[derive(Parser, Debug)]
#[command(name = "dispo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store root path
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output format (human, json, records)
    #[arg(long, global = true, value_parser = parse_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new dispo store
    Init {
        /// Use visible store directory (dispo/ instead of .dispo/)
        #[arg(long)]
        visible: bool,
    },

    /// Add a buyer to the store
    Add(AddArgs),

    /// Show one buyer
    Show {
        /// Buyer ID
        id: String,
    },

    /// Update fields on a buyer
    Update(UpdateArgs),

    /// List buyers, with the full filter surface
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show at most this many buyers
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage tags and apply them in bulk
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Manage groups and their membership
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },

    /// Delete the selected buyers
    Delete {
        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export the selected buyers to CSV or JSON
    Export(ExportArgs),

    /// Import buyers from a JSON export
    Import {
        /// JSON file to import
        file: PathBuf,
    },

    /// Show store totals
    Stats,
}

/// Tag subcommands
#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add tags to the selected buyers
    Add {
        /// Tag names to add
        #[arg(required = true)]
        tags: Vec<String>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Remove tags from the selected buyers
    Remove {
        /// Tag names to remove
        #[arg(required = true)]
        tags: Vec<String>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List registered tags with usage counts
    List,

    /// Register a tag
    Create {
        /// Tag name
        name: String,

        /// Hex color (e.g. #EF4444)
        #[arg(long)]
        color: Option<String>,

        /// Protect the tag from deletion
        #[arg(long)]
        protected: bool,
    },

    /// Delete a tag from the registry
    Delete {
        /// Tag name
        name: String,
    },
}

/// Group subcommands
#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// List groups by folder with member counts
    List,

    /// Create a group
    Create {
        /// Group name
        name: String,

        /// Group description
        #[arg(long)]
        description: Option<String>,

        /// Folder the group is listed under
        #[arg(long)]
        folder: Option<String>,

        /// Hex color (e.g. #3B82F6)
        #[arg(long)]
        color: Option<String>,
    },

    /// Update a group's fields
    Update {
        /// Group ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New folder
        #[arg(long)]
        folder: Option<String>,

        /// New hex color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a group (membership rows go with it)
    Delete {
        /// Group ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List the members of a group
    Members {
        /// Group ID
        id: String,
    },

    /// Add the selected buyers to a group
    Add {
        /// Group ID
        // id renamed so it cannot collide with FilterArgs' flattened --group flag
        #[arg(id = "group_id", value_name = "GROUP")]
        group: String,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Remove the selected buyers from a group
    Remove {
        /// Group ID
        // id renamed so it cannot collide with FilterArgs' flattened --group flag
        #[arg(id = "group_id", value_name = "GROUP")]
        group: String,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },
}
