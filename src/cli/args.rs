use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;

use dispo_core::buyer::BuyerStatus;
use dispo_core::export::ExportMode;
use dispo_core::query::filter::{FlagFilter, QuickFilter};

use super::parse::{
    parse_date, parse_export_mode, parse_flag_filter, parse_quick, parse_score, parse_status,
};

/// The filter surface shared by list, bulk, and export commands.
///
/// Every clause is optional; configured clauses are ANDed together.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive search over name, email, phone, company
    #[arg(long)]
    pub search: Option<String>,

    /// Require this tag (can be repeated; all must match)
    #[arg(long, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Exclude buyers carrying this tag (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub exclude_tag: Vec<String>,

    /// Require one of these target locations (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub location: Vec<String>,

    /// Minimum score, inclusive (0-100)
    #[arg(long, value_parser = parse_score)]
    pub min_score: Option<u8>,

    /// Maximum score, inclusive (0-100)
    #[arg(long, value_parser = parse_score)]
    pub max_score: Option<u8>,

    /// Constrain the VIP flag (any, yes, no)
    #[arg(long, value_parser = parse_flag_filter, default_value = "any")]
    pub vip: FlagFilter,

    /// Constrain the vetted flag (any, yes, no)
    #[arg(long, value_parser = parse_flag_filter, default_value = "any")]
    pub vetted: FlagFilter,

    /// Constrain email consent (any, yes, no)
    #[arg(long, value_parser = parse_flag_filter, default_value = "any")]
    pub email: FlagFilter,

    /// Constrain SMS consent (any, yes, no)
    #[arg(long, value_parser = parse_flag_filter, default_value = "any")]
    pub sms: FlagFilter,

    /// Created on or after this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub created_after: Option<DateTime<Utc>>,

    /// Created on or before this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub created_before: Option<DateTime<Utc>>,

    /// Require this property type in the buyer's interests
    #[arg(long)]
    pub property_type: Option<String>,

    /// Quick filter toggle: vip, high-score, hot, new (can be repeated)
    #[arg(long, value_parser = parse_quick, action = clap::ArgAction::Append)]
    pub quick: Vec<QuickFilter>,

    /// Restrict to members of this group (by ID). Membership is
    /// relational, so this narrows the working set before the other
    /// clauses run.
    #[arg(long, value_name = "GROUP_ID")]
    pub group: Option<String>,
}

impl FilterArgs {
    /// Build the core filter from the parsed flags
    pub fn to_filter(&self) -> dispo_core::query::filter::BuyerFilter {
        dispo_core::query::filter::BuyerFilter::new()
            .with_search(self.search.clone())
            .with_tags(self.tag.clone())
            .with_exclude_tags(self.exclude_tag.clone())
            .with_locations(self.location.clone())
            .with_score_range(self.min_score, self.max_score)
            .with_vip(self.vip)
            .with_vetted(self.vetted)
            .with_email(self.email)
            .with_sms(self.sms)
            .with_created_range(self.created_after, self.created_before)
            .with_property_type(self.property_type.clone())
            .with_quick(self.quick.clone())
    }

    /// True when no clause is configured, the group restriction included
    pub fn is_empty(&self) -> bool {
        self.to_filter().is_empty() && self.group.is_none()
    }
}

/// How a bulk or export command picks its buyers.
///
/// Exactly one of the two must be used: explicit `--buyer` ids, or
/// `--filtered` to act on every buyer the filter flags match.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Buyer ID to act on (can be repeated)
    #[arg(long, short = 'b', action = clap::ArgAction::Append, value_name = "ID")]
    pub buyer: Vec<String>,

    /// Act on every buyer matching the filter flags
    #[arg(long)]
    pub filtered: bool,
}

/// Intake fields for `dispo add`
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// First name
    #[arg(long)]
    pub fname: Option<String>,

    /// Last name
    #[arg(long)]
    pub lname: Option<String>,

    /// Display name override
    #[arg(long)]
    pub full_name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Primary phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Secondary phone
    #[arg(long)]
    pub phone2: Option<String>,

    /// Tertiary phone
    #[arg(long)]
    pub phone3: Option<String>,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    /// Priority score (0-100, default 50)
    #[arg(long, value_parser = parse_score)]
    pub score: Option<u8>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mailing street address
    #[arg(long)]
    pub mailing_address: Option<String>,

    /// Mailing city
    #[arg(long)]
    pub mailing_city: Option<String>,

    /// Mailing state
    #[arg(long)]
    pub mailing_state: Option<String>,

    /// Mailing ZIP code
    #[arg(long)]
    pub mailing_zip: Option<String>,

    /// Target location (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub location: Vec<String>,

    /// Tag (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Vetted flag (true/false)
    #[arg(long)]
    pub vetted: Option<bool>,

    /// VIP flag (true/false)
    #[arg(long)]
    pub vip: Option<bool>,

    /// SMS consent (true/false, default true)
    #[arg(long)]
    pub can_sms: Option<bool>,

    /// Email consent (true/false, default true)
    #[arg(long)]
    pub can_email: Option<bool>,

    /// Property type interest (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub property_type: Vec<String>,

    /// Minimum budget in dollars
    #[arg(long)]
    pub budget_min: Option<f64>,

    /// Maximum budget in dollars
    #[arg(long)]
    pub budget_max: Option<f64>,

    /// Purchase timeline
    #[arg(long)]
    pub timeline: Option<String>,

    /// Lead source
    #[arg(long)]
    pub source: Option<String>,

    /// Lifecycle status (lead, qualified, active, under_contract, closed, inactive)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<BuyerStatus>,

    /// Buyer ID (for testing and advanced use cases)
    #[arg(long)]
    pub id: Option<String>,
}

/// Field edits for `dispo update`. Unset flags leave the field alone;
/// repeated flags (tags, locations, property types) replace the whole list.
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Buyer ID
    pub id: String,

    /// First name
    #[arg(long)]
    pub fname: Option<String>,

    /// Last name
    #[arg(long)]
    pub lname: Option<String>,

    /// Display name override
    #[arg(long)]
    pub full_name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Primary phone
    #[arg(long)]
    pub phone: Option<String>,

    /// Secondary phone
    #[arg(long)]
    pub phone2: Option<String>,

    /// Tertiary phone
    #[arg(long)]
    pub phone3: Option<String>,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    /// Priority score (0-100)
    #[arg(long, value_parser = parse_score)]
    pub score: Option<u8>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mailing street address
    #[arg(long)]
    pub mailing_address: Option<String>,

    /// Mailing city
    #[arg(long)]
    pub mailing_city: Option<String>,

    /// Mailing state
    #[arg(long)]
    pub mailing_state: Option<String>,

    /// Mailing ZIP code
    #[arg(long)]
    pub mailing_zip: Option<String>,

    /// Replace the target locations (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub location: Vec<String>,

    /// Replace the tag list (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Vetted flag (true/false)
    #[arg(long)]
    pub vetted: Option<bool>,

    /// VIP flag (true/false)
    #[arg(long)]
    pub vip: Option<bool>,

    /// SMS consent (true/false)
    #[arg(long)]
    pub can_sms: Option<bool>,

    /// Email consent (true/false)
    #[arg(long)]
    pub can_email: Option<bool>,

    /// Replace the property type interests (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub property_type: Vec<String>,

    /// Minimum budget in dollars
    #[arg(long)]
    pub budget_min: Option<f64>,

    /// Maximum budget in dollars
    #[arg(long)]
    pub budget_max: Option<f64>,

    /// Purchase timeline
    #[arg(long)]
    pub timeline: Option<String>,

    /// Lead source
    #[arg(long)]
    pub source: Option<String>,

    /// Lifecycle status
    #[arg(long, value_parser = parse_status)]
    pub status: Option<BuyerStatus>,
}

/// Arguments for `dispo export`
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Export mode: csv or json
    #[arg(long, value_parser = parse_export_mode, default_value = "csv")]
    pub mode: ExportMode,

    /// Output file path (default: buyers-export-<date>.<mode> in the current directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
