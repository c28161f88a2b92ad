//! Handlers for buyer-record commands: add, show, update, list

use chrono::Utc;

use crate::cli::{AddArgs, FilterArgs, UpdateArgs};
use crate::commands::format::print_records_header;
use crate::commands::helpers::load_working_set;
use crate::output_by_format_result;
use dispo_core::buyer::Buyer;
use dispo_core::error::{DispoError, Result};
use dispo_core::records::buyer_line;
use dispo_core::state::{Action, ConsoleState};
use dispo_core::store::Store;

use super::command::CommandContext;
use super::trace_command;

/// Copy every provided flag onto the buyer. Works for both the add and
/// update argument structs, which share field names.
macro_rules! apply_buyer_edits {
    ($buyer:expr, $args:expr) => {{
        if let Some(v) = &$args.fname {
            $buyer.fname = Some(v.clone());
        }
        if let Some(v) = &$args.lname {
            $buyer.lname = Some(v.clone());
        }
        if let Some(v) = &$args.full_name {
            $buyer.full_name = Some(v.clone());
        }
        if let Some(v) = &$args.email {
            $buyer.email = Some(v.clone());
        }
        if let Some(v) = &$args.phone {
            $buyer.phone = Some(v.clone());
        }
        if let Some(v) = &$args.phone2 {
            $buyer.phone2 = Some(v.clone());
        }
        if let Some(v) = &$args.phone3 {
            $buyer.phone3 = Some(v.clone());
        }
        if let Some(v) = &$args.company {
            $buyer.company = Some(v.clone());
        }
        if let Some(v) = &$args.notes {
            $buyer.notes = Some(v.clone());
        }
        if let Some(v) = &$args.mailing_address {
            $buyer.mailing_address = Some(v.clone());
        }
        if let Some(v) = &$args.mailing_city {
            $buyer.mailing_city = Some(v.clone());
        }
        if let Some(v) = &$args.mailing_state {
            $buyer.mailing_state = Some(v.clone());
        }
        if let Some(v) = &$args.mailing_zip {
            $buyer.mailing_zip = Some(v.clone());
        }
        if let Some(v) = &$args.timeline {
            $buyer.timeline = Some(v.clone());
        }
        if let Some(v) = &$args.source {
            $buyer.source = Some(v.clone());
        }
        if let Some(v) = $args.score {
            $buyer.score = v;
        }
        if let Some(v) = $args.vetted {
            $buyer.vetted = v;
        }
        if let Some(v) = $args.vip {
            $buyer.vip = v;
        }
        if let Some(v) = $args.can_sms {
            $buyer.can_receive_sms = v;
        }
        if let Some(v) = $args.can_email {
            $buyer.can_receive_email = v;
        }
        if let Some(v) = $args.budget_min {
            $buyer.budget_min = Some(v);
        }
        if let Some(v) = $args.budget_max {
            $buyer.budget_max = Some(v);
        }
        if let Some(v) = $args.status {
            $buyer.status = v;
        }
        if !$args.location.is_empty() {
            $buyer.locations = $args.location.clone();
        }
        if !$args.tag.is_empty() {
            $buyer.tags = $args.tag.clone();
        }
        if !$args.property_type.is_empty() {
            $buyer.property_types = $args.property_type.clone();
        }
    }};
}

pub(super) fn handle_add(ctx: &CommandContext, args: &AddArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let id = match &args.id {
        Some(id) => {
            if store.db().buyer_exists(id)? {
                return Err(DispoError::already_exists("buyer", id));
            }
            id.clone()
        }
        None => {
            let seed = format!(
                "{}|{}|{}",
                args.fname.as_deref().unwrap_or(""),
                args.lname.as_deref().unwrap_or(""),
                args.email.as_deref().unwrap_or("")
            );
            store.new_buyer_id(&seed)?
        }
    };

    let mut buyer = Buyer::new(id, Utc::now());
    buyer.status = store.config().default_status;
    apply_buyer_edits!(buyer, args);
    store.put_buyer(&buyer)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_mutation(ctx, &store, &buyer, "add", "Added")
}

pub(super) fn handle_show(ctx: &CommandContext, id: &str) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let buyer = store.get_buyer(id)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&buyer)?);
            Ok::<(), DispoError>(())
        },
        human => {
            print_buyer_details(&buyer);
        },
        records => {
            print_records_header(store.root(), "show", &[("buyers", "1".to_string())]);
            println!("{}", buyer_line(&buyer));
        }
    )
}

pub(super) fn handle_update(ctx: &CommandContext, args: &UpdateArgs) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let mut buyer = store.get_buyer(&args.id)?;
    apply_buyer_edits!(buyer, args);
    buyer.updated_at = Utc::now();
    store.put_buyer(&buyer)?;
    trace_command!(ctx.cli, ctx.start, "execute_command");

    output_mutation(ctx, &store, &buyer, "update", "Updated")
}

pub(super) fn handle_list(
    ctx: &CommandContext,
    filter: &FilterArgs,
    limit: Option<usize>,
) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    trace_command!(ctx.cli, ctx.start, "discover_store");

    let mut state = ConsoleState::new();
    state.apply(Action::SetBuyers(load_working_set(&store, filter)?));
    state.apply(Action::SetFilter(filter.to_filter()));

    let visible = state.visible();
    let total = visible.len();
    let shown: Vec<&Buyer> = match limit {
        Some(limit) => visible.into_iter().take(limit).collect(),
        None => visible,
    };
    trace_command!(ctx.cli, ctx.start, "apply_filter");

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&shown)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if shown.is_empty() {
                if !ctx.cli.quiet {
                    println!("No buyers found");
                }
            } else {
                for buyer in &shown {
                    println!("{}", list_line(buyer));
                }
                if shown.len() < total && !ctx.cli.quiet {
                    println!("({} of {} shown)", shown.len(), total);
                }
            }
        },
        records => {
            print_records_header(
                store.root(),
                "list",
                &[("buyers", shown.len().to_string())],
            );
            for buyer in &shown {
                println!("{}", buyer_line(buyer));
            }
        }
    )
}

/// Shared output for the add and update mutations
fn output_mutation(
    ctx: &CommandContext,
    store: &Store,
    buyer: &Buyer,
    mode: &str,
    verb: &str,
) -> Result<()> {
    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(buyer)?);
            Ok::<(), DispoError>(())
        },
        human => {
            if !ctx.cli.quiet {
                println!("{} buyer {} ({})", verb, buyer.id, buyer.display_name());
            }
        },
        records => {
            print_records_header(store.root(), mode, &[("buyers", "1".to_string())]);
            println!("{}", buyer_line(buyer));
        }
    )
}

/// One buyer per line: id, status, score, name, tags
pub(super) fn list_line(buyer: &Buyer) -> String {
    let tags = if buyer.tags.is_empty() {
        String::new()
    } else {
        format!(" tags={}", buyer.tags.join(","))
    };
    format!(
        "{} [{}] score={} {}{}",
        buyer.id,
        buyer.status,
        buyer.score,
        buyer.display_name(),
        tags
    )
}

fn print_buyer_details(buyer: &Buyer) {
    println!("{}  {}", buyer.id, buyer.display_name());
    detail("status", buyer.status);
    detail("score", buyer.score);
    detail_opt("email", &buyer.email);
    detail_opt("phone", &buyer.phone);
    detail_opt("phone2", &buyer.phone2);
    detail_opt("phone3", &buyer.phone3);
    detail_opt("company", &buyer.company);
    detail_list("tags", &buyer.tags);
    detail_list("locations", &buyer.locations);
    detail_list("property", &buyer.property_types);
    match (buyer.budget_min, buyer.budget_max) {
        (Some(min), Some(max)) => detail("budget", format!("{} - {}", min, max)),
        (Some(min), None) => detail("budget", format!("{}+", min)),
        (None, Some(max)) => detail("budget", format!("up to {}", max)),
        (None, None) => {}
    }
    detail_opt("timeline", &buyer.timeline);
    detail_opt("source", &buyer.source);
    detail(
        "flags",
        format!(
            "vip={} vetted={} sms={} email-ok={}",
            buyer.vip, buyer.vetted, buyer.can_receive_sms, buyer.can_receive_email
        ),
    );
    print_mailing(buyer);
    detail_opt("notes", &buyer.notes);
    detail("created", buyer.created_at.to_rfc3339());
    detail("updated", buyer.updated_at.to_rfc3339());
}

fn detail(label: &str, value: impl std::fmt::Display) {
    println!("  {:<11}{}", format!("{}:", label), value);
}

fn detail_opt(label: &str, value: &Option<String>) {
    if let Some(value) = value {
        detail(label, value);
    }
}

fn detail_list(label: &str, values: &[String]) {
    if !values.is_empty() {
        detail(label, values.join(", "));
    }
}

fn print_mailing(buyer: &Buyer) {
    let parts: Vec<&str> = [
        &buyer.mailing_address,
        &buyer.mailing_city,
        &buyer.mailing_state,
        &buyer.mailing_zip,
    ]
    .iter()
    .filter_map(|part| part.as_deref())
    .collect();
    if !parts.is_empty() {
        detail("mailing", parts.join(", "));
    }
}
