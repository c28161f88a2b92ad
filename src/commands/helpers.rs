//! Helper functions shared across command modules

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use crate::cli::{FilterArgs, SelectionArgs};
use dispo_core::bail_usage;
use dispo_core::buyer::Buyer;
use dispo_core::error::Result;
use dispo_core::state::{Action, ConsoleState};
use dispo_core::store::Store;

/// Ask the user a yes/no question on stdout and read the answer from
/// stdin. Anything other than `y`/`yes` counts as a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Resolve the buyer ids a bulk command acts on.
///
/// `--buyer` ids pass through untouched so the bulk layer can report
/// unknown ids per record. `--filtered` loads the collection and runs
/// the filter flags through the console state, selecting every match.
pub fn selected_buyer_ids(
    store: &Store,
    selection: &SelectionArgs,
    filter: &FilterArgs,
) -> Result<Vec<String>> {
    check_selection_flags(selection, filter)?;

    if !selection.buyer.is_empty() {
        return Ok(selection.buyer.clone());
    }

    let state = filtered_state(store, filter)?;
    Ok(state.selected().iter().map(|b| b.id.clone()).collect())
}

/// Resolve the full buyer records a command acts on.
///
/// Unlike [`selected_buyer_ids`], explicit `--buyer` ids are looked up
/// eagerly and an unknown id fails the command.
pub fn selected_buyers(
    store: &Store,
    selection: &SelectionArgs,
    filter: &FilterArgs,
) -> Result<Vec<Buyer>> {
    check_selection_flags(selection, filter)?;

    if !selection.buyer.is_empty() {
        let mut buyers = Vec::with_capacity(selection.buyer.len());
        for id in &selection.buyer {
            buyers.push(store.get_buyer(id)?);
        }
        return Ok(buyers);
    }

    let state = filtered_state(store, filter)?;
    Ok(state.selected().into_iter().cloned().collect())
}

fn check_selection_flags(selection: &SelectionArgs, filter: &FilterArgs) -> Result<()> {
    if !selection.buyer.is_empty() && selection.filtered {
        bail_usage!("--buyer and --filtered cannot be combined");
    }
    if selection.buyer.is_empty() && !selection.filtered {
        bail_usage!("select buyers with --buyer <ID> or --filtered");
    }
    if !selection.buyer.is_empty() && !filter.is_empty() {
        bail_usage!("filter flags require --filtered");
    }
    Ok(())
}

/// Load the collection, narrowed to group members when `--group` is set.
///
/// Membership is relational, not a buyer attribute, so the restriction
/// happens here rather than in the filter predicate. An unknown group
/// id fails the command.
pub fn load_working_set(store: &Store, filter: &FilterArgs) -> Result<Vec<Buyer>> {
    let mut buyers = store.buyers()?;
    if let Some(group_id) = &filter.group {
        let group = store.get_group(group_id)?;
        let members: HashSet<String> = store.db().member_ids(&group.id)?.into_iter().collect();
        buyers.retain(|b| members.contains(&b.id));
    }
    Ok(buyers)
}

/// Load the working set, apply the filter, and select every visible buyer
fn filtered_state(store: &Store, filter: &FilterArgs) -> Result<ConsoleState> {
    let mut state = ConsoleState::new();
    state.apply(Action::SetBuyers(load_working_set(store, filter)?));
    state.apply(Action::SetFilter(filter.to_filter()));
    state.apply(Action::ToggleAll);
    Ok(state)
}
