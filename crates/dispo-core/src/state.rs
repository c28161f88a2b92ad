//! Application state container
//!
//! Holds the loaded buyer collection, the active filter criteria, and
//! the selection, with reducer-style transitions: every change goes
//! through [`ConsoleState::apply`], which re-establishes the invariant
//! that the selection is a subset of the visible set. This keeps the
//! filter/selection logic unit-testable with no interface layer.

use chrono::{DateTime, Utc};

use crate::buyer::Buyer;
use crate::query::{BuyerFilter, QuickFilter};
use crate::selection::Selection;

/// State transition actions
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the collection (data reload); clears the selection
    SetBuyers(Vec<Buyer>),
    /// Replace the filter criteria
    SetFilter(BuyerFilter),
    /// Toggle one quick filter
    ToggleQuick(QuickFilter),
    /// Reset criteria and quick filters
    ClearFilters,
    /// Toggle one buyer in the selection
    Toggle(String),
    /// Toggle-all against the visible set
    ToggleAll,
    /// Select the given ids (ids not visible are dropped)
    Select(Vec<String>),
    /// Clear the selection
    ClearSelection,
}

/// The console's working state
#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    buyers: Vec<Buyer>,
    filter: BuyerFilter,
    selection: Selection,
    /// Evaluation clock for rolling-window clauses
    now: Option<DateTime<Utc>>,
}

impl ConsoleState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the evaluation clock (tests); defaults to `Utc::now()`
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Apply one transition and re-establish the selection invariant
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetBuyers(buyers) => {
                self.buyers = buyers;
                // Conservative reload strategy: selection does not
                // survive a data reload.
                self.selection.clear();
            }
            Action::SetFilter(filter) => {
                self.filter = filter;
            }
            Action::ToggleQuick(quick) => {
                if let Some(pos) = self.filter.quick.iter().position(|q| *q == quick) {
                    self.filter.quick.remove(pos);
                } else {
                    self.filter.quick.push(quick);
                }
            }
            Action::ClearFilters => {
                self.filter = BuyerFilter::new();
            }
            Action::Toggle(id) => {
                self.selection.toggle(&id);
            }
            Action::ToggleAll => {
                let visible: Vec<String> =
                    self.visible().iter().map(|b| b.id.clone()).collect();
                self.selection
                    .toggle_all(visible.iter().map(|id| id.as_str()));
            }
            Action::Select(ids) => {
                self.selection.select_many(ids);
            }
            Action::ClearSelection => {
                self.selection.clear();
            }
        }
        self.prune();
    }

    /// Buyers matching the current criteria, in collection order
    pub fn visible(&self) -> Vec<&Buyer> {
        let now = self.clock();
        self.buyers
            .iter()
            .filter(|b| self.filter.matches(b, now))
            .collect()
    }

    /// Selected buyers, in collection order
    pub fn selected(&self) -> Vec<&Buyer> {
        self.buyers
            .iter()
            .filter(|b| self.selection.contains(&b.id))
            .collect()
    }

    /// True when the whole non-empty visible set is selected
    pub fn all_selected(&self) -> bool {
        let visible: Vec<&Buyer> = self.visible();
        self.selection
            .all_selected(visible.iter().map(|b| b.id.as_str()))
    }

    pub fn buyers(&self) -> &[Buyer] {
        &self.buyers
    }

    pub fn filter(&self) -> &BuyerFilter {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Drop selected ids that fell out of the visible set
    fn prune(&mut self) {
        let now = self.clock();
        let visible: Vec<&str> = self
            .buyers
            .iter()
            .filter(|b| self.filter.matches(b, now))
            .map(|b| b.id.as_str())
            .collect();
        self.selection.retain(visible);
    }

    fn clock(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}
