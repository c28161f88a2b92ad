//! Buyer filtering utilities
//!
//! All clauses are AND-ed; an unset clause imposes no constraint.
//! Evaluation is pure and total: missing fields never match a search
//! term but never fail either.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::buyer::Buyer;
use crate::error::{DispoError, Result};

/// Minimum score for the `high-score` quick filter
pub const HIGH_SCORE_MIN: u8 = 80;
/// Minimum score for the `hot` quick filter
pub const HOT_SCORE_MIN: u8 = 85;
/// Rolling window for the `new` quick filter
pub const NEW_WINDOW_DAYS: i64 = 7;

/// Three-way constraint on a boolean buyer attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagFilter {
    /// No constraint (default)
    #[default]
    Any,
    /// Attribute must be true
    Yes,
    /// Attribute must be false
    No,
}

impl FlagFilter {
    fn allows(&self, value: bool) -> bool {
        match self {
            FlagFilter::Any => true,
            FlagFilter::Yes => value,
            FlagFilter::No => !value,
        }
    }
}

impl FromStr for FlagFilter {
    type Err = DispoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "any" => Ok(FlagFilter::Any),
            "yes" | "true" => Ok(FlagFilter::Yes),
            "no" | "false" => Ok(FlagFilter::No),
            other => Err(DispoError::unsupported("flag filter", other, "any, yes, no")),
        }
    }
}

impl fmt::Display for FlagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagFilter::Any => write!(f, "any"),
            FlagFilter::Yes => write!(f, "yes"),
            FlagFilter::No => write!(f, "no"),
        }
    }
}

/// One-click filter toggles layered on top of the structured criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickFilter {
    /// VIP flag set
    Vip,
    /// Score >= 80
    HighScore,
    /// Score >= 85
    Hot,
    /// Created within the last 7 days (rolling)
    New,
}

impl FromStr for QuickFilter {
    type Err = DispoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "vip" => Ok(QuickFilter::Vip),
            "high-score" | "highscore" => Ok(QuickFilter::HighScore),
            "hot" => Ok(QuickFilter::Hot),
            "new" => Ok(QuickFilter::New),
            other => Err(DispoError::unsupported(
                "quick filter",
                other,
                "vip, high-score, hot, new",
            )),
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuickFilter::Vip => write!(f, "vip"),
            QuickFilter::HighScore => write!(f, "high-score"),
            QuickFilter::Hot => write!(f, "hot"),
            QuickFilter::New => write!(f, "new"),
        }
    }
}

/// Filter configuration for buyers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuyerFilter {
    /// Free-text search over name, email, phone, company
    pub search: Option<String>,
    /// Required tags (every one must match, substring)
    pub tags: Vec<String>,
    /// Excluded tags (none may match, substring)
    pub exclude_tags: Vec<String>,
    /// Required locations (any one must match, substring)
    pub locations: Vec<String>,
    /// Minimum score, inclusive
    pub min_score: Option<u8>,
    /// Maximum score, inclusive
    pub max_score: Option<u8>,
    /// VIP constraint
    pub vip: FlagFilter,
    /// Vetted constraint
    pub vetted: FlagFilter,
    /// Email-consent constraint
    pub email: FlagFilter,
    /// SMS-consent constraint
    pub sms: FlagFilter,
    /// Exclude buyers created strictly before this instant
    pub created_after: Option<DateTime<Utc>>,
    /// Exclude buyers created strictly after this instant
    pub created_before: Option<DateTime<Utc>>,
    /// Required property type (exact membership)
    pub property_type: Option<String>,
    /// Active quick-filter toggles
    pub quick: Vec<QuickFilter>,
}

impl BuyerFilter {
    /// Create a new filter with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Set the required tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the excluded tags
    pub fn with_exclude_tags(mut self, tags: Vec<String>) -> Self {
        self.exclude_tags = tags;
        self
    }

    /// Set the required locations
    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.locations = locations;
        self
    }

    /// Set the inclusive score bounds
    pub fn with_score_range(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        self.min_score = min;
        self.max_score = max;
        self
    }

    /// Set the VIP constraint
    pub fn with_vip(mut self, vip: FlagFilter) -> Self {
        self.vip = vip;
        self
    }

    /// Set the vetted constraint
    pub fn with_vetted(mut self, vetted: FlagFilter) -> Self {
        self.vetted = vetted;
        self
    }

    /// Set the email-consent constraint
    pub fn with_email(mut self, email: FlagFilter) -> Self {
        self.email = email;
        self
    }

    /// Set the SMS-consent constraint
    pub fn with_sms(mut self, sms: FlagFilter) -> Self {
        self.sms = sms;
        self
    }

    /// Set the creation-date bounds
    pub fn with_created_range(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_after = after;
        self.created_before = before;
        self
    }

    /// Set the required property type
    pub fn with_property_type(mut self, property_type: Option<String>) -> Self {
        self.property_type = property_type;
        self
    }

    /// Set the quick-filter toggles
    pub fn with_quick(mut self, quick: Vec<QuickFilter>) -> Self {
        self.quick = quick;
        self
    }

    /// True when no clause is configured
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check if a buyer matches all configured clauses.
    ///
    /// `now` anchors the rolling window of the `new` quick filter so
    /// evaluation stays deterministic under test.
    pub fn matches(&self, buyer: &Buyer, now: DateTime<Utc>) -> bool {
        if !self.matches_search(buyer) {
            return false;
        }

        if !self.matches_required_tags(buyer) {
            return false;
        }

        if !self.matches_excluded_tags(buyer) {
            return false;
        }

        if !self.matches_locations(buyer) {
            return false;
        }

        if !self.matches_flags(buyer) {
            return false;
        }

        if !self.matches_score(buyer) {
            return false;
        }

        if !self.matches_created(buyer) {
            return false;
        }

        if !self.matches_property_type(buyer) {
            return false;
        }

        if !self.matches_quick(buyer, now) {
            return false;
        }

        true
    }

    /// Check free-text search across name, email, phone, company
    fn matches_search(&self, buyer: &Buyer) -> bool {
        let Some(ref search) = self.search else {
            return true;
        };
        if search.is_empty() {
            return true;
        }
        let term = search.to_lowercase();
        [
            &buyer.fname,
            &buyer.lname,
            &buyer.email,
            &buyer.phone,
            &buyer.company,
        ]
        .iter()
        .any(|field| contains_ci(field.as_deref(), &term))
    }

    /// Every required tag must substring-match one of the buyer's tags
    fn matches_required_tags(&self, buyer: &Buyer) -> bool {
        self.tags.iter().all(|required| {
            let required = required.to_lowercase();
            buyer
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&required))
        })
    }

    /// No excluded tag may substring-match any of the buyer's tags
    fn matches_excluded_tags(&self, buyer: &Buyer) -> bool {
        !self.exclude_tags.iter().any(|excluded| {
            let excluded = excluded.to_lowercase();
            buyer
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&excluded))
        })
    }

    /// Any one required location may match city, state, or the
    /// buyer's target locations (OR, unlike the tags clause)
    fn matches_locations(&self, buyer: &Buyer) -> bool {
        if self.locations.is_empty() {
            return true;
        }
        self.locations.iter().any(|required| {
            let term = required.to_lowercase();
            contains_ci(buyer.mailing_city.as_deref(), &term)
                || contains_ci(buyer.mailing_state.as_deref(), &term)
                || buyer
                    .locations
                    .iter()
                    .any(|loc| loc.to_lowercase().contains(&term))
        })
    }

    /// Check the four three-way flag constraints
    fn matches_flags(&self, buyer: &Buyer) -> bool {
        self.vip.allows(buyer.vip)
            && self.vetted.allows(buyer.vetted)
            && self.email.allows(buyer.can_receive_email)
            && self.sms.allows(buyer.can_receive_sms)
    }

    /// Check inclusive score bounds
    fn matches_score(&self, buyer: &Buyer) -> bool {
        if let Some(min) = self.min_score {
            if buyer.score < min {
                return false;
            }
        }
        if let Some(max) = self.max_score {
            if buyer.score > max {
                return false;
            }
        }
        true
    }

    /// Exclude buyers strictly outside the creation-date bounds
    fn matches_created(&self, buyer: &Buyer) -> bool {
        if let Some(after) = self.created_after {
            if buyer.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if buyer.created_at > before {
                return false;
            }
        }
        true
    }

    /// Check exact property-type membership
    fn matches_property_type(&self, buyer: &Buyer) -> bool {
        if let Some(ref property_type) = self.property_type {
            buyer.property_types.iter().any(|pt| pt == property_type)
        } else {
            true
        }
    }

    /// Check every active quick-filter toggle
    fn matches_quick(&self, buyer: &Buyer, now: DateTime<Utc>) -> bool {
        self.quick.iter().all(|quick| match quick {
            QuickFilter::Vip => buyer.vip,
            QuickFilter::HighScore => buyer.score >= HIGH_SCORE_MIN,
            QuickFilter::Hot => buyer.score >= HOT_SCORE_MIN,
            QuickFilter::New => buyer.created_at >= now - Duration::days(NEW_WINDOW_DAYS),
        })
    }
}

fn contains_ci(field: Option<&str>, lowered_term: &str) -> bool {
    field
        .map(|value| value.to_lowercase().contains(lowered_term))
        .unwrap_or(false)
}
