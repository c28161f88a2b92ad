//! Buyer records and lifecycle status
//!
//! A buyer is one row of the disposition list: contact info, score,
//! marketing consent flags, and segmentation attributes. Multi-valued
//! attributes (locations, tags, property types) are plain string lists.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::error::{DispoError, Result};

/// Property type presets offered by the intake form
pub const PROPERTY_TYPES: &[&str] = &[
    "Single Family",
    "Multi-Family",
    "Condo",
    "Townhouse",
    "Land",
    "Commercial",
    "Investment",
];

/// Purchase timeline presets
pub const TIMELINES: &[&str] = &[
    "ASAP",
    "1-3 months",
    "3-6 months",
    "6-12 months",
    "12+ months",
    "Just looking",
];

/// Acquisition source presets
pub const SOURCES: &[&str] = &[
    "Website",
    "Referral",
    "Social Media",
    "Cold Call",
    "Email Campaign",
    "Event",
    "Walk-in",
    "Other",
];

/// Default score for new buyers
pub const DEFAULT_SCORE: u8 = 50;

/// Buyer lifecycle status
///
/// `inactive` is a valid persisted value; legacy display lists that
/// omit it must still accept it on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuyerStatus {
    /// New, unqualified contact (default)
    #[default]
    Lead,
    /// Vetted and budget-confirmed
    Qualified,
    /// Actively looking at inventory
    Active,
    /// Has a property under contract
    UnderContract,
    /// Closed at least one deal
    Closed,
    /// No longer buying
    Inactive,
}

impl BuyerStatus {
    /// All valid statuses, in lifecycle order
    pub const ALL: &'static [BuyerStatus] = &[
        BuyerStatus::Lead,
        BuyerStatus::Qualified,
        BuyerStatus::Active,
        BuyerStatus::UnderContract,
        BuyerStatus::Closed,
        BuyerStatus::Inactive,
    ];

    /// Wire value used in storage and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            BuyerStatus::Lead => "lead",
            BuyerStatus::Qualified => "qualified",
            BuyerStatus::Active => "active",
            BuyerStatus::UnderContract => "under_contract",
            BuyerStatus::Closed => "closed",
            BuyerStatus::Inactive => "inactive",
        }
    }

    fn supported() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for BuyerStatus {
    type Err = DispoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lead" => Ok(BuyerStatus::Lead),
            "qualified" => Ok(BuyerStatus::Qualified),
            "active" => Ok(BuyerStatus::Active),
            "under_contract" => Ok(BuyerStatus::UnderContract),
            "closed" => Ok(BuyerStatus::Closed),
            "inactive" => Ok(BuyerStatus::Inactive),
            other => Err(DispoError::unsupported(
                "status",
                other,
                BuyerStatus::supported(),
            )),
        }
    }
}

impl fmt::Display for BuyerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One buyer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    /// Opaque unique id with the `by-` prefix
    pub id: String,
    #[serde(default)]
    pub fname: Option<String>,
    #[serde(default)]
    pub lname: Option<String>,
    /// Precomputed display name (takes precedence over fname/lname)
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub phone2: Option<String>,
    #[serde(default)]
    pub phone3: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// 0-100 hint; the store does not clamp
    #[serde(default = "default_score")]
    pub score: u8,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub mailing_address: Option<String>,
    #[serde(default)]
    pub mailing_city: Option<String>,
    #[serde(default)]
    pub mailing_state: Option<String>,
    #[serde(default)]
    pub mailing_zip: Option<String>,
    /// Markets the buyer covers
    #[serde(default)]
    pub locations: Vec<String>,
    /// Denormalized tag names
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub vetted: bool,
    #[serde(default)]
    pub vip: bool,
    #[serde(default = "default_true")]
    pub can_receive_sms: bool,
    #[serde(default = "default_true")]
    pub can_receive_email: bool,
    #[serde(default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: BuyerStatus,
    /// Stamped at import when the source record carries no timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_score() -> u8 {
    DEFAULT_SCORE
}

fn default_true() -> bool {
    true
}

impl Buyer {
    /// Create a blank buyer with defaults applied
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Buyer {
            id: id.into(),
            fname: None,
            lname: None,
            full_name: None,
            email: None,
            phone: None,
            phone2: None,
            phone3: None,
            company: None,
            score: DEFAULT_SCORE,
            notes: None,
            mailing_address: None,
            mailing_city: None,
            mailing_state: None,
            mailing_zip: None,
            locations: Vec::new(),
            tags: Vec::new(),
            vetted: false,
            vip: false,
            can_receive_sms: true,
            can_receive_email: true,
            property_types: Vec::new(),
            budget_min: None,
            budget_max: None,
            timeline: None,
            source: None,
            status: BuyerStatus::Lead,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name: full_name, else "fname lname", else whichever of
    /// the two exists, else "No Name".
    pub fn display_name(&self) -> String {
        if let Some(full) = non_empty(&self.full_name) {
            return full.to_string();
        }
        match (non_empty(&self.fname), non_empty(&self.lname)) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(f), None) => f.to_string(),
            (None, Some(l)) => l.to_string(),
            (None, None) => "No Name".to_string(),
        }
    }

    /// Validate intake rules: a name part is required, and the email
    /// shape is checked when present.
    pub fn validate(&self) -> Result<()> {
        if non_empty(&self.fname).is_none() && non_empty(&self.lname).is_none() {
            return Err(DispoError::UsageError(
                "at least a first or last name is required".to_string(),
            ));
        }
        if let Some(email) = non_empty(&self.email) {
            if let Some(re) = email_shape() {
                if !re.is_match(email) {
                    bail_invalid!("email", email);
                }
            }
        }
        Ok(())
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Loose intake shape: something@something.tld
fn email_shape() -> Option<Regex> {
    match Regex::new(r"^\S+@\S+\.\S+$") {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "failed to compile email pattern");
            None
        }
    }
}
