//! Tag registry records
//!
//! Tags live in their own table so they can carry a color and a
//! protection flag; buyers reference them by name in a denormalized
//! list. `usage_count` is recomputed from the buyer collection, never
//! hand-maintained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default color for new tags
pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

/// One registered tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Opaque unique id with the `tg-` prefix
    pub id: String,
    /// Unique display name; buyers reference tags by this
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Protected tags refuse deletion
    #[serde(default)]
    pub is_protected: bool,
    /// Number of buyers carrying the tag
    #[serde(default)]
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

impl Tag {
    /// Create a tag with defaults applied
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Tag {
            id: id.into(),
            name: name.into(),
            color: DEFAULT_TAG_COLOR.to_string(),
            is_protected: false,
            usage_count: 0,
            created_at: now,
        }
    }
}
