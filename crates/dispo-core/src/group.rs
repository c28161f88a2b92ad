//! Buyer groups and folder classification
//!
//! Groups segment the buyer list; membership is a relational join on
//! `(buyer_id, group_id)`. The `criteria` payload is free-form JSON;
//! this system reads exactly one key from it, `folder`, which places
//! the group in one of the sidebar folders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DispoError, Result};

/// Folder ids recognized by the console
pub const FOLDERS: &[&str] = &[
    "priority-segments",
    "buyer-types",
    "engagement-status",
    "custom-groups",
];

/// Folder groups land in when `criteria.folder` is absent or unknown
pub const DEFAULT_FOLDER: &str = "custom-groups";

/// Default color for new groups
pub const DEFAULT_GROUP_COLOR: &str = "#3B82F6";

/// How a group's membership is maintained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Members are added and removed by hand (default)
    #[default]
    Manual,
    /// Members are derived from saved criteria
    Smart,
}

impl FromStr for GroupKind {
    type Err = DispoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(GroupKind::Manual),
            "smart" => Ok(GroupKind::Smart),
            other => Err(DispoError::unsupported("group type", other, "manual, smart")),
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Manual => write!(f, "manual"),
            GroupKind::Smart => write!(f, "smart"),
        }
    }
}

/// One buyer group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Opaque unique id with the `gr-` prefix
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: GroupKind,
    /// Free-form payload; only `folder` is interpreted here
    #[serde(default)]
    pub criteria: serde_json::Value,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a manual group with defaults applied
    pub fn new(id: impl Into<String>, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Group {
            id: id.into(),
            name: name.into(),
            description: None,
            kind: GroupKind::Manual,
            criteria: serde_json::Value::Null,
            color: Some(DEFAULT_GROUP_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// The folder this group is filed under
    pub fn folder(&self) -> &str {
        match self.criteria.get("folder").and_then(|v| v.as_str()) {
            Some(folder) if FOLDERS.contains(&folder) => folder,
            _ => DEFAULT_FOLDER,
        }
    }

    /// File the group under a folder, preserving any other criteria keys
    pub fn set_folder(&mut self, folder: &str) {
        if !self.criteria.is_object() {
            self.criteria = serde_json::json!({});
        }
        if let Some(obj) = self.criteria.as_object_mut() {
            obj.insert(
                "folder".to_string(),
                serde_json::Value::String(folder.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_defaults_to_custom() {
        let group = Group::new("gr-1", "Fix & Flip", Utc::now());
        assert_eq!(group.folder(), "custom-groups");
    }

    #[test]
    fn test_folder_round_trip() {
        let mut group = Group::new("gr-1", "VIP Buyers", Utc::now());
        group.set_folder("priority-segments");
        assert_eq!(group.folder(), "priority-segments");
    }

    #[test]
    fn test_unknown_folder_falls_back() {
        let mut group = Group::new("gr-1", "Misc", Utc::now());
        group.criteria = serde_json::json!({ "folder": "someday" });
        assert_eq!(group.folder(), "custom-groups");
    }

    #[test]
    fn test_set_folder_preserves_other_keys() {
        let mut group = Group::new("gr-1", "Hot List", Utc::now());
        group.criteria = serde_json::json!({ "min_score": 85 });
        group.set_folder("engagement-status");
        assert_eq!(group.folder(), "engagement-status");
        assert_eq!(group.criteria["min_score"], 85);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let group = Group::new("gr-1", "Landlords", Utc::now());
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["type"], "manual");
    }
}
