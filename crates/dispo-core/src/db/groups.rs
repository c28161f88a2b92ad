//! Buyer group and membership storage

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::error::{DispoError, Result};
use crate::group::{Group, GroupKind};

const GROUP_COLUMNS: &str = "id, name, description, type, criteria, color, created_at, updated_at";

struct GroupRow {
    id: String,
    name: String,
    description: Option<String>,
    kind: String,
    criteria_json: String,
    color: Option<String>,
    created_at: String,
    updated_at: String,
}

fn extract_group_row(row: &rusqlite::Row) -> rusqlite::Result<GroupRow> {
    Ok(GroupRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        kind: row.get(3)?,
        criteria_json: row.get(4)?,
        color: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn group_from_row(raw: GroupRow) -> Result<Group> {
    let kind = raw.kind.parse::<GroupKind>().map_err(|_| {
        DispoError::InvalidStore {
            reason: format!("unknown type '{}' for group {}", raw.kind, raw.id),
        }
    })?;
    let criteria =
        serde_json::from_str(&raw.criteria_json).map_err(|e| DispoError::InvalidStore {
            reason: format!("bad criteria for group {}: {}", raw.id, e),
        })?;

    Ok(Group {
        created_at: parse_datetime("created_at", &raw.id, &raw.created_at)?,
        updated_at: parse_datetime("updated_at", &raw.id, &raw.updated_at)?,
        id: raw.id,
        name: raw.name,
        description: raw.description,
        kind,
        criteria,
        color: raw.color,
    })
}

fn parse_datetime(field: &str, group_id: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DispoError::InvalidStore {
            reason: format!("bad {} for group {}: {}", field, group_id, e),
        })
}

impl super::Database {
    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM buyer_groups ORDER BY name",
                GROUP_COLUMNS
            ))
            .map_err(|e| DispoError::db_operation("prepare group list", e))?;

        let rows = stmt
            .query_map([], extract_group_row)
            .map_err(|e| DispoError::db_operation("list groups", e))?;

        let mut groups = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| DispoError::db_operation("read group row", e))?;
            groups.push(group_from_row(raw)?);
        }
        Ok(groups)
    }

    pub fn get_group(&self, id: &str) -> Result<Option<Group>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM buyer_groups WHERE id = ?1",
                GROUP_COLUMNS
            ))
            .map_err(|e| DispoError::db_operation("prepare group query", e))?;

        let raw = match stmt.query_row(params![id], extract_group_row) {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(DispoError::db_operation(&format!("load group {}", id), e)),
        };

        group_from_row(raw).map(Some)
    }

    pub fn insert_group(&self, group: &Group) -> Result<()> {
        let criteria_json = serde_json::to_string(&group.criteria)?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO buyer_groups (id, name, description, type, criteria, color, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    group.id,
                    group.name,
                    group.description,
                    group.kind.to_string(),
                    criteria_json,
                    group.color,
                    group.created_at.to_rfc3339(),
                    group.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DispoError::db_operation(&format!("insert group {}", group.id), e))?;

        Ok(())
    }

    /// Delete a group; membership rows cascade
    pub fn delete_group(&self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM buyer_groups WHERE id = ?1", params![id])
            .map_err(|e| DispoError::db_operation(&format!("delete group {}", id), e))?;

        if deleted == 0 {
            return Err(DispoError::not_found("group", id));
        }
        Ok(())
    }

    pub fn group_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM buyer_groups")
            .map_err(|e| DispoError::db_operation("prepare group id list", e))?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| DispoError::db_operation("list group ids", e))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(|e| DispoError::db_operation("read group id", e))?);
        }
        Ok(ids)
    }

    /// Add a buyer to a group. Returns false when the membership row
    /// already existed (duplicate adds are not an error).
    pub fn add_member(
        &self,
        buyer_id: &str,
        group_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO buyer_group_members (buyer_id, group_id, created_at) VALUES (?1, ?2, ?3)",
                params![buyer_id, group_id, now.to_rfc3339()],
            )
            .map_err(|e| {
                DispoError::buyer_operation(buyer_id, &format!("add to group {}", group_id), e)
            })?;

        Ok(inserted > 0)
    }

    /// Remove buyers from one group in a single statement.
    /// Returns the number of membership rows removed.
    pub fn remove_members(&self, group_id: &str, buyer_ids: &[String]) -> Result<usize> {
        if buyer_ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; buyer_ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM buyer_group_members WHERE group_id = ?1 AND buyer_id IN ({})",
            placeholders
        );
        let bindings = std::iter::once(group_id).chain(buyer_ids.iter().map(String::as_str));
        self.conn
            .execute(&sql, rusqlite::params_from_iter(bindings))
            .map_err(|e| DispoError::db_operation(&format!("remove members from {}", group_id), e))
    }

    pub fn member_ids(&self, group_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT buyer_id FROM buyer_group_members WHERE group_id = ?1 ORDER BY created_at, buyer_id",
            )
            .map_err(|e| DispoError::db_operation("prepare member list", e))?;

        let rows = stmt
            .query_map(params![group_id], |row| row.get(0))
            .map_err(|e| DispoError::db_operation("list members", e))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(|e| DispoError::db_operation("read member id", e))?);
        }
        Ok(ids)
    }

    /// Member counts keyed by group id; groups with no members are absent
    pub fn member_counts(&self) -> Result<HashMap<String, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT group_id, COUNT(*) FROM buyer_group_members GROUP BY group_id")
            .map_err(|e| DispoError::db_operation("prepare member counts", e))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| DispoError::db_operation("count members", e))?;

        let mut counts = HashMap::new();
        for row in rows {
            let (group_id, count): (String, i64) =
                row.map_err(|e| DispoError::db_operation("read member count", e))?;
            counts.insert(group_id, count);
        }
        Ok(counts)
    }
}
