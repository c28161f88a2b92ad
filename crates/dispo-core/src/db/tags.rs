//! Tag registry storage

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::error::{DispoError, Result};
use crate::map_db_err;
use crate::tag::Tag;

const TAG_COLUMNS: &str = "id, name, color, is_protected, usage_count, created_at";

struct TagRow {
    id: String,
    name: String,
    color: String,
    is_protected: bool,
    usage_count: i64,
    created_at: String,
}

fn extract_tag_row(row: &rusqlite::Row) -> rusqlite::Result<TagRow> {
    Ok(TagRow {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        is_protected: row.get(3)?,
        usage_count: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn tag_from_row(raw: TagRow) -> Result<Tag> {
    let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DispoError::InvalidStore {
            reason: format!("bad created_at for tag {}: {}", raw.id, e),
        })?;

    Ok(Tag {
        id: raw.id,
        name: raw.name,
        color: raw.color,
        is_protected: raw.is_protected,
        usage_count: u64::try_from(raw.usage_count).unwrap_or(0),
        created_at,
    })
}

impl super::Database {
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM tags ORDER BY name", TAG_COLUMNS))
            .map_err(|e| DispoError::db_operation("prepare tag list", e))?;

        let rows = stmt
            .query_map([], extract_tag_row)
            .map_err(|e| DispoError::db_operation("list tags", e))?;

        let mut tags = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| DispoError::db_operation("read tag row", e))?;
            tags.push(tag_from_row(raw)?);
        }
        Ok(tags)
    }

    pub fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM tags WHERE name = ?1", TAG_COLUMNS))
            .map_err(|e| DispoError::db_operation("prepare tag query", e))?;

        let raw = match stmt.query_row(params![name], extract_tag_row) {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(DispoError::db_operation("load tag", e)),
        };

        tag_from_row(raw).map(Some)
    }

    pub fn insert_tag(&self, tag: &Tag) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO tags (id, name, color, is_protected, usage_count, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    tag.id,
                    tag.name,
                    tag.color,
                    tag.is_protected,
                    i64::try_from(tag.usage_count).unwrap_or(i64::MAX),
                    tag.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DispoError::db_operation(&format!("insert tag {}", tag.name), e))?;

        Ok(())
    }

    /// Delete a tag by name. Protected tags refuse deletion; the name
    /// is not stripped from buyer records (use a bulk remove for that).
    pub fn delete_tag(&self, name: &str) -> Result<()> {
        let tag = self
            .get_tag_by_name(name)?
            .ok_or_else(|| DispoError::not_found("tag", name))?;

        if tag.is_protected {
            return Err(DispoError::ProtectedTag {
                name: tag.name,
            });
        }

        self.conn
            .execute("DELETE FROM tags WHERE id = ?1", params![tag.id])
            .map_err(|e| DispoError::db_operation(&format!("delete tag {}", name), e))?;

        Ok(())
    }

    pub fn tag_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM tags")
            .map_err(|e| DispoError::db_operation("prepare tag id list", e))?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| DispoError::db_operation("list tag ids", e))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(|e| DispoError::db_operation("read tag id", e))?);
        }
        Ok(ids)
    }

    /// Recompute every tag's usage_count from the denormalized buyer
    /// tag lists. Names on buyers without a registry row are ignored.
    pub fn recount_tag_usage(&self) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, tags FROM buyers")
            .map_err(|e| map_db_err!("prepare usage recount", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| map_db_err!("scan buyer tags", e))?;

        let mut counts: std::collections::HashMap<String, i64> = std::collections::HashMap::new();
        for row in rows {
            let (buyer_id, tags_json) = row.map_err(|e| map_db_err!("read buyer tags", e))?;
            let names: Vec<String> =
                serde_json::from_str(&tags_json).map_err(|e| DispoError::InvalidStore {
                    reason: format!("bad tags for buyer {}: {}", buyer_id, e),
                })?;
            for name in names {
                *counts.entry(name).or_insert(0) += 1;
            }
        }

        self.conn
            .execute("UPDATE tags SET usage_count = 0", [])
            .map_err(|e| map_db_err!("reset tag usage", e))?;

        for (name, count) in counts {
            self.conn
                .execute(
                    "UPDATE tags SET usage_count = ?1 WHERE name = ?2",
                    params![count, name],
                )
                .map_err(|e| map_db_err!(&format!("recount tag {}", name), e))?;
        }

        Ok(())
    }
}
