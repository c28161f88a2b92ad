//! SQLite database schema for dispo

use rusqlite::Connection;

use crate::error::{DispoError, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

const SCHEMA_SQL: &str = r#"
-- Buyer records (multi-valued attributes stored as JSON arrays)
CREATE TABLE IF NOT EXISTS buyers (
    id TEXT PRIMARY KEY,
    fname TEXT,
    lname TEXT,
    full_name TEXT,
    email TEXT,
    phone TEXT,
    phone2 TEXT,
    phone3 TEXT,
    company TEXT,
    score INTEGER NOT NULL DEFAULT 50,
    notes TEXT,
    mailing_address TEXT,
    mailing_city TEXT,
    mailing_state TEXT,
    mailing_zip TEXT,
    locations TEXT NOT NULL DEFAULT '[]',
    tags TEXT NOT NULL DEFAULT '[]',
    vetted INTEGER NOT NULL DEFAULT 0,
    vip INTEGER NOT NULL DEFAULT 0,
    can_receive_sms INTEGER NOT NULL DEFAULT 1,
    can_receive_email INTEGER NOT NULL DEFAULT 1,
    property_types TEXT NOT NULL DEFAULT '[]',
    budget_min REAL,
    budget_max REAL,
    timeline TEXT,
    source TEXT,
    status TEXT NOT NULL DEFAULT 'lead',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_buyers_score ON buyers(score);
CREATE INDEX IF NOT EXISTS idx_buyers_status ON buyers(status);
CREATE INDEX IF NOT EXISTS idx_buyers_created ON buyers(created_at);

-- Tag registry (buyers reference tags by name)
CREATE TABLE IF NOT EXISTS tags (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    color TEXT NOT NULL DEFAULT '#3B82F6',
    is_protected INTEGER NOT NULL DEFAULT 0,
    usage_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Buyer groups
CREATE TABLE IF NOT EXISTS buyer_groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    type TEXT NOT NULL DEFAULT 'manual',
    criteria TEXT NOT NULL DEFAULT 'null',
    color TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Group membership; one row per (buyer, group) pair
CREATE TABLE IF NOT EXISTS buyer_group_members (
    buyer_id TEXT NOT NULL REFERENCES buyers(id) ON DELETE CASCADE,
    group_id TEXT NOT NULL REFERENCES buyer_groups(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    PRIMARY KEY (buyer_id, group_id)
);
CREATE INDEX IF NOT EXISTS idx_members_group ON buyer_group_members(group_id);

-- Store metadata
CREATE TABLE IF NOT EXISTS store_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Create the schema if missing and verify the stored version.
///
/// The database is the only copy of the data, so an unexpected version
/// is an error rather than a drop-and-rebuild.
pub fn create_schema(conn: &Connection) -> Result<()> {
    let current_version: Option<i32> = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok();

    match current_version {
        None => {
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| DispoError::db_operation("create database schema", e))?;
            conn.execute(
                "INSERT OR REPLACE INTO store_meta (key, value) VALUES ('schema_version', ?1)",
                [&CURRENT_SCHEMA_VERSION.to_string()],
            )
            .map_err(|e| DispoError::db_operation("record schema version", e))?;
            Ok(())
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(v) => Err(DispoError::InvalidStore {
            reason: format!(
                "database schema version {} is not supported (expected {})",
                v, CURRENT_SCHEMA_VERSION
            ),
        }),
    }
}
