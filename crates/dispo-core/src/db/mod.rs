//! SQLite database module for dispo

mod buyers;
mod groups;
mod schema;
mod tags;

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DispoError, Result};

pub use schema::{create_schema, CURRENT_SCHEMA_VERSION};

/// Database file name inside the store directory
pub const DB_FILE: &str = "dispo.db";

/// SQLite database for dispo
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given store root
    pub fn open(store_root: &Path) -> Result<Self> {
        let db_path = store_root.join(DB_FILE);

        let conn = Connection::open(&db_path).map_err(|e| {
            DispoError::Other(format!(
                "failed to open database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DispoError::db_operation("enable WAL mode", e))?;

        // Membership rows cascade when a buyer or group is deleted
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| DispoError::db_operation("enable foreign keys", e))?;

        create_schema(&conn)?;

        Ok(Database { conn })
    }

    pub fn buyer_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM buyers", [], |r| r.get(0))
            .map_err(|e| DispoError::db_operation("get buyer count", e))
    }

    pub fn tag_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM tags", [], |r| r.get(0))
            .map_err(|e| DispoError::db_operation("get tag count", e))
    }

    pub fn group_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM buyer_groups", [], |r| r.get(0))
            .map_err(|e| DispoError::db_operation("get group count", e))
    }

    pub fn member_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM buyer_group_members", [], |r| r.get(0))
            .map_err(|e| DispoError::db_operation("get membership count", e))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Checkpoint the WAL so short-lived CLI invocations leave a
        // consistent file for the next process
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}
