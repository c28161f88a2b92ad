//! Buyer row storage

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::buyer::{Buyer, BuyerStatus};
use crate::error::{DispoError, Result};

/// Column list shared by every buyer SELECT, in schema order
const BUYER_COLUMNS: &str = "id, fname, lname, full_name, email, phone, phone2, phone3, company, \
     score, notes, mailing_address, mailing_city, mailing_state, mailing_zip, \
     locations, tags, vetted, vip, can_receive_sms, can_receive_email, \
     property_types, budget_min, budget_max, timeline, source, status, \
     created_at, updated_at";

/// Raw column values before JSON/date/status decoding
struct BuyerRow {
    id: String,
    fname: Option<String>,
    lname: Option<String>,
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    phone2: Option<String>,
    phone3: Option<String>,
    company: Option<String>,
    score: u8,
    notes: Option<String>,
    mailing_address: Option<String>,
    mailing_city: Option<String>,
    mailing_state: Option<String>,
    mailing_zip: Option<String>,
    locations_json: String,
    tags_json: String,
    vetted: bool,
    vip: bool,
    can_receive_sms: bool,
    can_receive_email: bool,
    property_types_json: String,
    budget_min: Option<f64>,
    budget_max: Option<f64>,
    timeline: Option<String>,
    source: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

fn extract_buyer_row(row: &rusqlite::Row) -> rusqlite::Result<BuyerRow> {
    Ok(BuyerRow {
        id: row.get(0)?,
        fname: row.get(1)?,
        lname: row.get(2)?,
        full_name: row.get(3)?,
        email: row.get(4)?,
        phone: row.get(5)?,
        phone2: row.get(6)?,
        phone3: row.get(7)?,
        company: row.get(8)?,
        score: row.get(9)?,
        notes: row.get(10)?,
        mailing_address: row.get(11)?,
        mailing_city: row.get(12)?,
        mailing_state: row.get(13)?,
        mailing_zip: row.get(14)?,
        locations_json: row.get(15)?,
        tags_json: row.get(16)?,
        vetted: row.get(17)?,
        vip: row.get(18)?,
        can_receive_sms: row.get(19)?,
        can_receive_email: row.get(20)?,
        property_types_json: row.get(21)?,
        budget_min: row.get(22)?,
        budget_max: row.get(23)?,
        timeline: row.get(24)?,
        source: row.get(25)?,
        status: row.get(26)?,
        created_at: row.get(27)?,
        updated_at: row.get(28)?,
    })
}

fn buyer_from_row(raw: BuyerRow) -> Result<Buyer> {
    let status = raw.status.parse::<BuyerStatus>().map_err(|_| {
        DispoError::InvalidStore {
            reason: format!("unknown status '{}' for buyer {}", raw.status, raw.id),
        }
    })?;

    Ok(Buyer {
        locations: parse_list("locations", &raw.id, &raw.locations_json)?,
        tags: parse_list("tags", &raw.id, &raw.tags_json)?,
        property_types: parse_list("property_types", &raw.id, &raw.property_types_json)?,
        created_at: parse_datetime("created_at", &raw.id, &raw.created_at)?,
        updated_at: parse_datetime("updated_at", &raw.id, &raw.updated_at)?,
        status,
        id: raw.id,
        fname: raw.fname,
        lname: raw.lname,
        full_name: raw.full_name,
        email: raw.email,
        phone: raw.phone,
        phone2: raw.phone2,
        phone3: raw.phone3,
        company: raw.company,
        score: raw.score,
        notes: raw.notes,
        mailing_address: raw.mailing_address,
        mailing_city: raw.mailing_city,
        mailing_state: raw.mailing_state,
        mailing_zip: raw.mailing_zip,
        vetted: raw.vetted,
        vip: raw.vip,
        can_receive_sms: raw.can_receive_sms,
        can_receive_email: raw.can_receive_email,
        budget_min: raw.budget_min,
        budget_max: raw.budget_max,
        timeline: raw.timeline,
        source: raw.source,
    })
}

fn parse_list(field: &str, buyer_id: &str, json: &str) -> Result<Vec<String>> {
    serde_json::from_str(json).map_err(|e| DispoError::InvalidStore {
        reason: format!("bad {} for buyer {}: {}", field, buyer_id, e),
    })
}

fn parse_datetime(field: &str, buyer_id: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DispoError::InvalidStore {
            reason: format!("bad {} for buyer {}: {}", field, buyer_id, e),
        })
}

impl super::Database {
    pub fn insert_buyer(&self, buyer: &Buyer) -> Result<()> {
        let locations_json = serde_json::to_string(&buyer.locations)?;
        let tags_json = serde_json::to_string(&buyer.tags)?;
        let property_types_json = serde_json::to_string(&buyer.property_types)?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO buyers (id, fname, lname, full_name, email, phone, phone2, phone3, company, score, notes, mailing_address, mailing_city, mailing_state, mailing_zip, locations, tags, vetted, vip, can_receive_sms, can_receive_email, property_types, budget_min, budget_max, timeline, source, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29)",
                params![
                    buyer.id,
                    buyer.fname,
                    buyer.lname,
                    buyer.full_name,
                    buyer.email,
                    buyer.phone,
                    buyer.phone2,
                    buyer.phone3,
                    buyer.company,
                    buyer.score,
                    buyer.notes,
                    buyer.mailing_address,
                    buyer.mailing_city,
                    buyer.mailing_state,
                    buyer.mailing_zip,
                    locations_json,
                    tags_json,
                    buyer.vetted,
                    buyer.vip,
                    buyer.can_receive_sms,
                    buyer.can_receive_email,
                    property_types_json,
                    buyer.budget_min,
                    buyer.budget_max,
                    buyer.timeline,
                    buyer.source,
                    buyer.status.as_str(),
                    buyer.created_at.to_rfc3339(),
                    buyer.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| DispoError::buyer_operation(&buyer.id, "insert", e))?;

        Ok(())
    }

    pub fn get_buyer(&self, id: &str) -> Result<Option<Buyer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM buyers WHERE id = ?1", BUYER_COLUMNS))
            .map_err(|e| DispoError::db_operation("prepare buyer query", e))?;

        let raw = match stmt.query_row(params![id], extract_buyer_row) {
            Ok(raw) => raw,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(DispoError::buyer_operation(id, "load", e)),
        };

        buyer_from_row(raw).map(Some)
    }

    /// All buyers, newest first (the console's load order)
    pub fn list_buyers(&self) -> Result<Vec<Buyer>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {} FROM buyers ORDER BY created_at DESC, id",
                BUYER_COLUMNS
            ))
            .map_err(|e| DispoError::db_operation("prepare buyer list", e))?;

        let rows = stmt
            .query_map([], extract_buyer_row)
            .map_err(|e| DispoError::db_operation("list buyers", e))?;

        let mut buyers = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| DispoError::db_operation("read buyer row", e))?;
            buyers.push(buyer_from_row(raw)?);
        }
        Ok(buyers)
    }

    pub fn buyer_exists(&self, id: &str) -> Result<bool> {
        self.conn
            .query_row("SELECT 1 FROM buyers WHERE id = ?1", params![id], |_| Ok(()))
            .map(|_| true)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(false),
                other => Err(DispoError::buyer_operation(id, "check", other)),
            })
    }

    pub fn buyer_ids(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM buyers")
            .map_err(|e| DispoError::db_operation("prepare buyer id list", e))?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| DispoError::db_operation("list buyer ids", e))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(|e| DispoError::db_operation("read buyer id", e))?);
        }
        Ok(ids)
    }

    /// Replace a buyer's denormalized tag list
    pub fn update_buyer_tags(
        &self,
        buyer_id: &str,
        tags: &[String],
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let tags_json = serde_json::to_string(tags)?;
        let updated = self
            .conn
            .execute(
                "UPDATE buyers SET tags = ?1, updated_at = ?2 WHERE id = ?3",
                params![tags_json, updated_at.to_rfc3339(), buyer_id],
            )
            .map_err(|e| DispoError::buyer_operation(buyer_id, "update tags for", e))?;

        if updated == 0 {
            return Err(DispoError::BuyerNotFound {
                id: buyer_id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete buyers in one statement; membership rows cascade.
    /// Returns the number of rows actually removed.
    pub fn delete_buyers(&self, ids: &[String]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("DELETE FROM buyers WHERE id IN ({})", placeholders);
        self.conn
            .execute(&sql, rusqlite::params_from_iter(ids.iter()))
            .map_err(|e| DispoError::db_operation("delete buyers", e))
    }
}
