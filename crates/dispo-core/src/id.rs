//! Record ID generation for dispo
//!
//! ID format: `<prefix><hash>` with adaptive length
//! - Buyers: `by-a1b2`, `by-f14c3`
//! - Groups: `gr-3e7a`
//! - Tags: `tg-9c01`
//! Collision-resistant for concurrent imports against the same store.
//!
//! Alternate scheme: `ulid` for time-ordered identifiers.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DispoError, Result};

/// Prefix for buyer ids
pub const BUYER_PREFIX: &str = "by-";
/// Prefix for group ids
pub const GROUP_PREFIX: &str = "gr-";
/// Prefix for tag ids
pub const TAG_PREFIX: &str = "tg-";

/// Minimum hash length (4 hex chars)
const MIN_HASH_LEN: usize = 4;
/// Maximum hash length (64 hex chars for SHA256)
const MAX_HASH_LEN: usize = 64;

/// ID generation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Hash-based IDs (default): `by-<hex>`
    #[default]
    Hash,
    /// ULID-based IDs: `by-<ulid>`
    Ulid,
}

impl FromStr for IdScheme {
    type Err = DispoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(IdScheme::Hash),
            "ulid" => Ok(IdScheme::Ulid),
            other => Err(DispoError::invalid_value("id scheme", other)),
        }
    }
}

/// Generate a new ID using the given scheme.
///
/// Hash IDs use adaptive length based on existing IDs to minimize
/// collisions while keeping IDs short.
pub fn generate(scheme: IdScheme, prefix: &str, seed: &str, existing_ids: &HashSet<String>) -> String {
    match scheme {
        IdScheme::Hash => generate_hash(prefix, seed, existing_ids),
        IdScheme::Ulid => generate_ulid(prefix),
    }
}

fn generate_hash(prefix: &str, seed: &str, existing_ids: &HashSet<String>) -> String {
    let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let input = format!("{}:{}:{}", seed, timestamp, rand_suffix());

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();
    let full_hex = hex::encode(hash);

    // Find minimum length that doesn't collide
    let mut len = MIN_HASH_LEN;
    loop {
        let candidate = format!("{}{}", prefix, &full_hex[..len]);
        if !existing_ids.contains(&candidate) || len >= MAX_HASH_LEN {
            return candidate;
        }
        len += 1;
    }
}

fn generate_ulid(prefix: &str) -> String {
    format!("{}{}", prefix, ulid::Ulid::new().to_string().to_lowercase())
}

/// Check that an id carries the expected prefix and a non-empty
/// alphanumeric suffix.
pub fn is_valid(id: &str, prefix: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(suffix) => !suffix.is_empty() && suffix.chars().all(|c| c.is_alphanumeric()),
        None => false,
    }
}

/// Generate a random suffix for hash uniqueness
fn rand_suffix() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    // Mix in nanoseconds for randomness
    duration.as_nanos() as u64 ^ (duration.as_secs() * 1_000_000_007)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_validation() {
        assert!(is_valid("by-a1b2", BUYER_PREFIX));
        assert!(is_valid("by-01j5kzqm1234", BUYER_PREFIX));
        assert!(is_valid("gr-f14c3", GROUP_PREFIX));

        assert!(!is_valid("invalid", BUYER_PREFIX));
        assert!(!is_valid("by-", BUYER_PREFIX));
        assert!(!is_valid("", BUYER_PREFIX));
        assert!(!is_valid("gr-a1b2", BUYER_PREFIX));
    }

    #[test]
    fn test_generate_hash_id() {
        let existing = HashSet::new();
        let id = generate(IdScheme::Hash, BUYER_PREFIX, "Jane Doe", &existing);
        assert!(id.starts_with("by-"));
        assert!(id.len() >= BUYER_PREFIX.len() + MIN_HASH_LEN);
        assert!(is_valid(&id, BUYER_PREFIX));
    }

    #[test]
    fn test_generate_hash_avoids_collisions() {
        let existing = HashSet::new();
        let id = generate(IdScheme::Hash, BUYER_PREFIX, "seed", &existing);

        // Pre-seed the set with the short form; a fresh generation against
        // it must widen rather than reuse the colliding candidate.
        let mut taken = HashSet::new();
        taken.insert(id.clone());
        let next = generate(IdScheme::Hash, BUYER_PREFIX, "seed", &taken);
        assert_ne!(id, next);
    }

    #[test]
    fn test_generate_ulid_id() {
        let existing = HashSet::new();
        let id = generate(IdScheme::Ulid, TAG_PREFIX, "", &existing);
        assert!(id.starts_with("tg-"));
        assert!(is_valid(&id, TAG_PREFIX));
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("hash".parse::<IdScheme>().unwrap(), IdScheme::Hash);
        assert_eq!("ULID".parse::<IdScheme>().unwrap(), IdScheme::Ulid);
        assert!("uuid".parse::<IdScheme>().is_err());
    }
}
