//! Bulk mutation coordinator
//!
//! Every operation takes an explicit list of buyer ids, keeps going
//! past per-record failures, and reports the outcome for every id.
//! Tag edits loop per buyer (each union/filter depends on that buyer's
//! current list); group removal and deletion run as single statements
//! over the ids that exist.

use serde::Serialize;

use crate::error::Result;
use crate::store::Store;
use crate::tag::Tag;

/// Outcome of one bulk operation
#[derive(Debug, Clone, Serialize)]
pub struct BulkReport {
    /// Operation name (`add-tags`, `delete`, ...)
    pub operation: String,
    /// Buyer ids the operation applied to
    pub succeeded: Vec<String>,
    /// Buyer ids it could not apply to, with reasons
    pub failed: Vec<BulkFailure>,
}

/// One buyer the operation skipped
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    pub id: String,
    pub reason: String,
}

impl BulkReport {
    fn new(operation: &str) -> Self {
        BulkReport {
            operation: operation.to_string(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn succeed(&mut self, id: &str) {
        self.succeeded.push(id.to_string());
    }

    fn fail(&mut self, id: &str, reason: impl std::fmt::Display) {
        self.failed.push(BulkFailure {
            id: id.to_string(),
            reason: reason.to_string(),
        });
    }

    /// True when every requested buyer was processed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drop repeated ids, keeping first-occurrence order
fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Union the given tags onto each buyer's tag list.
///
/// Names missing from the tag registry are registered with defaults
/// first, so usage counts stay meaningful.
#[tracing::instrument(skip(store, buyer_ids, tags), fields(buyers = buyer_ids.len(), tags = tags.len()))]
pub fn add_tags(store: &Store, buyer_ids: &[String], tags: &[String]) -> Result<BulkReport> {
    ensure_registered(store, tags)?;

    let mut report = BulkReport::new("add-tags");
    for id in dedup(buyer_ids) {
        let mut buyer = match store.get_buyer(&id) {
            Ok(buyer) => buyer,
            Err(e) => {
                report.fail(&id, e);
                continue;
            }
        };

        for tag in tags {
            if !buyer.tags.contains(tag) {
                buyer.tags.push(tag.clone());
            }
        }

        match store
            .db()
            .update_buyer_tags(&id, &buyer.tags, chrono::Utc::now())
        {
            Ok(()) => report.succeed(&id),
            Err(e) => report.fail(&id, e),
        }
    }

    tracing::debug!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "bulk add-tags done"
    );
    Ok(report)
}

/// Remove the given tags from each buyer's tag list
#[tracing::instrument(skip(store, buyer_ids, tags), fields(buyers = buyer_ids.len(), tags = tags.len()))]
pub fn remove_tags(store: &Store, buyer_ids: &[String], tags: &[String]) -> Result<BulkReport> {
    let mut report = BulkReport::new("remove-tags");
    for id in dedup(buyer_ids) {
        let mut buyer = match store.get_buyer(&id) {
            Ok(buyer) => buyer,
            Err(e) => {
                report.fail(&id, e);
                continue;
            }
        };

        buyer.tags.retain(|tag| !tags.contains(tag));

        match store
            .db()
            .update_buyer_tags(&id, &buyer.tags, chrono::Utc::now())
        {
            Ok(()) => report.succeed(&id),
            Err(e) => report.fail(&id, e),
        }
    }

    tracing::debug!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "bulk remove-tags done"
    );
    Ok(report)
}

/// Add buyers to a group. Buyers already in the group count as
/// succeeded; the membership row is unique per (buyer, group).
#[tracing::instrument(skip(store, buyer_ids), fields(buyers = buyer_ids.len(), group = %group_id))]
pub fn add_to_group(store: &Store, buyer_ids: &[String], group_id: &str) -> Result<BulkReport> {
    // Unknown group fails the whole operation, not each buyer
    let group = store.get_group(group_id)?;

    let mut report = BulkReport::new("add-to-group");
    for id in dedup(buyer_ids) {
        match store.db().buyer_exists(&id) {
            Ok(true) => {}
            Ok(false) => {
                report.fail(&id, format!("buyer not found: {}", id));
                continue;
            }
            Err(e) => {
                report.fail(&id, e);
                continue;
            }
        }

        match store.db().add_member(&id, &group.id, chrono::Utc::now()) {
            Ok(_) => report.succeed(&id),
            Err(e) => report.fail(&id, e),
        }
    }

    tracing::debug!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "bulk add-to-group done"
    );
    Ok(report)
}

/// Remove buyers from a group in one statement. Buyers that were not
/// members count as succeeded; the end state is the same.
#[tracing::instrument(skip(store, buyer_ids), fields(buyers = buyer_ids.len(), group = %group_id))]
pub fn remove_from_group(
    store: &Store,
    buyer_ids: &[String],
    group_id: &str,
) -> Result<BulkReport> {
    let group = store.get_group(group_id)?;

    let mut report = BulkReport::new("remove-from-group");
    let known = partition_known(store, &dedup(buyer_ids), &mut report)?;
    store.db().remove_members(&group.id, &known)?;
    for id in known {
        report.succeed(&id);
    }

    tracing::debug!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "bulk remove-from-group done"
    );
    Ok(report)
}

/// Delete buyers in one statement; membership rows cascade
#[tracing::instrument(skip(store, buyer_ids), fields(buyers = buyer_ids.len()))]
pub fn delete(store: &Store, buyer_ids: &[String]) -> Result<BulkReport> {
    let mut report = BulkReport::new("delete");
    let known = partition_known(store, &dedup(buyer_ids), &mut report)?;
    store.db().delete_buyers(&known)?;
    for id in known {
        report.succeed(&id);
    }

    tracing::debug!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "bulk delete done"
    );
    Ok(report)
}

/// Split requested ids into known buyers and not-found failures
fn partition_known(
    store: &Store,
    ids: &[String],
    report: &mut BulkReport,
) -> Result<Vec<String>> {
    let mut known = Vec::new();
    for id in ids {
        if store.db().buyer_exists(id)? {
            known.push(id.clone());
        } else {
            report.fail(id, format!("buyer not found: {}", id));
        }
    }
    Ok(known)
}

fn ensure_registered(store: &Store, tags: &[String]) -> Result<()> {
    for name in tags {
        if store.db().get_tag_by_name(name)?.is_none() {
            let existing: std::collections::HashSet<String> =
                store.db().tag_ids()?.into_iter().collect();
            let id = crate::id::generate(
                store.config().id_scheme,
                crate::id::TAG_PREFIX,
                name,
                &existing,
            );
            store.db().insert_tag(&Tag::new(id, name, chrono::Utc::now()))?;
        }
    }
    Ok(())
}
