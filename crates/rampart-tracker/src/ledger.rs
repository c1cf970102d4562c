//! Per-user attack record store.
//!
//! The ledger is the only shared mutable state in the defense. Records
//! are kept per user in append order behind a per-user mutex, with the
//! user map itself behind a read-mostly lock. Appends for one user are
//! serialized; different users append in parallel.
//!
//! History grows without bound for the lifetime of the process. There is
//! no eviction; [`AttackLedger::snapshot`] exists so operators can export
//! before a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Maximum characters of attacker input preserved in a record.
pub const MAX_SNIPPET_CHARS: usize = 200;

/// Truncates attacker-controlled text to the snippet limit.
///
/// Counts characters, not bytes, so multi-byte input never splits.
pub fn truncate_snippet(text: &str) -> String {
    text.chars().take(MAX_SNIPPET_CHARS).collect()
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// A single blocked input, as remembered by the ledger.
///
/// Created only when the guard blocks; clean traffic leaves no trace.
/// Serializes to one JSON object per record, which is the line format
/// the offline analyzer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRecord {
    /// User the input was attributed to.
    pub user_id: String,
    /// Milliseconds since the Unix epoch at record time.
    pub timestamp_ms: u64,
    /// Input excerpt, at most [`MAX_SNIPPET_CHARS`] characters.
    pub snippet: String,
    /// The guard's block reason.
    pub reason: String,
}

impl AttackRecord {
    /// Builds a record for `user_id`, truncating `text` to the snippet limit.
    pub fn new(user_id: impl Into<String>, text: &str, reason: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp_ms: now_millis(),
            snippet: truncate_snippet(text),
            reason: reason.into(),
        }
    }
}

type UserRecords = Arc<Mutex<Vec<AttackRecord>>>;

/// In-memory, per-user attack history.
#[derive(Debug, Default)]
pub struct AttackLedger {
    users: RwLock<HashMap<String, UserRecords>>,
}

impl AttackLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn user_entry(&self, user_id: &str) -> Result<UserRecords> {
        {
            let users = self.users.read().map_err(|_| TrackerError::LedgerPoisoned)?;
            if let Some(entry) = users.get(user_id) {
                return Ok(Arc::clone(entry));
            }
        }
        let mut users = self
            .users
            .write()
            .map_err(|_| TrackerError::LedgerPoisoned)?;
        Ok(Arc::clone(users.entry(user_id.to_string()).or_default()))
    }

    /// Appends a record and returns the user's new record count.
    ///
    /// The count is taken while the user's lock is held, so concurrent
    /// appends for one user observe strictly increasing counts and any
    /// particular count value is returned to exactly one caller.
    pub fn append(&self, record: AttackRecord) -> Result<usize> {
        let entry = self.user_entry(&record.user_id)?;
        let mut records = entry.lock().map_err(|_| TrackerError::LedgerPoisoned)?;
        records.push(record);
        Ok(records.len())
    }

    /// Number of records for `user_id`; zero for unseen users.
    pub fn count(&self, user_id: &str) -> Result<usize> {
        let users = self.users.read().map_err(|_| TrackerError::LedgerPoisoned)?;
        match users.get(user_id) {
            Some(entry) => Ok(entry.lock().map_err(|_| TrackerError::LedgerPoisoned)?.len()),
            None => Ok(0),
        }
    }

    /// The user's records in append order.
    pub fn records_for(&self, user_id: &str) -> Result<Vec<AttackRecord>> {
        let users = self.users.read().map_err(|_| TrackerError::LedgerPoisoned)?;
        match users.get(user_id) {
            Some(entry) => Ok(entry
                .lock()
                .map_err(|_| TrackerError::LedgerPoisoned)?
                .clone()),
            None => Ok(Vec::new()),
        }
    }

    /// Number of users with at least one record.
    pub fn user_count(&self) -> Result<usize> {
        Ok(self
            .users
            .read()
            .map_err(|_| TrackerError::LedgerPoisoned)?
            .len())
    }

    /// Total records across all users.
    pub fn total_records(&self) -> Result<usize> {
        let users = self.users.read().map_err(|_| TrackerError::LedgerPoisoned)?;
        let mut total = 0;
        for entry in users.values() {
            total += entry.lock().map_err(|_| TrackerError::LedgerPoisoned)?.len();
        }
        Ok(total)
    }

    /// Every record across all users, ordered by timestamp.
    pub fn snapshot(&self) -> Result<Vec<AttackRecord>> {
        let mut all = Vec::new();
        {
            let users = self.users.read().map_err(|_| TrackerError::LedgerPoisoned)?;
            for entry in users.values() {
                let records = entry.lock().map_err(|_| TrackerError::LedgerPoisoned)?;
                all.extend(records.iter().cloned());
            }
        }
        all.sort_by_key(|record| record.timestamp_ms);
        Ok(all)
    }
}
