//! Completed-build records with absolute expiries.

use crate::engine::{Completion, Stone};
use chrono::{DateTime, Duration, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// How long a record survives after creation.
pub const RECORD_TTL_DAYS: i64 = 7;

/// How many records a listing shows.
pub const RECORD_LIST_LIMIT: usize = 5;

/// Snapshot of a completed build.
#[derive(Debug, Clone, PartialEq, Getters, new, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Collapse count when the build finished.
    attempt: u32,
    /// Seconds from session start to completion.
    time_secs: u64,
    /// Stones in the finished pyramid.
    stone_count: usize,
    /// The full placement list.
    shape: Vec<Stone>,
    /// When the build finished.
    timestamp: DateTime<Utc>,
    /// Experience after the completion bump.
    experience: u32,
    /// Absolute expiry; the record is dropped once this passes.
    expiry: DateTime<Utc>,
}

impl BuildRecord {
    /// Builds a record from a session completion, expiring
    /// [`RECORD_TTL_DAYS`] from `now`.
    pub fn from_completion(completion: &Completion, experience: u32, now: DateTime<Utc>) -> Self {
        Self {
            attempt: completion.attempt,
            time_secs: completion.elapsed_secs,
            stone_count: completion.stones.len(),
            shape: completion.stones.clone(),
            timestamp: now,
            experience,
            expiry: now + Duration::days(RECORD_TTL_DAYS),
        }
    }

    /// Whether the record has outlived its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }
}

/// Drops expired records in place.
pub fn prune(records: &mut Vec<BuildRecord>, now: DateTime<Utc>) {
    records.retain(|r| !r.is_expired(now));
}
