//! Share tokens: a completed build as a URL-safe string.

use crate::engine::{Session, Stone};
use crate::record::BuildRecord;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The shared slice of a record: enough to view the result, nothing more.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct SharedResult {
    /// Collapse count when the build finished.
    attempt: u32,
    /// Seconds from session start to completion.
    time_secs: u64,
    /// Stones in the finished pyramid.
    stone_count: usize,
    /// The full placement list.
    shape: Vec<Stone>,
}

impl SharedResult {
    /// Extracts the shareable slice of a record.
    pub fn from_record(record: &BuildRecord) -> Self {
        Self {
            attempt: *record.attempt(),
            time_secs: *record.time_secs(),
            stone_count: *record.stone_count(),
            shape: record.shape().clone(),
        }
    }

    /// Builds a read-only viewing session, already complete.
    pub fn into_session(self) -> Session {
        Session::viewing(self.shape, self.attempt)
    }
}

/// Share token decode error.
#[derive(Debug, Clone, Display, Error)]
#[display("Share token error: {}", message)]
pub struct ShareError {
    /// Error message.
    pub message: String,
}

impl ShareError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Encodes a record into a URL-safe token.
#[instrument(skip(record), fields(stones = record.stone_count()))]
pub fn encode(record: &BuildRecord) -> String {
    let payload = SharedResult::from_record(record);
    // Serialization of a plain value cannot fail; hex keeps the token URL-safe.
    let json = serde_json::to_vec(&payload).expect("shared result serializes");
    let token = hex::encode(json);
    debug!(token_len = token.len(), "Encoded share token");
    token
}

/// Most columns a shared shape may reference. Tokens come from outside the
/// process, so a decoded shape is bounds-checked before it can size a
/// viewing session.
const SHARE_COLUMN_LIMIT: usize = 64;

/// Decodes a token back into a shared result.
///
/// # Errors
///
/// [`ShareError`] on malformed hex, an unreadable payload, or a shape that
/// references a column past [`SHARE_COLUMN_LIMIT`]; callers treat decode
/// failure as absence and fall back to a fresh session.
#[instrument(skip(token), fields(token_len = token.len()))]
pub fn decode(token: &str) -> Result<SharedResult, ShareError> {
    let bytes = hex::decode(token.trim())
        .map_err(|e| ShareError::new(format!("Invalid token encoding: {}", e)))?;
    let payload: SharedResult = serde_json::from_slice(&bytes)
        .map_err(|e| ShareError::new(format!("Unreadable token payload: {}", e)))?;
    if let Some(stone) = payload
        .shape
        .iter()
        .find(|s| s.column >= SHARE_COLUMN_LIMIT)
    {
        return Err(ShareError::new(format!(
            "Token shape places a stone in column {}, past the limit of {}",
            stone.column, SHARE_COLUMN_LIMIT
        )));
    }
    Ok(payload)
}
