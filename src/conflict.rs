use chrono::{DateTime, Utc};

use crate::state::ResourceRecord;

/// Where the remote copy stands relative to the last local sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    /// Remote has not moved since we last exchanged content for this key.
    Unchanged,
    /// Remote was modified after our last sync; pushing would overwrite
    /// newer work without a prompt.
    RemoteAhead,
    /// The remote timestamp could not be parsed. Treated as "not ahead" so
    /// an unreliable remote signal never blocks the caller.
    Unknown,
}

impl RemoteState {
    /// Whether this classification should trigger the overwrite prompt.
    pub fn is_ahead(&self) -> bool {
        matches!(self, RemoteState::RemoteAhead)
    }
}

/// Parse a remote timestamp into an absolute instant. Remote systems in this
/// domain report RFC 3339 strings; anything else is treated as absent.
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Classify the remote copy against the locally recorded sync history.
///
/// The fallback is deliberately asymmetric: a missing or unparsable remote
/// timestamp means "not ahead" (do not block on an unreliable signal), while
/// a missing local timestamp means "remote ahead" (never silently overwrite
/// a resource whose sync history is unknown).
pub fn classify(remote_updated_at: Option<&str>, record: &ResourceRecord) -> RemoteState {
    let Some(remote_ts) = parse_timestamp(remote_updated_at) else {
        return RemoteState::Unknown;
    };

    let local = record
        .last_synced_at
        .as_deref()
        .or(record.updated_at.as_deref());
    let Some(local_ts) = parse_timestamp(local) else {
        return RemoteState::RemoteAhead;
    };

    if remote_ts > local_ts {
        RemoteState::RemoteAhead
    } else {
        RemoteState::Unchanged
    }
}
