//! Saved-version records, export records, and storage key naming.
//!
//! DESIGN
//! ======
//! A saved version is the full `{tables, unseated}` state plus the event and
//! version names and a save timestamp, serialized as camelCase JSON. Keys are
//! derived from the two names so the same event/version pair always lands on
//! the same key; two pairs that sanitize identically share a key and the
//! later save wins.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::consts::{KEY_SEGMENT_MAX_LEN, KEY_SEPARATOR, UNTITLED_EVENT};
use crate::error::ErrorCode;
use crate::model::{EventState, StateError, Table};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot state is inconsistent: {0}")]
    Invalid(#[from] StateError),
}

impl ErrorCode for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_SNAPSHOT_JSON",
            Self::Invalid(_) => "E_SNAPSHOT_INVALID",
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// One named version of an event as persisted under its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedVersion {
    pub event_name: String,
    pub version_name: String,
    pub tables: Vec<Table>,
    pub unseated: Vec<String>,
    pub saved_at: String,
}

impl SavedVersion {
    /// Capture `state` under the given names, stamped with the current time.
    /// An empty event name becomes `"Untitled"`.
    #[must_use]
    pub fn capture(event_name: &str, version_name: &str, state: &EventState) -> Self {
        Self {
            event_name: event_name_or_untitled(event_name).to_owned(),
            version_name: version_name.trim().to_owned(),
            tables: state.tables.clone(),
            unseated: state.unseated.clone(),
            saved_at: now_rfc3339(),
        }
    }

    /// The seating state carried by this version.
    #[must_use]
    pub fn state(&self) -> EventState {
        EventState { tables: self.tables.clone(), unseated: self.unseated.clone() }
    }

    /// Consume the record, keeping only the seating state.
    #[must_use]
    pub fn into_state(self) -> EventState {
        EventState { tables: self.tables, unseated: self.unseated }
    }

    /// Parse the stored save stamp.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the stamp is not RFC 3339.
    pub fn saved_at_time(&self) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(&self.saved_at, &Rfc3339)
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored value and check the state it carries.
    ///
    /// # Errors
    ///
    /// Returns `Json` for unparseable input and `Invalid` when the state
    /// breaks a seating invariant.
    pub fn decode(raw: &str) -> Result<Self, SnapshotError> {
        let version: Self = serde_json::from_str(raw)?;
        version.state().validate()?;
        Ok(version)
    }
}

/// Shareable export of an event's seating, without version metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub event_name: String,
    pub tables: Vec<Table>,
    pub unseated: Vec<String>,
    pub exported_at: String,
}

impl ExportRecord {
    #[must_use]
    pub fn capture(event_name: &str, state: &EventState) -> Self {
        Self {
            event_name: event_name.trim().to_owned(),
            tables: state.tables.clone(),
            unseated: state.unseated.clone(),
            exported_at: now_rfc3339(),
        }
    }

    /// Pretty-printed JSON, two-space indented.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested download file name.
    #[must_use]
    pub fn file_name(&self) -> String {
        export_file_name(&self.event_name)
    }
}

// =============================================================================
// Keys
// =============================================================================

/// Reduce a name to a key-safe segment: every non-ASCII-alphanumeric
/// character becomes `-`, runs of `-` collapse, the result is lowercased
/// and cut to 60 characters.
#[must_use]
pub fn sanitize_key_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.truncate(KEY_SEGMENT_MAX_LEN);
    out
}

/// Storage key for an event/version pair.
#[must_use]
pub fn version_key(prefix: &str, event_name: &str, version_name: &str) -> String {
    format!(
        "{prefix}{}{KEY_SEPARATOR}{}",
        sanitize_key_segment(event_name_or_untitled(event_name)),
        sanitize_key_segment(version_name.trim())
    )
}

/// File name for an exported event; a blank event name exports as `seating`.
#[must_use]
pub fn export_file_name(event_name: &str) -> String {
    let trimmed = event_name.trim();
    let base = if trimmed.is_empty() { "seating" } else { trimmed };
    format!("{}-export.json", sanitize_key_segment(base))
}

fn event_name_or_untitled(event_name: &str) -> &str {
    let trimmed = event_name.trim();
    if trimmed.is_empty() { UNTITLED_EVENT } else { trimmed }
}

/// Current UTC time as RFC 3339.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}
