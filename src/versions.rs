//! Version service: named saves of an event over a persistence gateway.
//!
//! DESIGN
//! ======
//! `VersionStore` turns planner state into [`SavedVersion`] records and back.
//! The record is captured synchronously before the first `.await`, so a
//! mutation made while a save is in flight never leaks into the stored
//! value. Gateway failures are logged here and returned as [`VersionError`];
//! the caller's in-memory state is never touched by this module.

#[cfg(test)]
#[path = "versions_test.rs"]
mod versions_test;

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::consts::COPY_SUFFIX;
use crate::error::ErrorCode;
use crate::model::EventState;
use crate::snapshot::{ExportRecord, SavedVersion, SnapshotError, now_rfc3339, version_key};
use crate::storage::{GatewayError, PersistenceGateway};

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("version name is required")]
    EmptyVersionName,
    #[error("saved version not found: {0}")]
    NotFound(String),
    #[error("saved version {key} is unreadable: {source}")]
    Corrupt { key: String, source: SnapshotError },
    #[error("could not encode version: {0}")]
    Encode(SnapshotError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ErrorCode for VersionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyVersionName => "E_VERSION_NAME",
            Self::NotFound(_) => "E_VERSION_NOT_FOUND",
            Self::Corrupt { .. } => "E_VERSION_CORRUPT",
            Self::Encode(_) => "E_VERSION_ENCODE",
            Self::Gateway(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.retryable(),
            _ => false,
        }
    }
}

/// One row of the saved-versions list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub key: String,
    pub event_name: String,
    pub version_name: String,
    pub saved_at: String,
    pub guests: usize,
    pub seated: usize,
}

impl VersionSummary {
    fn from_version(key: String, version: &SavedVersion) -> Self {
        let state = version.state();
        Self {
            key,
            event_name: version.event_name.clone(),
            version_name: version.version_name.clone(),
            saved_at: version.saved_at.clone(),
            guests: state.guest_count(),
            seated: state.seated_count(),
        }
    }
}

/// Saved versions of one event, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGroup {
    pub event_name: String,
    pub versions: Vec<VersionSummary>,
}

/// Group a newest-first listing by event, ordering events by their newest save.
#[must_use]
pub fn group_by_event(summaries: &[VersionSummary]) -> Vec<EventGroup> {
    let mut groups: Vec<EventGroup> = Vec::new();
    for summary in summaries {
        match groups.iter_mut().find(|g| g.event_name == summary.event_name) {
            Some(group) => group.versions.push(summary.clone()),
            None => groups.push(EventGroup { event_name: summary.event_name.clone(), versions: vec![summary.clone()] }),
        }
    }
    groups
}

/// Save/load/list service over an injected gateway.
#[derive(Clone)]
pub struct VersionStore {
    gateway: Arc<dyn PersistenceGateway>,
    prefix: String,
}

impl std::fmt::Debug for VersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStore").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl VersionStore {
    #[must_use]
    pub fn new(gateway: Arc<dyn PersistenceGateway>, prefix: impl Into<String>) -> Self {
        Self { gateway, prefix: prefix.into() }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key a save of `event_name`/`version_name` would be stored under.
    #[must_use]
    pub fn key_for(&self, event_name: &str, version_name: &str) -> String {
        version_key(&self.prefix, event_name, version_name)
    }

    /// Save `state` as a named version, replacing any save with the same key.
    ///
    /// # Errors
    ///
    /// Fails on a blank version name or a gateway error.
    pub async fn save(&self, event_name: &str, version_name: &str, state: &EventState) -> Result<String, VersionError> {
        if version_name.trim().is_empty() {
            return Err(VersionError::EmptyVersionName);
        }
        let version = SavedVersion::capture(event_name, version_name, state);
        let key = self.key_for(&version.event_name, &version.version_name);
        self.put(&key, &version).await?;
        info!(key = %key, event = %version.event_name, version = %version.version_name, "version saved");
        Ok(key)
    }

    /// Fetch and validate a saved version.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing key, `Corrupt` when the stored value does not
    /// decode to a consistent state, or a gateway error.
    pub async fn load(&self, key: &str) -> Result<SavedVersion, VersionError> {
        let entry = self
            .gateway
            .get(key)
            .await
            .map_err(|e| {
                error!(error = %e, key, "version load failed");
                VersionError::from(e)
            })?
            .ok_or_else(|| VersionError::NotFound(key.to_owned()))?;

        SavedVersion::decode(&entry.value).map_err(|source| {
            warn!(key, error = %source, "saved version rejected");
            VersionError::Corrupt { key: key.to_owned(), source }
        })
    }

    /// Every readable saved version, newest first. Unreadable entries are skipped.
    ///
    /// # Errors
    ///
    /// Fails only when the key listing itself fails.
    pub async fn list(&self) -> Result<Vec<VersionSummary>, VersionError> {
        let keys = self.gateway.list(&self.prefix).await.map_err(|e| {
            error!(error = %e, prefix = %self.prefix, "version listing failed");
            VersionError::from(e)
        })?;

        let mut summaries = Vec::with_capacity(keys.len());
        for key in keys {
            match self.load(&key).await {
                Ok(version) => summaries.push(VersionSummary::from_version(key, &version)),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable saved version"),
            }
        }
        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.key.cmp(&b.key)));
        Ok(summaries)
    }

    /// Remove a saved version. Returns false when it did not exist.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn delete(&self, key: &str) -> Result<bool, VersionError> {
        let deleted = self.gateway.delete(key).await.map_err(|e| {
            error!(error = %e, key, "version delete failed");
            VersionError::from(e)
        })?;
        info!(key, deleted, "version deleted");
        Ok(deleted)
    }

    /// Copy a saved version to `"<version> (copy)"` with a fresh save time.
    /// Returns the new key.
    ///
    /// # Errors
    ///
    /// Same as [`VersionStore::load`], plus gateway write failures.
    pub async fn duplicate(&self, key: &str) -> Result<String, VersionError> {
        let mut version = self.load(key).await?;
        version.version_name.push_str(COPY_SUFFIX);
        version.saved_at = now_rfc3339();
        let new_key = self.key_for(&version.event_name, &version.version_name);
        self.put(&new_key, &version).await?;
        info!(from = key, key = %new_key, "version duplicated");
        Ok(new_key)
    }

    /// Build the export document for the current event.
    ///
    /// # Errors
    ///
    /// Returns `Encode` if serialization fails.
    pub fn export(event_name: &str, state: &EventState) -> Result<(String, String), VersionError> {
        let record = ExportRecord::capture(event_name, state);
        let json = record.to_pretty_json().map_err(VersionError::Encode)?;
        Ok((record.file_name(), json))
    }

    async fn put(&self, key: &str, version: &SavedVersion) -> Result<(), VersionError> {
        let value = version.encode().map_err(VersionError::Encode)?;
        self.gateway.set(key, &value).await.map_err(|e| {
            error!(error = %e, key, "version save failed");
            VersionError::from(e)
        })?;
        Ok(())
    }
}
