//! Configuration parsed from environment variables.

use std::path::PathBuf;

use crate::consts::{DEFAULT_HISTORY_LIMIT, DEFAULT_KEY_PREFIX};
use crate::error::ErrorCode;

pub const DEFAULT_DATA_DIR: &str = ".seatplan";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown SEATPLAN_STORAGE: {0} (expected file, memory or postgres)")]
    UnknownStorage(String),
    #[error("DATABASE_URL is required when SEATPLAN_STORAGE=postgres")]
    MissingDatabaseUrl,
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownStorage(_) => "E_CONFIG_STORAGE",
            Self::MissingDatabaseUrl => "E_CONFIG_DATABASE_URL",
        }
    }
}

/// Which persistence adapter backs saved versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    /// JSON files in a data directory.
    File { dir: PathBuf },
    /// Process memory; nothing survives exit.
    Memory,
    /// Postgres `seating_events` table.
    Postgres { database_url: String, max_connections: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageKind,
    pub key_prefix: String,
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::File { dir: PathBuf::from(DEFAULT_DATA_DIR) },
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `SEATPLAN_STORAGE`: `file` (default), `memory`, or `postgres`
    /// - `SEATPLAN_DATA_DIR`: file store directory, default `.seatplan`
    /// - `DATABASE_URL`: required for `postgres`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `SEATPLAN_KEY_PREFIX`: default `beps-`
    /// - `SEATPLAN_HISTORY_LIMIT`: default 50
    ///
    /// # Errors
    ///
    /// Fails on an unknown storage kind or a missing database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    /// Build config from any variable lookup. Malformed numbers fall back to defaults.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match lookup("SEATPLAN_STORAGE").as_deref().map(str::trim).unwrap_or("file") {
            "file" => StorageKind::File {
                dir: lookup("SEATPLAN_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            },
            "memory" => StorageKind::Memory,
            "postgres" => StorageKind::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            },
            other => return Err(ConfigError::UnknownStorage(other.to_owned())),
        };

        Ok(Self {
            storage,
            key_prefix: lookup("SEATPLAN_KEY_PREFIX").unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_owned()),
            history_limit: parse_or(&lookup, "SEATPLAN_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT),
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or(default),
        None => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
