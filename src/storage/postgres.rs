//! Postgres-backed gateway over the `seating_events` table.
//!
//! DESIGN
//! ======
//! Values are saved-version JSON documents. `set` splits the document into
//! columns (`event_name`, `version_name`, `tables`, `unseated`, `saved_at`)
//! and upserts on `key`; `get` reassembles the same document shape, so the
//! rest of the crate sees no difference from the other adapters.

#[cfg(test)]
#[path = "postgres_test.rs"]
mod postgres_test;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::debug;

use super::{GatewayError, PersistenceGateway, StoredEntry};

/// Gateway storing saved versions as rows.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Column split of a saved-version document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionColumns {
    #[serde(default)]
    event_name: String,
    #[serde(default)]
    version_name: String,
    #[serde(default)]
    tables: Value,
    #[serde(default)]
    unseated: Value,
    #[serde(default)]
    saved_at: String,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn assemble(columns: VersionColumns) -> String {
    json!({
        "eventName": columns.event_name,
        "versionName": columns.version_name,
        "tables": columns.tables,
        "unseated": columns.unseated,
        "savedAt": columns.saved_at,
    })
    .to_string()
}

#[async_trait]
impl PersistenceGateway for PgStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, GatewayError> {
        let row = sqlx::query_as::<_, (String, String, Value, Value, String)>(
            "SELECT event_name, version_name, tables, unseated, saved_at FROM seating_events WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(event_name, version_name, tables, unseated, saved_at)| StoredEntry {
            key: key.to_owned(),
            value: assemble(VersionColumns { event_name, version_name, tables, unseated, saved_at }),
        }))
    }

    async fn set(&self, key: &str, value: &str) -> Result<StoredEntry, GatewayError> {
        let columns: VersionColumns = serde_json::from_str(value)?;
        sqlx::query(
            "INSERT INTO seating_events (key, event_name, version_name, tables, unseated, saved_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now()) \
             ON CONFLICT (key) DO UPDATE SET \
                 event_name = EXCLUDED.event_name, version_name = EXCLUDED.version_name, \
                 tables = EXCLUDED.tables, unseated = EXCLUDED.unseated, \
                 saved_at = EXCLUDED.saved_at, updated_at = now()",
        )
        .bind(key)
        .bind(&columns.event_name)
        .bind(&columns.version_name)
        .bind(&columns.tables)
        .bind(&columns.unseated)
        .bind(&columns.saved_at)
        .execute(&self.pool)
        .await?;

        debug!(key, "seating event upserted");
        Ok(StoredEntry { key: key.to_owned(), value: assemble(columns) })
    }

    async fn delete(&self, key: &str) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM seating_events WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, GatewayError> {
        let keys: Vec<String> =
            sqlx::query_scalar("SELECT key FROM seating_events WHERE left(key, length($1)) = $1 ORDER BY key")
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;
        Ok(keys)
    }
}
