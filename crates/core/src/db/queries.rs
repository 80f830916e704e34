//! Typed query helpers for the `kv_state` table.

use chrono::Utc;
use rusqlite::params;
use tracing::debug;

use super::Database;
use crate::errors::StorageError;

impl Database {
    /// Get a key-value state entry.
    pub fn get_state(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM kv_state WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(Ok(val)) => Ok(Some(val)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Set a key-value state entry (upsert).
    pub fn set_state(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO kv_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        debug!(key, bytes = value.len(), "set kv_state");
        Ok(())
    }

    /// Delete a key-value state entry. Deleting a missing key is not an error.
    pub fn delete_state(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.conn();
        let removed = conn.execute("DELETE FROM kv_state WHERE key = ?1", params![key])?;
        debug!(key, removed, "deleted kv_state");
        Ok(())
    }
}
