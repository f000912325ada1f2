//! Local durable store for SkillPortal.
//!
//! Synchronous per-account key-value persistence for JSON values, backed by the
//! `kv_store` table. The lenient operations never fail: storage and parse
//! errors are logged and read as "nothing stored", so in-memory state stays
//! authoritative even when the disk is not.
//!
//! The same database may be open in several host windows for one account.
//! Each engine reads its copy at load time; concurrent edits from two windows
//! are not reconciled.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Trait defining the local store interface.
pub trait LocalStoreTrait {
    /// Returns the stored value, or `None` when missing or unreadable.
    fn read(&self, account_id: &str, key: &str) -> Option<Value>;
    /// Persists `value`, best-effort.
    fn write(&self, account_id: &str, key: &str, value: &Value);
    /// Deletes a key, best-effort.
    fn remove(&self, account_id: &str, key: &str);
}

/// SQLite-backed local store.
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Strict read: surfaces database and JSON errors.
    pub fn try_read(&self, account_id: &str, key: &str) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE account_id = ?1 AND key = ?2",
                params![account_id, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }

    /// Strict write: surfaces database and JSON errors.
    pub fn try_write(&self, account_id: &str, key: &str, value: &Value) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        self.db
            .connection()
            .execute(
                "INSERT INTO kv_store (account_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(account_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![account_id, key, text, Self::now()],
            )
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Reads and decodes a typed value; a shape mismatch reads as `None`.
    pub fn read_as<T: DeserializeOwned>(&self, account_id: &str, key: &str) -> Option<T> {
        let value = self.read(account_id, key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(account_id, key, error = %e, "stored value has unexpected shape, ignoring");
                None
            }
        }
    }

    /// Encodes and writes a typed value, best-effort.
    pub fn write_as<T: Serialize>(&self, account_id: &str, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.write(account_id, key, &json),
            Err(e) => warn!(account_id, key, error = %e, "failed to encode value for local store"),
        }
    }

    /// Keys stored for an account, most recently updated first.
    pub fn keys(&self, account_id: &str) -> Vec<String> {
        let result = (|| -> Result<Vec<String>, rusqlite::Error> {
            let conn = self.db.connection();
            let mut stmt = conn.prepare(
                "SELECT key FROM kv_store WHERE account_id = ?1 ORDER BY updated_at DESC, key",
            )?;
            let rows = stmt.query_map(params![account_id], |row| row.get::<_, String>(0))?;
            let keys = rows.collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })();

        result.unwrap_or_else(|e| {
            warn!(account_id, error = %e, "failed to list local store keys");
            Vec::new()
        })
    }

    /// Removes every key stored for an account.
    pub fn clear_account(&self, account_id: &str) {
        if let Err(e) = self
            .db
            .connection()
            .execute("DELETE FROM kv_store WHERE account_id = ?1", params![account_id])
        {
            warn!(account_id, error = %e, "failed to clear account from local store");
        }
    }
}

impl LocalStoreTrait for LocalStore {
    fn read(&self, account_id: &str, key: &str) -> Option<Value> {
        match self.try_read(account_id, key) {
            Ok(value) => value,
            Err(e) => {
                warn!(account_id, key, error = %e, "local store read failed, treating as empty");
                None
            }
        }
    }

    fn write(&self, account_id: &str, key: &str, value: &Value) {
        if let Err(e) = self.try_write(account_id, key, value) {
            warn!(account_id, key, error = %e, "local store write failed, keeping in-memory state");
        }
    }

    fn remove(&self, account_id: &str, key: &str) {
        if let Err(e) = self.db.connection().execute(
            "DELETE FROM kv_store WHERE account_id = ?1 AND key = ?2",
            params![account_id, key],
        ) {
            warn!(account_id, key, error = %e, "local store delete failed");
        }
    }
}
