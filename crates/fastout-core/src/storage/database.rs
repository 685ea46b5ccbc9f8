//! SQLite-backed snapshot storage.
//!
//! The store itself is memory-only. Front ends that outlive a single
//! process (the CLI) save the [`UserState`] snapshot here between runs,
//! together with a summary of the signed-in account.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::model::UserState;

const STATE_KEY: &str = "user_state";
const SESSION_KEY: &str = "auth_session";

/// Non-secret view of the signed-in account. Tokens live in the keyring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub user_id: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/fastout.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("fastout.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn load_state(&self) -> Result<Option<UserState>> {
        match self.kv_get(STATE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_state(&self, state: &UserState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.kv_set(STATE_KEY, &json)?;
        tracing::debug!(points = state.points, "state saved");
        Ok(())
    }

    pub fn clear_state(&self) -> Result<()> {
        self.kv_delete(STATE_KEY)?;
        Ok(())
    }

    pub fn load_session(&self) -> Result<Option<SessionSummary>> {
        match self.kv_get(SESSION_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_session(&self, summary: &SessionSummary) -> Result<()> {
        self.kv_set(SESSION_KEY, &serde_json::to_string(summary)?)?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        self.kv_delete(SESSION_KEY)?;
        Ok(())
    }
}
