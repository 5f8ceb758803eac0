use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;
use std::sync::Mutex;

use super::database::Database;
use crate::session::{CredentialSlot, SlotError};

/// Fixed slot name; only one credential is ever active.
pub const CREDENTIAL_KEY: &str = "beehive_token";

/// Credential slot persisted in SQLite so a sign-in survives restarts.
pub struct SqliteCredentialSlot {
    db: Mutex<Database>,
}

impl SqliteCredentialSlot {
    /// Open the slot database at the given path, creating the schema if needed
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Self::from_database(Database::new(path)?)
    }

    pub fn in_memory() -> SqlResult<Self> {
        Self::from_database(Database::in_memory()?)
    }

    fn from_database(db: Database) -> SqlResult<Self> {
        db.connection().execute(
            "CREATE TABLE IF NOT EXISTS credential_slot (
                name TEXT PRIMARY KEY,
                token TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn read_token(&self) -> SqlResult<Option<String>> {
        let db = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        db.connection()
            .query_row(
                "SELECT token FROM credential_slot WHERE name = ?1",
                params![CREDENTIAL_KEY],
                |row| row.get(0),
            )
            .optional()
    }

    /// Unix seconds of the last write, if a credential is stored
    pub fn updated_at(&self) -> SqlResult<Option<i64>> {
        let db = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        db.connection()
            .query_row(
                "SELECT updated_at FROM credential_slot WHERE name = ?1",
                params![CREDENTIAL_KEY],
                |row| row.get(0),
            )
            .optional()
    }
}

impl CredentialSlot for SqliteCredentialSlot {
    fn load(&self) -> Option<String> {
        match self.read_token() {
            Ok(token) => token,
            Err(err) => {
                log::warn!("Failed to read credential slot: {err}");
                None
            }
        }
    }

    fn store(&self, token: &str) -> Result<(), SlotError> {
        let db = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        db.connection().execute(
            "INSERT OR REPLACE INTO credential_slot (name, token, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))",
            params![CREDENTIAL_KEY, token],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        let db = self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        db.connection().execute(
            "DELETE FROM credential_slot WHERE name = ?1",
            params![CREDENTIAL_KEY],
        )?;
        Ok(())
    }
}
