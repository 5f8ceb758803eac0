pub mod credential_db;
pub mod database;

pub use credential_db::{CREDENTIAL_KEY, SqliteCredentialSlot};

use std::fs;
use std::path::{Path, PathBuf};

/// File name of the session database inside the data directory.
pub const SESSION_DB_FILE: &str = "session.db";

/// Ensure data directory exists
pub fn ensure_data_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

pub fn session_db_path(dir: &Path) -> PathBuf {
    dir.join(SESSION_DB_FILE)
}
