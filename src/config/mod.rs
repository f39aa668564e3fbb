//! Data-directory discovery and CLI override layering.
//!
//! Resolution order for the database path: `--db` flag, then the
//! `PULSE_DB` environment variable, then `./.pulse/pulse.db`.

use crate::error::{PulseError, Result};
use crate::storage::SqliteStore;
use std::path::PathBuf;
use tracing::debug;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = ".pulse";

/// Database filename inside the data directory.
pub const DB_FILE: &str = "pulse.db";

/// Values carried from global CLI flags into command handlers.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub json: bool,
}

/// Resolve the database path from overrides and environment.
#[must_use]
pub fn resolve_db_path(cli: &CliOverrides) -> PathBuf {
    if let Some(ref db) = cli.db {
        return db.clone();
    }
    if let Ok(db) = std::env::var("PULSE_DB") {
        if !db.is_empty() {
            return PathBuf::from(db);
        }
    }
    PathBuf::from(DEFAULT_DATA_DIR).join(DB_FILE)
}

/// Open the store for a command, requiring prior initialization.
///
/// # Errors
///
/// Returns `NotInitialized` when the database file does not exist yet;
/// `pulse init` creates it.
pub fn open_store(cli: &CliOverrides) -> Result<SqliteStore> {
    let path = resolve_db_path(cli);
    if !path.exists() {
        return Err(PulseError::NotInitialized);
    }
    debug!(path = %path.display(), "opening store");
    SqliteStore::open(&path)
}

/// Create the data directory if needed and open (or create) the store.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the database
/// cannot be opened.
pub fn init_store(cli: &CliOverrides) -> Result<(SqliteStore, PathBuf)> {
    let path = resolve_db_path(cli);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    debug!(path = %path.display(), "initializing store");
    let store = SqliteStore::open(&path)?;
    Ok((store, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_takes_precedence() {
        let cli = CliOverrides {
            db: Some(PathBuf::from("/tmp/custom.db")),
            json: false,
        };
        assert_eq!(resolve_db_path(&cli), PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn default_path_under_data_dir() {
        // Only meaningful when PULSE_DB is unset in the test environment.
        if std::env::var("PULSE_DB").is_err() {
            let cli = CliOverrides::default();
            assert_eq!(resolve_db_path(&cli), PathBuf::from(".pulse/pulse.db"));
        }
    }

    #[test]
    fn open_store_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let cli = CliOverrides {
            db: Some(dir.path().join("pulse.db")),
            json: false,
        };
        assert!(matches!(
            open_store(&cli).unwrap_err(),
            PulseError::NotInitialized
        ));

        let (_, path) = init_store(&cli).unwrap();
        assert!(path.exists());
        assert!(open_store(&cli).is_ok());
    }
}
