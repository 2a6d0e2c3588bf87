//! SQLite-backed substrate
//!
//! Stores every key as one row of the `kv` table. Each `set` is a single
//! upsert statement, so a collection is always replaced as a whole.
//!
//! Storage location: `~/.local/share/stash/stash.db` (configurable via `Config`)

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::error::SubstrateError;
use super::schema::{init_schema, needs_init};
use super::substrate::Substrate;
use crate::config::Config;

/// Durable key-value substrate on top of SQLite
pub struct SqliteSubstrate {
    conn: Connection,
}

impl SqliteSubstrate {
    /// Open (or create) the database configured in `config`
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_path(&config.database_path())
    }

    /// Open (or create) a database at an explicit path
    pub fn open_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        if needs_init(&conn).context("Failed to read schema version")? {
            init_schema(&conn).context("Failed to initialize schema")?;
        }
        Ok(Self { conn })
    }
}

impl Substrate for SqliteSubstrate {
    fn get(&self, key: &str) -> Result<Option<String>, SubstrateError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SubstrateError> {
        debug!(key, bytes = value.len(), "writing key");
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|e| SubstrateError::from_sqlite(e, key, value.len()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SubstrateError> {
        debug!(key, "removing key");
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_set_remove() {
        let temp_dir = TempDir::new().unwrap();
        let substrate = SqliteSubstrate::open_path(&temp_dir.path().join("stash.db")).unwrap();
        assert!(substrate.get("users").unwrap().is_none());

        substrate.set("users", "[]").unwrap();
        assert_eq!(substrate.get("users").unwrap().as_deref(), Some("[]"));

        substrate.set("users", r#"[{"id":"1"}]"#).unwrap();
        assert_eq!(
            substrate.get("users").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );

        substrate.remove("users").unwrap();
        assert!(substrate.get("users").unwrap().is_none());
        substrate.remove("users").unwrap();
    }

    #[test]
    fn test_values_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_data_dir(temp_dir.path());

        {
            let substrate = SqliteSubstrate::open(&config).unwrap();
            substrate.set("42_todos", "[]").unwrap();
            substrate.set("currentUser", "{}").unwrap();
        }

        let substrate = SqliteSubstrate::open(&config).unwrap();
        assert_eq!(substrate.get("42_todos").unwrap().as_deref(), Some("[]"));
        assert_eq!(substrate.get("currentUser").unwrap().as_deref(), Some("{}"));
        assert!(config.database_path().exists());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("stash.db");

        let substrate = SqliteSubstrate::open_path(&path).unwrap();
        substrate.set("k", "v").unwrap();
        assert!(path.exists());
    }
}
