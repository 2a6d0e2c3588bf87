//! SQLite schema for the key-value substrate
//!
//! One table of whole string values keyed by name. Collections are stored
//! as JSON documents under per-user keys; SQLite only provides durability.

use rusqlite::{params, Connection, OptionalExtension, Result};

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Flat key-value store
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?1)",
        params![SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// Read the stored schema version, if any
pub fn schema_version(conn: &Connection) -> Result<Option<i32>> {
    let has_table: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_info'",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(None);
    }

    let version: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_info WHERE key = 'version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(version.and_then(|v| v.parse().ok()))
}

/// Check whether the schema needs to be created or upgraded
pub fn needs_init(conn: &Connection) -> Result<bool> {
    Ok(schema_version(conn)? != Some(SCHEMA_VERSION))
}
