//! Storage layer
//!
//! The key-value substrate everything else is persisted in.
//!
//! ## Architecture
//!
//! - **Substrate**: `get` / `set` / `remove` on whole string values
//! - **SQLite**: durable substrate, one row per key
//! - **Memory**: ephemeral substrate with an optional byte quota
//!
//! Collections are JSON arrays rewritten in full on every mutation.

pub mod error;
pub mod json;
pub mod schema;
pub mod sqlite;
pub mod substrate;

pub use error::{StorageError, StorageResult, SubstrateError};
pub use json::{read_json, remove_key, write_json};
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteSubstrate;
pub use substrate::{MemorySubstrate, Substrate};
