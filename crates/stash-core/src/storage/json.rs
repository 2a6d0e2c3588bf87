//! JSON values on top of a substrate
//!
//! Reads are best effort: a missing key, a substrate read failure and an
//! unparseable payload all come back as `None`, the last two logged. Writes
//! report failures to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::substrate::Substrate;

/// Read and decode the value stored under `key`
pub fn read_json<T: DeserializeOwned>(substrate: &dyn Substrate, key: &str) -> Option<T> {
    let raw = match substrate.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "key not present");
            return None;
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read key, treating as empty");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "stored value is not valid JSON, treating as empty");
            None
        }
    }
}

/// Encode `value` and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(
    substrate: &dyn Substrate,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    substrate.set(key, &encoded).map_err(|source| {
        warn!(key, error = %source, "failed to save");
        StorageError::SaveFailed {
            key: key.to_string(),
            source,
        }
    })
}

/// Remove `key`, reporting failures as a save failure
pub fn remove_key(substrate: &dyn Substrate, key: &str) -> StorageResult<()> {
    substrate
        .remove(key)
        .map_err(|source| StorageError::SaveFailed {
            key: key.to_string(),
            source,
        })
}
