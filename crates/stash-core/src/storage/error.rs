//! Storage error handling
//!
//! Provides typed errors for substrate and record operations with
//! descriptive messages and recovery suggestions.
//!
//! Missing records are not errors: update and delete report them through
//! `Option` / `bool` return values instead.

use thiserror::Error;

/// Errors raised by a key-value substrate primitive
#[derive(Error, Debug)]
pub enum SubstrateError {
    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The write would exceed the available storage space
    #[error("Storage quota exceeded while writing '{key}' ({needed} bytes needed, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

impl SubstrateError {
    /// Classify a SQLite error, mapping "disk full" to `QuotaExceeded`
    pub fn from_sqlite(error: rusqlite::Error, key: &str, needed: usize) -> Self {
        match error.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DiskFull) => SubstrateError::QuotaExceeded {
                key: key.to_string(),
                needed,
                available: 0,
            },
            _ => SubstrateError::Database(error),
        }
    }
}

/// Errors that can occur during record and session operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// A record was added while no user is signed in
    #[error("Not signed in. Log in before adding records.")]
    Unauthenticated,

    /// Registration with a username that is already taken
    #[error("Username '{username}' is already registered")]
    DuplicateUsername { username: String },

    /// Login with an unknown username or a wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Re-parenting would make a folder its own ancestor
    #[error("Cannot move folder '{folder_id}' under '{parent_id}': the folder would become its own ancestor")]
    FolderCycle { folder_id: String, parent_id: String },

    /// Writing a collection back to the substrate failed
    #[error("Failed to save '{key}': {source}")]
    SaveFailed {
        key: String,
        #[source]
        source: SubstrateError,
    },

    /// A collection could not be serialized
    #[error("Failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::Unauthenticated => Some("Run `stash user login <username>` first."),
            StorageError::DuplicateUsername { .. } => Some("Choose a different username."),
            StorageError::InvalidCredentials => {
                Some("Check the username and password. Usernames are case-sensitive.")
            }
            StorageError::FolderCycle { .. } => {
                Some("Pick a parent folder outside the folder being moved.")
            }
            StorageError::SaveFailed {
                source: SubstrateError::QuotaExceeded { .. },
                ..
            } => Some("Free up space, for example by deleting large documents, and try again."),
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_save_failure_has_suggestion() {
        let err = StorageError::SaveFailed {
            key: "guest_documents".to_string(),
            source: SubstrateError::QuotaExceeded {
                key: "guest_documents".to_string(),
                needed: 2048,
                available: 10,
            },
        };

        assert!(err.recovery_suggestion().is_some());
        let msg = err.to_string();
        assert!(msg.contains("guest_documents"));
        assert!(msg.contains("quota"));
    }

    #[test]
    fn test_database_save_failure_has_no_suggestion() {
        let err = StorageError::SaveFailed {
            key: "users".to_string(),
            source: SubstrateError::Database(rusqlite::Error::InvalidQuery),
        };

        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_error_display() {
        let err = StorageError::DuplicateUsername {
            username: "alice".to_string(),
        };
        assert!(err.to_string().contains("alice"));

        let err = StorageError::FolderCycle {
            folder_id: "1".to_string(),
            parent_id: "3".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'1'"));
        assert!(msg.contains("'3'"));
    }

    #[test]
    fn test_unauthenticated_suggests_login() {
        let err = StorageError::Unauthenticated;
        assert!(err.recovery_suggestion().unwrap().contains("login"));
    }
}
