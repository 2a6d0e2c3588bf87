//! Stash Core Library
//!
//! This crate provides the core functionality for Stash, a local
//! record keeper for todos, notes, documents filed in folders, and
//! bookmarked websites, scoped per signed-in user.
//!
//! # Architecture
//!
//! - **Substrate**: flat key-value store (SQLite on disk, or memory)
//! - **Namespace**: every user's collections live under `<userId>_<name>`
//! - **Record stores**: whole-collection read-modify-write per mutation
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//! store.register("alice", "alice@example.com", "secret")?;
//! store.login("alice", "secret")?;
//!
//! // Add a todo
//! store.todos().add(TodoDraft::new("Buy milk", "home"))?;
//!
//! // File a document
//! let folder = store.library().create_folder("Receipts", None)?;
//! store.library().add_document(DocumentDraft::for_file("march.pdf", 1024).in_folder(Some(folder.id)))?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `session`: Accounts, login and logout
//! - `namespace`: Per-user storage keys
//! - `record_store`: Generic per-user collections
//! - `models`: Records, drafts and patches
//! - `folder_tree`: Folder hierarchy assembly
//! - `library`: Documents filed in folders
//! - `websites`: Position-ordered bookmarks
//! - `stats`: Dashboard statistics
//! - `storage`: Key-value substrates
//! - `config`: Application configuration

pub mod config;
pub mod folder_tree;
pub mod id;
pub mod library;
pub mod models;
pub mod namespace;
pub mod record_store;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod websites;

pub use config::Config;
pub use folder_tree::{build_tree, FolderNode};
pub use library::DocumentLibrary;
pub use models::{
    Document, DocumentDraft, DocumentPatch, Folder, FolderDraft, FolderPatch, Note, NoteDraft,
    NotePatch, Todo, TodoDraft, TodoPatch, User, Website, WebsiteDraft, WebsitePatch,
};
pub use namespace::Namespace;
pub use record_store::{Categorized, Record, RecordStore};
pub use session::{Session, SessionManager};
pub use stats::Statistics;
pub use storage::{MemorySubstrate, SqliteSubstrate, StorageError, Substrate, SubstrateError};
pub use store::Store;
pub use websites::WebsiteDirectory;
