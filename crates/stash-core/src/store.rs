//! Unified storage interface
//!
//! The `Store` owns the substrate and the current [`Session`], and hands out
//! collection views bound to that session:
//! - [`RecordStore`] for todos, notes, documents and folders
//! - [`DocumentLibrary`] for filing documents in folders
//! - [`WebsiteDirectory`] for ordered bookmarks
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Restores the last session
//!
//! store.login("alice", "secret")?;
//! store.todos().add(TodoDraft::new("Buy milk", "home"))?;
//!
//! let todos = store.todos().get_all();
//! ```

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::library::DocumentLibrary;
use crate::models::{Document, Folder, Note, Todo, User, Website};
use crate::record_store::RecordStore;
use crate::session::{Session, SessionManager};
use crate::stats::Statistics;
use crate::storage::{MemorySubstrate, SqliteSubstrate, StorageError, StorageResult, Substrate};
use crate::websites::WebsiteDirectory;

/// Unified storage interface for Stash
pub struct Store {
    /// Key-value substrate holding every collection
    substrate: Box<dyn Substrate>,
    /// Who is signed in
    session: Session,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store from the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the SQLite store described by `config`
    pub fn open_with_config(config: Config) -> Result<Self> {
        let substrate =
            SqliteSubstrate::open(&config).context("Failed to open key-value database")?;
        Ok(Self::with_substrate(Box::new(substrate), config))
    }

    /// Open a throwaway store that lives only in memory
    pub fn in_memory() -> Self {
        Self::with_substrate(Box::new(MemorySubstrate::new()), Config::default())
    }

    /// Wrap an existing substrate, restoring the persisted session
    pub fn with_substrate(substrate: Box<dyn Substrate>, config: Config) -> Self {
        let session = SessionManager::new(substrate.as_ref()).restore();
        debug!(authenticated = session.is_authenticated(), "store opened");
        Self {
            substrate,
            session,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Session ====================

    /// The current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    fn sessions(&self) -> SessionManager<'_> {
        SessionManager::new(self.substrate.as_ref())
    }

    /// All registered users
    pub fn users(&self) -> Vec<User> {
        self.sessions().users()
    }

    /// Create an account (does not sign in)
    pub fn register(&self, username: &str, email: &str, password: &str) -> StorageResult<User> {
        self.sessions().register(username, email, password)
    }

    /// Sign in, replacing the current session
    pub fn login(&mut self, username: &str, password: &str) -> StorageResult<User> {
        let session = self.sessions().login(username, password)?;
        let user = session
            .user()
            .cloned()
            .ok_or(StorageError::InvalidCredentials)?;
        self.session = session;
        Ok(user)
    }

    /// Sign out
    pub fn logout(&mut self) -> StorageResult<()> {
        let session = self.sessions().logout()?;
        self.session = session;
        Ok(())
    }

    // ==================== Collections ====================

    pub fn todos(&self) -> RecordStore<'_, Todo> {
        RecordStore::new(self.substrate.as_ref(), &self.session)
    }

    pub fn notes(&self) -> RecordStore<'_, Note> {
        RecordStore::new(self.substrate.as_ref(), &self.session)
    }

    pub fn documents(&self) -> RecordStore<'_, Document> {
        RecordStore::new(self.substrate.as_ref(), &self.session)
    }

    pub fn folders(&self) -> RecordStore<'_, Folder> {
        RecordStore::new(self.substrate.as_ref(), &self.session)
    }

    /// Documents and folders together
    pub fn library(&self) -> DocumentLibrary<'_> {
        DocumentLibrary::new(self.substrate.as_ref(), &self.session)
    }

    /// Websites ordered by position
    pub fn websites(&self) -> WebsiteDirectory<'_> {
        WebsiteDirectory::new(self.substrate.as_ref(), &self.session)
    }

    // ==================== Stats ====================

    /// Dashboard statistics for the current user
    pub fn stats(&self) -> Statistics {
        Statistics::collect(self.substrate.as_ref(), &self.session)
    }

    // ==================== Maintenance ====================

    /// Remove every collection of the signed-in user
    ///
    /// Does nothing while anonymous, so guest data is never wiped this way.
    pub fn clear_user_data(&self) -> StorageResult<()> {
        if !self.session.is_authenticated() {
            return Ok(());
        }

        self.todos().clear()?;
        self.documents().clear()?;
        self.notes().clear()?;
        self.folders().clear()?;
        self.websites().store().clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentDraft, NoteDraft, TodoDraft, WebsiteDraft};
    use tempfile::TempDir;

    #[test]
    fn test_full_session_flow() {
        let mut store = Store::in_memory();
        assert!(store.current_user().is_none());

        store.register("alice", "a@example.com", "pw").unwrap();
        let alice_id = store.login("alice", "pw").unwrap().id;

        let todo = store.todos().add(TodoDraft::new("Buy milk", "home")).unwrap();
        assert_eq!(todo.user_id, alice_id);
        assert_eq!(store.todos().get_all(), vec![todo]);

        store.logout().unwrap();
        assert!(store.current_user().is_none());
        // Guest namespace is empty
        assert!(store.todos().get_all().is_empty());
        assert!(matches!(
            store.todos().add(TodoDraft::new("x", "y")),
            Err(StorageError::Unauthenticated)
        ));
    }

    #[test]
    fn test_session_restored_on_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::with_data_dir(temp_dir.path());

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.register("alice", "a@example.com", "pw").unwrap();
            store.login("alice", "pw").unwrap();
            store
                .notes()
                .add(NoteDraft::new("Idea", "# Idea", "work"))
                .unwrap();
        }

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.current_user().unwrap().username, "alice");
        assert_eq!(store.notes().get_all().len(), 1);
    }

    #[test]
    fn test_login_switches_namespace() {
        let mut store = Store::in_memory();
        store.register("alice", "a@example.com", "pw").unwrap();
        store.register("bob", "b@example.com", "pw").unwrap();

        store.login("alice", "pw").unwrap();
        store.todos().add(TodoDraft::new("Same", "x")).unwrap();

        store.login("bob", "pw").unwrap();
        assert!(store.todos().get_all().is_empty());
        store.todos().add(TodoDraft::new("Same", "x")).unwrap();

        store.login("alice", "pw").unwrap();
        let todos = store.todos().get_all();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].user_id, store.current_user().unwrap().id);
    }

    #[test]
    fn test_clear_user_data() {
        let mut store = Store::in_memory();
        store.register("alice", "a@example.com", "pw").unwrap();
        store.login("alice", "pw").unwrap();

        store.todos().add(TodoDraft::new("a", "x")).unwrap();
        store.library().create_folder("f", None).unwrap();
        store
            .library()
            .add_document(DocumentDraft::for_file("a.pdf", 1))
            .unwrap();
        store
            .websites()
            .add(WebsiteDraft::new("Rust", "https://rust-lang.org", "dev"))
            .unwrap();

        store.clear_user_data().unwrap();

        let stats = store.stats();
        assert_eq!(stats.todos.total, 0);
        assert_eq!(stats.documents.total, 0);
        assert_eq!(stats.folders, 0);
        assert_eq!(stats.websites, 0);
        // Account survives
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn test_clear_user_data_anonymous_is_noop() {
        let store = Store::in_memory();
        store.substrate.set("guest_todos", "[]").unwrap();

        store.clear_user_data().unwrap();
        assert!(store.substrate.get("guest_todos").unwrap().is_some());
    }
}
