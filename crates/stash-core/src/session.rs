//! Accounts and the active session
//!
//! The active user is an explicit [`Session`] value handed to every
//! namespaced operation rather than process-wide state, so several sessions
//! can coexist (in tests, for instance).
//!
//! Persisted keys:
//! - `users` - global list of every registered [`User`]
//! - `currentUser` - the signed-in user, absent when anonymous

use chrono::Utc;
use tracing::{debug, info};

use crate::id::next_id;
use crate::models::User;
use crate::storage::{read_json, remove_key, write_json, StorageError, StorageResult, Substrate};

/// Key of the global user list
pub const USERS_KEY: &str = "users";

/// Key of the active-user pointer
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Who is signed in
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Session {
    /// The signed-in user, if any
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user),
        }
    }

    /// Id of the signed-in user, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Registration, login and logout against the global user list
pub struct SessionManager<'a> {
    substrate: &'a dyn Substrate,
}

impl<'a> SessionManager<'a> {
    pub fn new(substrate: &'a dyn Substrate) -> Self {
        Self { substrate }
    }

    /// All registered users; a corrupt list reads as empty
    pub fn users(&self) -> Vec<User> {
        read_json(self.substrate, USERS_KEY).unwrap_or_default()
    }

    /// Create a new account
    ///
    /// Fails with `DuplicateUsername` if the name is taken. Does not sign
    /// the new user in.
    pub fn register(&self, username: &str, email: &str, password: &str) -> StorageResult<User> {
        let mut users = self.users();
        if users.iter().any(|u| u.username == username) {
            return Err(StorageError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let user = User {
            id: next_id(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        write_json(self.substrate, USERS_KEY, &users)?;

        info!(user_id = %user.id, username, "registered user");
        Ok(user)
    }

    /// Sign in with an exact username and password match
    pub fn login(&self, username: &str, password: &str) -> StorageResult<Session> {
        let user = self
            .users()
            .into_iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or(StorageError::InvalidCredentials)?;

        write_json(self.substrate, CURRENT_USER_KEY, &user)?;

        info!(user_id = %user.id, username, "logged in");
        Ok(Session::Authenticated(user))
    }

    /// Sign out; calling it while anonymous is harmless
    pub fn logout(&self) -> StorageResult<Session> {
        remove_key(self.substrate, CURRENT_USER_KEY)?;
        info!("logged out");
        Ok(Session::Anonymous)
    }

    /// Recover the session persisted by a previous `login`
    ///
    /// A missing or unreadable pointer, or one naming a user that no longer
    /// exists, yields an anonymous session.
    pub fn restore(&self) -> Session {
        let Some(pointer) = read_json::<User>(self.substrate, CURRENT_USER_KEY) else {
            return Session::Anonymous;
        };

        match self.users().into_iter().find(|u| u.id == pointer.id) {
            Some(user) => {
                debug!(user_id = %user.id, "restored session");
                Session::Authenticated(user)
            }
            None => {
                debug!(user_id = %pointer.id, "session points at unknown user, staying anonymous");
                Session::Anonymous
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySubstrate;

    #[test]
    fn test_register_and_login() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);

        let alice = sessions
            .register("alice", "alice@example.com", "pw")
            .unwrap();
        assert_eq!(sessions.users(), vec![alice.clone()]);

        let session = sessions.login("alice", "pw").unwrap();
        assert_eq!(session.user(), Some(&alice));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_register_does_not_log_in() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);

        sessions.register("alice", "a@example.com", "pw").unwrap();
        assert_eq!(sessions.restore(), Session::Anonymous);
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);

        let first = sessions.register("alice", "a@example.com", "pw").unwrap();
        let err = sessions
            .register("alice", "other@example.com", "pw2")
            .unwrap_err();

        assert!(matches!(err, StorageError::DuplicateUsername { ref username } if username == "alice"));
        assert_eq!(sessions.users(), vec![first.clone()]);
        // First account still works
        assert_eq!(sessions.login("alice", "pw").unwrap().user(), Some(&first));
    }

    #[test]
    fn test_login_requires_exact_match() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();

        assert!(matches!(
            sessions.login("alice", "PW"),
            Err(StorageError::InvalidCredentials)
        ));
        assert!(matches!(
            sessions.login("Alice", "pw"),
            Err(StorageError::InvalidCredentials)
        ));
        assert!(matches!(
            sessions.login("bob", "pw"),
            Err(StorageError::InvalidCredentials)
        ));
        assert!(substrate.get(CURRENT_USER_KEY).unwrap().is_none());
    }

    #[test]
    fn test_restore_after_login() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();
        let session = sessions.login("alice", "pw").unwrap();

        // Simulates a restart
        let restored = SessionManager::new(&substrate).restore();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();
        sessions.login("alice", "pw").unwrap();

        assert_eq!(sessions.logout().unwrap(), Session::Anonymous);
        assert_eq!(sessions.logout().unwrap(), Session::Anonymous);
        assert_eq!(sessions.restore(), Session::Anonymous);
    }

    #[test]
    fn test_restore_with_unknown_user_is_anonymous() {
        let substrate = MemorySubstrate::new();
        let sessions = SessionManager::new(&substrate);
        sessions.register("alice", "a@example.com", "pw").unwrap();
        sessions.login("alice", "pw").unwrap();

        // User list wiped behind our back
        substrate.set(USERS_KEY, "[]").unwrap();
        assert_eq!(sessions.restore(), Session::Anonymous);
    }

    #[test]
    fn test_restore_with_corrupt_pointer_is_anonymous() {
        let substrate = MemorySubstrate::new();
        substrate.set(CURRENT_USER_KEY, "not json").unwrap();
        assert_eq!(SessionManager::new(&substrate).restore(), Session::Anonymous);
    }

    #[test]
    fn test_corrupt_user_list_reads_empty() {
        let substrate = MemorySubstrate::new();
        substrate.set(USERS_KEY, "[{broken").unwrap();
        let sessions = SessionManager::new(&substrate);

        assert!(sessions.users().is_empty());
        // Registering overwrites the corrupt list
        sessions.register("alice", "a@example.com", "pw").unwrap();
        assert_eq!(sessions.users().len(), 1);
    }
}
