//! Per-user key namespacing
//!
//! Every user-owned collection lives under `<scope>_<collection>` where the
//! scope is the signed-in user's id, or `guest` without a session.

use crate::session::Session;

/// Scope used when no user is signed in
pub const GUEST_SCOPE: &str = "guest";

/// A storage key prefix for one user's collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    scope: String,
}

impl Namespace {
    /// Namespace of the session's user, or the guest namespace
    pub fn for_session(session: &Session) -> Self {
        match session.user_id() {
            Some(id) => Self::for_user(id),
            None => Self::guest(),
        }
    }

    /// Namespace of an explicit user id
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            scope: user_id.into(),
        }
    }

    /// The shared guest namespace
    pub fn guest() -> Self {
        Self::for_user(GUEST_SCOPE)
    }

    /// Storage key of `collection` within this namespace
    pub fn resolve(&self, collection: &str) -> String {
        format!("{}_{}", self.scope, collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use chrono::Utc;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password: "secret".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_guest_scope_when_anonymous() {
        let ns = Namespace::for_session(&Session::Anonymous);
        assert_eq!(ns.resolve("todos"), "guest_todos");
        assert_eq!(ns, Namespace::guest());
    }

    #[test]
    fn test_user_scope_when_authenticated() {
        let session = Session::Authenticated(user("1700000000000"));
        let ns = Namespace::for_session(&session);
        assert_eq!(ns.resolve("folders"), "1700000000000_folders");
        assert_eq!(
            ns.resolve("todos"),
            Namespace::for_user("1700000000000").resolve("todos")
        );
    }

    #[test]
    fn test_users_never_collide() {
        let a = Namespace::for_session(&Session::Authenticated(user("1")));
        let b = Namespace::for_session(&Session::Authenticated(user("2")));
        assert_ne!(a.resolve("notes"), b.resolve("notes"));
    }
}
