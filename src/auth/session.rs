//! In-memory session state.

use std::sync::{Arc, RwLock};

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Identity provider subject id; the key for every per-user request.
    pub subject_id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if !self.email.is_empty() {
            &self.email
        } else {
            &self.subject_id
        }
    }
}

/// Shared handle to the current session.
///
/// Cloning the store shares the session; it lives as long as the process and
/// is never written to disk.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<User>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with `user`.
    pub fn login(&self, user: User) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(user);
    }

    /// Clear the session. Returns the user that was signed in, if any.
    pub fn logout(&self) -> Option<User> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.take()
    }

    /// Snapshot of the signed-in user.
    pub fn current(&self) -> Option<User> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Subject id of the signed-in user, if any.
    pub fn user_id(&self) -> Option<String> {
        self.current()
            .map(|u| u.subject_id)
            .filter(|id| !id.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User {
            subject_id: "42".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn test_login_logout() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());

        store.login(ada());
        assert_eq!(store.user_id().as_deref(), Some("42"));

        let previous = store.logout();
        assert_eq!(previous, Some(ada()));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let view = store.clone();
        store.login(ada());
        assert_eq!(view.current(), Some(ada()));
    }

    #[test]
    fn test_empty_subject_is_not_authenticated() {
        let store = SessionStore::new();
        store.login(User {
            subject_id: String::new(),
            ..ada()
        });
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = ada();
        assert_eq!(user.display_name(), "Ada");
        user.name.clear();
        assert_eq!(user.display_name(), "ada@example.com");
        user.email.clear();
        assert_eq!(user.display_name(), "42");
    }
}
