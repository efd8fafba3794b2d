//! Gate run at the top of every protected page.

use std::sync::Arc;

use tracing::debug;

use crate::session::{SessionRecord, SessionStore};

/// Default login entry point
pub const DEFAULT_LOGIN_PAGE: &str = "login.html";

/// Whatever moves the visitor to another page.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}

#[derive(Clone)]
pub struct Guard {
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    login_page: String,
}

impl Guard {
    pub fn new(store: SessionStore, navigator: Arc<dyn Navigator>, login_page: &str) -> Self {
        Self {
            store,
            navigator,
            login_page: login_page.to_string(),
        }
    }

    pub fn login_page(&self) -> &str {
        &self.login_page
    }

    /// Send the visitor to the login page unless a valid session exists.
    ///
    /// The session seen is returned for convenience; callers are free to
    /// ignore it.
    pub fn ensure_authenticated(&self) -> Option<SessionRecord> {
        let session = self.store.read();
        if session.is_none() {
            debug!(target_page = %self.login_page, "No valid session, redirecting");
            self.navigator.redirect(&self.login_page);
        }
        session
    }

    pub(crate) fn redirect_to_login(&self) {
        self.navigator.redirect(&self.login_page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};
    use crate::test_support::RecordingNavigator;
    use chrono::{Duration, Utc};

    fn guard() -> (Arc<MemoryStorage>, Arc<RecordingNavigator>, SessionStore, Guard) {
        let storage = Arc::new(MemoryStorage::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let store = SessionStore::new(storage.clone());
        let guard = Guard::new(store.clone(), navigator.clone(), DEFAULT_LOGIN_PAGE);
        (storage, navigator, store, guard)
    }

    #[test]
    fn test_redirects_without_session() {
        let (_, navigator, _, guard) = guard();
        assert!(guard.ensure_authenticated().is_none());
        assert_eq!(navigator.redirects(), vec!["login.html".to_string()]);
    }

    #[test]
    fn test_allows_valid_session() {
        let (_, navigator, store, guard) = guard();
        store.create("admin").unwrap();

        let session = guard.ensure_authenticated().unwrap();
        assert_eq!(session.username, "admin");
        assert!(navigator.redirects().is_empty());
    }

    #[test]
    fn test_redirects_on_expired_session() {
        let (storage, navigator, store, guard) = guard();
        store.create_at("admin", Utc::now() - Duration::hours(25)).unwrap();

        assert!(guard.ensure_authenticated().is_none());
        assert_eq!(navigator.redirects().len(), 1);
        assert_eq!(storage.get(store.key()).unwrap(), None);
    }

    #[test]
    fn test_redirects_on_corrupt_session() {
        let (storage, navigator, store, guard) = guard();
        storage.set(store.key(), "{{{").unwrap();

        assert!(guard.ensure_authenticated().is_none());
        assert_eq!(navigator.redirects().len(), 1);
        assert_eq!(storage.get(store.key()).unwrap(), None);
    }

    #[test]
    fn test_custom_login_page() {
        let storage = Arc::new(MemoryStorage::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = Guard::new(SessionStore::new(storage), navigator.clone(), "/members/signin.html");

        guard.ensure_authenticated();
        assert_eq!(guard.login_page(), "/members/signin.html");
        assert_eq!(navigator.redirects(), vec!["/members/signin.html".to_string()]);
    }
}
