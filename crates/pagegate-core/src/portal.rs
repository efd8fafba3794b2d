//! The entry points a site's pages call: log in, log out, and check.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::auth::CredentialVerifier;
use crate::config::Config;
use crate::guard::{Guard, Navigator};
use crate::session::{SessionRecord, SessionStore};
use crate::storage::Storage;

pub struct Portal {
    verifier: Arc<dyn CredentialVerifier>,
    store: SessionStore,
    guard: Guard,
}

impl Portal {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        store: SessionStore,
        navigator: Arc<dyn Navigator>,
        login_page: &str,
    ) -> Self {
        let guard = Guard::new(store.clone(), navigator, login_page);
        Self {
            verifier,
            store,
            guard,
        }
    }

    /// Wire up the verifier, storage key and login page named by `config`
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let verifier = Arc::new(config.verifier()?);
        let store = SessionStore::with_key(storage, &config.storage_key);
        Ok(Self::new(verifier, store, navigator, &config.login_page))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Check the pair and, if accepted, start a session for `username`.
    ///
    /// `Ok(false)` covers every refusal: unknown user, wrong password, or
    /// a credential source that could not be consulted.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        if !self.verifier.verify(username, password).await {
            warn!(username, "Login refused");
            return Ok(false);
        }

        self.store.create(username)?;
        info!(username, "Logged in");
        Ok(true)
    }

    /// End the session and return to the login page
    pub fn logout(&self) -> Result<()> {
        self.store.destroy()?;
        info!("Logged out");
        self.guard.redirect_to_login();
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read().is_some()
    }

    pub fn session(&self) -> Option<SessionRecord> {
        self.store.read()
    }

    /// Guard for protected pages
    pub fn require_auth(&self) -> Option<SessionRecord> {
        self.guard.ensure_authenticated()
    }
}
