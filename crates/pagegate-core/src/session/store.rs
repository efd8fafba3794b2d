use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::SessionRecord;
use crate::storage::Storage;

/// Storage key the session record lives under
pub const DEFAULT_STORAGE_KEY: &str = "authSession";

/// The single session slot for this storage scope.
///
/// Reads heal the slot: a value that does not parse, or a record past its
/// 24h lifetime, is removed and reported as absent.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(storage: Arc<dyn Storage>, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Start a session for `username`, replacing any existing one
    pub fn create(&self, username: &str) -> Result<SessionRecord> {
        self.create_at(username, Utc::now())
    }

    pub fn create_at(&self, username: &str, now: DateTime<Utc>) -> Result<SessionRecord> {
        let record = SessionRecord::new(username, now);
        let contents = serde_json::to_string(&record)?;
        self.storage
            .set(&self.key, &contents)
            .context("Failed to save session")?;
        debug!(username = %record.username, "Session created");
        Ok(record)
    }

    /// The current session, if one exists and is still valid
    pub fn read(&self) -> Option<SessionRecord> {
        self.read_at(Utc::now())
    }

    pub fn read_at(&self, now: DateTime<Utc>) -> Option<SessionRecord> {
        let record = self.load()?;
        if record.is_expired_at(now) {
            debug!(username = %record.username, login_time = %record.login_time, "Session expired");
            self.purge();
            return None;
        }
        Some(record)
    }

    /// Parse the stored record without checking expiry or removing anything.
    pub fn peek(&self) -> Option<SessionRecord> {
        let contents = self.raw()?;
        serde_json::from_str(&contents).ok()
    }

    /// Remove the session. Succeeds when there is none.
    pub fn destroy(&self) -> Result<()> {
        self.storage
            .remove(&self.key)
            .context("Failed to remove session")
    }

    fn raw(&self) -> Option<String> {
        match self.storage.get(&self.key) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Session storage unreadable, treating as logged out");
                None
            }
        }
    }

    fn load(&self) -> Option<SessionRecord> {
        let contents = self.raw()?;
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Discarding malformed session");
                self.purge();
                None
            }
        }
    }

    fn purge(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            warn!(error = %e, "Failed to purge session");
        }
    }
}
