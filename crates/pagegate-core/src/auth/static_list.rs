use async_trait::async_trait;
use tracing::debug;

use super::{CredentialRecord, CredentialVerifier};

/// Users known to a site built without any remote source.
pub fn default_users() -> Vec<CredentialRecord> {
    vec![
        CredentialRecord::new("admin", "admin100"),
        CredentialRecord::new("user", "12345"),
    ]
}

/// Exact match against an in-memory list. No hashing.
#[derive(Debug, Clone)]
pub struct StaticListVerifier {
    users: Vec<CredentialRecord>,
}

impl StaticListVerifier {
    pub fn new(users: Vec<CredentialRecord>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> &[CredentialRecord] {
        &self.users
    }

    pub fn find(&self, username: &str, password: &str) -> Option<&CredentialRecord> {
        self.users.iter().find(|u| u.matches_plain(username, password))
    }
}

impl Default for StaticListVerifier {
    fn default() -> Self {
        Self::new(default_users())
    }
}

#[async_trait]
impl CredentialVerifier for StaticListVerifier {
    async fn verify(&self, username: &str, password: &str) -> bool {
        let found = self.find(username, password).is_some();
        debug!(username, found, "Static list lookup");
        found
    }
}
