use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One entry of a credential source. `password` is either cleartext or the
/// lowercase hex SHA-256 digest of the cleartext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Exact, unhashed comparison
    pub fn matches_plain(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// Accepts the stored field as the cleartext itself or as its digest.
    /// `password_digest` is `sha256_hex(password)`, computed once per lookup.
    pub fn matches_plain_or_digest(&self, username: &str, password: &str, password_digest: &str) -> bool {
        self.username == username && (self.password == password || self.password == password_digest)
    }
}

/// Lowercase hex SHA-256 digest of `input`.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}
