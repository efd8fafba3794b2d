//! Credentials read from a published spreadsheet's CSV export.
//!
//! The sheet's first row is a header. Each following row holds a username
//! in the first column and a password, or its SHA-256 hex digest, in the
//! second. Further columns are ignored.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::http::{build_client, check_response, DEFAULT_REQUEST_TIMEOUT_SECS};
use super::{sha256_hex, CredentialRecord, CredentialVerifier};
use crate::error::AuthError;

/// CSV export URL of the first sheet of a Google spreadsheet
pub fn spreadsheet_csv_url(spreadsheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid=0",
        spreadsheet_id
    )
}

/// Parse the sheet body into candidate records.
///
/// Rows with an empty username or password are dropped.
pub fn parse_credentials(text: &str) -> Vec<CredentialRecord> {
    text.split('\n')
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split(',').map(str::trim);
            let username = fields.next().unwrap_or_default();
            let password = fields.next().unwrap_or_default();
            if username.is_empty() || password.is_empty() {
                None
            } else {
                Some(CredentialRecord::new(username, password))
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RemoteTextVerifier {
    client: Client,
    url: String,
}

impl RemoteTextVerifier {
    pub fn new(url: &str) -> Result<Self, AuthError> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, AuthError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
        })
    }

    /// Download and parse the current credential list
    pub async fn fetch_credentials(&self) -> Result<Vec<CredentialRecord>, AuthError> {
        let response = self.client.get(&self.url).send().await?;
        let response = check_response(response).await?;
        let text = response.text().await?;

        let records = parse_credentials(&text);
        debug!(url = %self.url, count = records.len(), "Fetched credential sheet");
        Ok(records)
    }

    pub async fn try_verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let records = self.fetch_credentials().await?;
        let digest = sha256_hex(password);
        Ok(records
            .iter()
            .any(|r| r.matches_plain_or_digest(username, password, &digest)))
    }
}

#[async_trait]
impl CredentialVerifier for RemoteTextVerifier {
    async fn verify(&self, username: &str, password: &str) -> bool {
        match self.try_verify(username, password).await {
            Ok(found) => found,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Credential sheet check failed");
                false
            }
        }
    }
}
