//! Shared HTTP plumbing for the remote credential sources.

use std::time::Duration;

use reqwest::Client;

use crate::error::AuthError;

/// HTTP request timeout in seconds.
/// A login form should fail rather than hang on an unresponsive sheet.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Build the client used by the remote strategies.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
pub fn build_client(timeout: Duration) -> Result<Client, AuthError> {
    let builder = Client::builder().timeout(timeout);
    // Test stubs listen on loopback and must not be routed via HTTP_PROXY
    #[cfg(test)]
    let builder = builder.no_proxy();
    Ok(builder.build()?)
}

/// Check if response is successful, returning an error with body if not.
pub async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AuthError::from_status(status, &body))
    }
}
