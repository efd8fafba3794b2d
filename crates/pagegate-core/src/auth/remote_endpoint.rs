//! Credentials checked by a remote script endpoint.
//!
//! The endpoint receives `action=authenticate` with the username and
//! password and answers with JSON carrying a boolean `success`. Only
//! `"success": true` admits the visitor; every other field is ignored.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::http::{build_client, check_response, DEFAULT_REQUEST_TIMEOUT_SECS};
use super::CredentialVerifier;
use crate::error::AuthError;

const AUTHENTICATE_ACTION: &str = "authenticate";

/// How the credentials travel to the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMethod {
    /// JSON body
    #[default]
    Post,
    /// Query parameters
    Get,
}

#[derive(Debug, Serialize)]
struct AuthenticateRequest<'a> {
    action: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct RemoteEndpointVerifier {
    client: Client,
    url: String,
    method: EndpointMethod,
}

impl RemoteEndpointVerifier {
    pub fn new(url: &str) -> Result<Self, AuthError> {
        Self::with_options(
            url,
            EndpointMethod::default(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_options(url: &str, method: EndpointMethod, timeout: Duration) -> Result<Self, AuthError> {
        Ok(Self {
            client: build_client(timeout)?,
            url: url.to_string(),
            method,
        })
    }

    pub async fn try_verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let request = AuthenticateRequest {
            action: AUTHENTICATE_ACTION,
            username,
            password,
        };

        let builder = match self.method {
            EndpointMethod::Post => self.client.post(&self.url).json(&request),
            EndpointMethod::Get => self.client.get(&self.url).query(&request),
        };

        let response = check_response(builder.send().await?).await?;
        let text = response.text().await?;
        let success = parse_success(&text)?;
        debug!(url = %self.url, method = ?self.method, success, "Endpoint answered");
        Ok(success)
    }
}

/// `true` only for a JSON body whose `success` is the boolean `true`.
fn parse_success(body: &str) -> Result<bool, AuthError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AuthError::InvalidResponse(format!("Endpoint did not return JSON: {}", e)))?;
    Ok(matches!(value.get("success"), Some(Value::Bool(true))))
}

#[async_trait]
impl CredentialVerifier for RemoteEndpointVerifier {
    async fn verify(&self, username: &str, password: &str) -> bool {
        match self.try_verify(username, password).await {
            Ok(success) => success,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Endpoint check failed");
                false
            }
        }
    }
}
