use async_trait::async_trait;

use super::{RemoteEndpointVerifier, RemoteTextVerifier, StaticListVerifier};

/// Anything that can say yes or no to a username/password pair.
///
/// `verify` never reports *why* a pair was refused. Sources that can fail
/// log the failure and answer `false`.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> bool;
}

/// The credential source a site was configured with.
#[derive(Debug, Clone)]
pub enum Verifier {
    StaticList(StaticListVerifier),
    RemoteText(RemoteTextVerifier),
    RemoteEndpoint(RemoteEndpointVerifier),
}

impl Verifier {
    pub fn name(&self) -> &'static str {
        match self {
            Verifier::StaticList(_) => "static",
            Verifier::RemoteText(_) => "csv",
            Verifier::RemoteEndpoint(_) => "endpoint",
        }
    }
}

#[async_trait]
impl CredentialVerifier for Verifier {
    async fn verify(&self, username: &str, password: &str) -> bool {
        match self {
            Verifier::StaticList(v) => v.verify(username, password).await,
            Verifier::RemoteText(v) => v.verify(username, password).await,
            Verifier::RemoteEndpoint(v) => v.verify(username, password).await,
        }
    }
}

impl From<StaticListVerifier> for Verifier {
    fn from(v: StaticListVerifier) -> Self {
        Verifier::StaticList(v)
    }
}

impl From<RemoteTextVerifier> for Verifier {
    fn from(v: RemoteTextVerifier) -> Self {
        Verifier::RemoteText(v)
    }
}

impl From<RemoteEndpointVerifier> for Verifier {
    fn from(v: RemoteEndpointVerifier) -> Self {
        Verifier::RemoteEndpoint(v)
    }
}
