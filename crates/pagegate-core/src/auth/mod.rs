//! Credential verification for the login page.
//!
//! This module provides:
//! - `CredentialVerifier`: the one capability every credential source offers
//! - `StaticListVerifier`: a fixed in-memory list of users
//! - `RemoteTextVerifier`: a CSV export of a published spreadsheet
//! - `RemoteEndpointVerifier`: a remote script answering `{"success": bool}`
//! - `Verifier`: the strategy picked once at startup from configuration
//!
//! Every failure path fails closed: a source that cannot be reached or
//! answers nonsense verifies nobody.

pub mod credentials;
pub mod http;
pub mod remote_endpoint;
pub mod remote_text;
pub mod static_list;
pub mod verifier;

pub use credentials::{sha256_hex, CredentialRecord};
pub use remote_endpoint::{EndpointMethod, RemoteEndpointVerifier};
pub use remote_text::RemoteTextVerifier;
pub use static_list::StaticListVerifier;
pub use verifier::{CredentialVerifier, Verifier};
