//! pagegate core - login gating for static sites.
//!
//! A submitted username/password is checked by a [`Verifier`] against a
//! static list, a published CSV sheet or a remote script endpoint. A
//! successful check writes a [`SessionRecord`] into [`Storage`], and the
//! [`Guard`] sends visitors without a valid session back to the login page.
//!
//! None of this is access control in any real sense: the check runs on the
//! visitor's side and anyone can skip it.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod portal;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{CredentialRecord, CredentialVerifier, Verifier};
pub use config::Config;
pub use error::AuthError;
pub use guard::{Guard, Navigator};
pub use portal::Portal;
pub use session::{SessionRecord, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
