//! Session state for a logged-in visitor.
//!
//! This module provides:
//! - `SessionRecord`: who logged in, when, and an opaque display token
//! - `SessionStore`: create/read/destroy of the single record in `Storage`
//!
//! Sessions expire 24 hours after login. Expiry is only noticed when the
//! record is read; there is no background sweep.

pub mod record;
pub mod store;

pub use record::{generate_token, SessionRecord, SESSION_TTL_HOURS};
pub use store::{SessionStore, DEFAULT_STORAGE_KEY};
