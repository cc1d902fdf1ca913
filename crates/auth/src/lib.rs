//! `fleetroster-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the API layer
//! extracts bearer tokens, infra provides a [`CredentialStore`] backed by the
//! database, and everything in between lives here.

pub mod access;
pub mod authorize;
pub mod credentials;
pub mod password;
pub mod principal;

pub use access::{AccessLevel, ParseAccessLevelError};
pub use authorize::{AuthzError, authorize};
pub use credentials::{CredentialError, CredentialStore, InMemoryCredentialStore};
pub use password::{PasswordError, hash_password, verify_password};
pub use principal::Principal;
