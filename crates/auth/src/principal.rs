use serde::Serialize;

use crate::AccessLevel;

/// The authenticated identity attached to a request.
///
/// Resolved once per request from the credential store. Fields are private
/// so a resolved access level cannot be widened afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    token: String,
    access_level: AccessLevel,
}

impl Principal {
    pub fn new(token: impl Into<String>, access_level: AccessLevel) -> Self {
        Self {
            token: token.into(),
            access_level,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }
}
