use fleetroster_auth::{AccessLevel, Principal};

/// Principal context for a request (authenticated token + access level).
///
/// Inserted into request extensions by the authentication gate; immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn access_level(&self) -> AccessLevel {
        self.principal.access_level()
    }

    pub fn into_principal(self) -> Principal {
        self.principal
    }
}
