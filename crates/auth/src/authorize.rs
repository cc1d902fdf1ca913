use thiserror::Error;

use crate::{AccessLevel, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("Forbidden: Insufficient access level")]
    InsufficientAccess {
        required: AccessLevel,
        held: AccessLevel,
    },
}

/// Authorize a principal for an operation requiring `required`.
///
/// - No IO
/// - No panics
/// - Single policy for every route (callers never re-implement the check)
pub fn authorize(principal: &Principal, required: AccessLevel) -> Result<(), AuthzError> {
    let held = principal.access_level();
    if held.grants(required) {
        Ok(())
    } else {
        Err(AuthzError::InsufficientAccess { required, held })
    }
}
