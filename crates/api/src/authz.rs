//! Route-level authorization guard.
//!
//! Runs in the dispatcher before any action, so controllers never check
//! access themselves.

use tracing::debug;

use fleetroster_auth::{AccessLevel, authorize};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// Check the request principal against a binding's required access level.
pub fn authorize_route(principal: &PrincipalContext, required: AccessLevel) -> Result<(), ApiError> {
    authorize(principal.principal(), required).map_err(|err| {
        debug!(
            required = %required,
            held = %principal.access_level(),
            "insufficient access level"
        );
        ApiError::from(err)
    })
}
