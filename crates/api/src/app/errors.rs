//! API error taxonomy and its HTTP mapping.
//!
//! Gate/guard rejections answer `{message}`; validation failures answer the
//! violation list; everything else answers `{error, status, stack}` where
//! `stack` is the error's source chain.

use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;

use fleetroster_auth::{AuthzError, CredentialError};
use fleetroster_core::{DomainError, Violation};
use fleetroster_infra::StoreError;

pub const MISSING_TOKEN: &str = "Unauthorized: Missing or invalid token";
pub const INVALID_TOKEN: &str = "Forbidden: Invalid token";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: Missing or invalid token")]
    Unauthorized,

    #[error("Forbidden: Invalid token")]
    InvalidToken,

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error("{0}")]
    BadRequest(String),

    #[error("validation failed")]
    Validation(Vec<Violation>),

    #[error("Not Found")]
    NotFound,

    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(violations) => Self::Validation(violations),
            DomainError::IdMismatch { .. } => Self::BadRequest(err.to_string()),
            DomainError::InvalidId(_) | DomainError::NotFound => Self::NotFound,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(domain) => domain.into(),
            other => Self::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        Self::Internal {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// `{message}` body used by the gate, the guard, and the credential exchange.
pub fn json_message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

/// `{error, status, stack}` body.
///
/// `stack` lists the source chain; a source repeating its parent's message
/// is listed once.
pub fn json_error(status: StatusCode, err: &(dyn StdError + 'static)) -> Response {
    (status, Json(error_body(status, err))).into_response()
}

pub fn error_body(status: StatusCode, err: &(dyn StdError + 'static)) -> Value {
    let mut stack = Vec::new();
    let mut current = Some(err);
    while let Some(e) = current {
        let line = e.to_string();
        if stack.last() != Some(&line) {
            stack.push(line);
        }
        current = e.source();
    }
    json!({
        "error": err.to_string(),
        "status": status.as_u16(),
        "stack": stack,
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Unauthorized | Self::InvalidToken | Self::Forbidden(_) => {
                json_message(status, self.to_string())
            }
            Self::Validation(violations) => (status, Json(violations)).into_response(),
            Self::Internal { .. } => {
                tracing::error!(error = %self, source = ?StdError::source(&self), "request failed");
                json_error(status, &self)
            }
            Self::BadRequest(_) | Self::NotFound => json_error(status, &self),
        }
    }
}
