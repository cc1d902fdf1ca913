//! Request/response shapes and query mapping helpers.

use serde::Serialize;
use serde_json::Value;

use fleetroster_infra::ListQuery;

use crate::registry::ActionRequest;

/// `?sortBy=<column>&backwards&ship=<substring>`
pub fn list_query(req: &ActionRequest) -> ListQuery {
    ListQuery {
        sort_by: req.query_value("sortBy").map(str::to_string),
        descending: req.has_query("backwards"),
        ship: req.query_value("ship").map(str::to_string),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Credentials posted to `/users`. Non-string values count as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_body(body: &Value) -> Option<Self> {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(Self {
            username: field("username")?,
            password: field("password")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
