//! Credential exchange: username + password → bearer token.

use axum::http::{Method, StatusCode};

use fleetroster_auth::{AccessLevel, verify_password};
use fleetroster_infra::UserRepository;

use crate::app::dto::{LoginRequest, MessageResponse, TokenResponse};
use crate::app::errors::ApiError;
use crate::registry::{ActionRequest, ActionResult, Reply, RouteRegistry};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn register(registry: &mut RouteRegistry, users: UserRepository) {
    registry
        .controller("/users")
        .route(Method::POST, "", "login", AccessLevel::Read, move |req| {
            login(users.clone(), req)
        });
}

async fn login(users: UserRepository, req: ActionRequest) -> ActionResult {
    let Some(credentials) = LoginRequest::from_body(req.body()) else {
        return message(StatusCode::BAD_REQUEST, "Username and password are required");
    };

    let Some(user) = users.find_by_username(&credentials.username).await? else {
        return message(StatusCode::NOT_FOUND, INVALID_CREDENTIALS);
    };

    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&credentials.password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("password check aborted: {e}")))?;

    if !matches {
        tracing::debug!(username = %user.username, "password mismatch");
        return message(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS);
    }

    Reply::ok(&TokenResponse { token: user.token }).map(Some)
}

fn message(status: StatusCode, text: &str) -> ActionResult {
    Reply::json(status, &MessageResponse::new(text)).map(Some)
}
