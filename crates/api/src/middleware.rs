use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use fleetroster_auth::CredentialStore;

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialStore>,
}

/// Authentication gate: bearer token → principal, one store lookup per request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())
        .inspect_err(|_| debug!(path = %req.uri().path(), "missing or malformed bearer token"))?
        .to_string();

    let principal = state
        .credentials
        .resolve(&token)
        .await?
        .ok_or_else(|| {
            debug!(path = %req.uri().path(), "unknown bearer token");
            ApiError::InvalidToken
        })?;

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

/// `Authorization: Bearer <token>`; the token is a single non-empty word.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?;

    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?
        .trim();

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(ApiError::Unauthorized);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::http::header::AUTHORIZATION;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer tok-read")).unwrap(), "tok-read");
        assert_eq!(extract_bearer(&headers("Bearer  tok-read ")).unwrap(), "tok-read");
    }

    #[test]
    fn malformed_headers_are_unauthorized() {
        assert!(matches!(extract_bearer(&HeaderMap::new()), Err(ApiError::Unauthorized)));
        for value in ["tok-read", "Basic dXNlcjpwdw==", "Bearer ", "bearer tok", "Bearer a b"] {
            assert!(
                matches!(extract_bearer(&headers(value)), Err(ApiError::Unauthorized)),
                "{value}"
            );
        }
    }
}
