//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (database, seeding)
//! - `routes/`: controllers, registered on a [`RouteRegistry`]
//! - `dto.rs`: request/response DTOs and query mapping helpers
//! - `errors.rs`: the error taxonomy and its responses

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header, request::Parts};
use axum::response::Response;
use regex::Regex;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use fleetroster_auth::CredentialStore;
use fleetroster_infra::{Database, SqliteCredentialStore};

use crate::app::errors::{ApiError, json_error};
use crate::middleware;
use crate::registry::{self, RouteRegistry};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

const LOCALHOST_ORIGIN: &str = r"(?i)localhost:\d{4,5}$";

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(db: &Database) -> Router {
    let mut registry = RouteRegistry::new();
    routes::register_all(&mut registry, db);

    let credentials: Arc<dyn CredentialStore> = Arc::new(SqliteCredentialStore::new(db));
    router_from(registry, credentials)
}

/// Mount a registry behind the authentication gate and the outer layers.
///
/// Layer order, outermost first: CORS, tracing, panic boundary, gate.
pub fn router_from(controllers: RouteRegistry, credentials: Arc<dyn CredentialStore>) -> Router {
    let auth_state = middleware::AuthState { credentials };

    controllers
        .into_router()
        .fallback(registry::not_found)
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        // Separate call: `Cors` needs a `Default` response body, which the
        // trace body lacks; `Router::layer` re-boxes into `axum::body::Body`.
        .layer(cors())
}

fn cors() -> CorsLayer {
    let allowed = match Regex::new(LOCALHOST_ORIGIN) {
        Ok(re) => AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
            origin.to_str().map(|o| re.is_match(o)).unwrap_or(false)
        }),
        Err(err) => {
            tracing::error!(error = %err, "invalid CORS origin pattern; cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %message, "request handler panicked");

    json_error(StatusCode::INTERNAL_SERVER_ERROR, &ApiError::internal(message))
}
