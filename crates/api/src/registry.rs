//! Route registry: an explicit startup-time table of controller bindings.
//!
//! Controllers register a base path and then their routes (method, suffix,
//! action name, required access, action). [`RouteRegistry::into_router`]
//! resolves full paths, drops duplicate method+path pairs (first wins), and
//! mounts one dispatcher per binding on an axum [`Router`].
//!
//! Every dispatcher runs the same pipeline: build the [`ActionRequest`],
//! authorize against the binding's required level, invoke the action, map
//! the outcome to a response.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use fleetroster_auth::AccessLevel;

use crate::app::errors::ApiError;
use crate::authz::authorize_route;
use crate::context::PrincipalContext;

/// `Ok(None)` means "nothing here" and answers the generic 404.
pub type ActionResult = Result<Option<Reply>, ApiError>;
pub type ActionFuture = Pin<Box<dyn Future<Output = ActionResult> + Send>>;
type Action = Arc<dyn Fn(ActionRequest) -> ActionFuture + Send + Sync>;
type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

static NULL: Value = Value::Null;

/// Everything an action gets to see about the request.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub principal: PrincipalContext,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

impl ActionRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn has_query(&self, name: &str) -> bool {
        self.query.contains_key(name)
    }

    /// The JSON body, or `null` when the request had none.
    pub fn body(&self) -> &Value {
        self.body.as_ref().unwrap_or(&NULL)
    }
}

/// A successful action outcome: status plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn json(status: StatusCode, body: &impl Serialize) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::internal(format!("failed to encode response: {e}")))?;
        Ok(Self { status, body })
    }

    pub fn ok(body: &impl Serialize) -> Result<Self, ApiError> {
        Self::json(StatusCode::OK, body)
    }

    pub fn created(body: &impl Serialize) -> Result<Self, ApiError> {
        Self::json(StatusCode::CREATED, body)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// A route as declared by a controller, before path resolution.
#[derive(Clone)]
struct Declared {
    method: Method,
    path_suffix: String,
    action_name: &'static str,
    required: AccessLevel,
    action: Action,
}

struct Controller {
    base_path: String,
    routes: Vec<Declared>,
}

/// A resolved method + full path binding.
#[derive(Clone)]
pub struct RouteBinding {
    pub method: Method,
    pub path: String,
    pub action_name: &'static str,
    pub required: AccessLevel,
    action: Action,
}

impl fmt::Debug for RouteBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBinding")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("action_name", &self.action_name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct RouteRegistry {
    controllers: Vec<Controller>,
}

/// Handle for adding routes to one controller.
pub struct ControllerRoutes<'a> {
    controller: &'a mut Controller,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or reopen) the controller mounted at `base_path`.
    pub fn controller(&mut self, base_path: &str) -> ControllerRoutes<'_> {
        let index = match self.controllers.iter().position(|c| c.base_path == base_path) {
            Some(index) => index,
            None => {
                self.controllers.push(Controller {
                    base_path: base_path.to_string(),
                    routes: Vec::new(),
                });
                self.controllers.len() - 1
            }
        };
        ControllerRoutes {
            controller: &mut self.controllers[index],
        }
    }

    /// Resolved bindings in registration order, duplicates removed.
    pub fn bindings(&self) -> Vec<RouteBinding> {
        let mut seen = HashSet::new();
        let mut bindings = Vec::new();

        for controller in &self.controllers {
            for route in &controller.routes {
                let path = join_path(&controller.base_path, &route.path_suffix);
                if !seen.insert((route.method.clone(), path.clone())) {
                    warn!(
                        method = %route.method,
                        path = %path,
                        action = route.action_name,
                        "duplicate route binding skipped"
                    );
                    continue;
                }
                bindings.push(RouteBinding {
                    method: route.method.clone(),
                    path,
                    action_name: route.action_name,
                    required: route.required,
                    action: Arc::clone(&route.action),
                });
            }
        }

        bindings
    }

    /// Mount every binding on a router. Unregistered methods on a known
    /// path answer 404 like any unknown path.
    pub fn into_router(self) -> Router {
        let mut paths: Vec<(String, MethodRouter)> = Vec::new();

        for binding in self.bindings() {
            let filter = match MethodFilter::try_from(binding.method.clone()) {
                Ok(filter) => filter,
                Err(_) => {
                    warn!(method = %binding.method, path = %binding.path, "unsupported method; route skipped");
                    continue;
                }
            };
            debug!(
                method = %binding.method,
                path = %binding.path,
                action = binding.action_name,
                required = %binding.required,
                "route bound"
            );

            let path = binding.path.clone();
            let binding = Arc::new(binding);
            let handler = move |Extension(principal): Extension<PrincipalContext>,
                                params: Option<Path<HashMap<String, String>>>,
                                Query(query): Query<HashMap<String, String>>,
                                body: Bytes| {
                let binding = Arc::clone(&binding);
                let response: ResponseFuture = Box::pin(async move {
                    let request = ActionRequest {
                        principal,
                        params: params.map(|Path(p)| p).unwrap_or_default(),
                        query,
                        body: None,
                    };
                    dispatch(&binding, request, &body).await
                });
                response
            };
            match paths.iter_mut().find(|(p, _)| *p == path) {
                Some((_, router)) => {
                    let current = std::mem::replace(router, MethodRouter::new());
                    *router = current.on(filter, handler);
                }
                None => paths.push((path, axum::routing::on(filter, handler))),
            }
        }

        paths
            .into_iter()
            .fold(Router::new(), |router, (path, methods)| {
                router.route(&path, methods.fallback(not_found))
            })
    }
}

impl ControllerRoutes<'_> {
    pub fn route<F, Fut>(
        &mut self,
        method: Method,
        path_suffix: &str,
        action_name: &'static str,
        required: AccessLevel,
        action: F,
    ) -> &mut Self
    where
        F: Fn(ActionRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        let action: Action = Arc::new(move |req: ActionRequest| -> ActionFuture { Box::pin(action(req)) });
        self.controller.routes.push(Declared {
            method,
            path_suffix: path_suffix.to_string(),
            action_name,
            required,
            action,
        });
        self
    }
}

/// `base` + `suffix`, single slashes, no trailing slash except for `/`.
fn join_path(base: &str, suffix: &str) -> String {
    let parts = [base.trim_matches('/'), suffix.trim_matches('/')];
    let joined = parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

fn parse_body(body: &Bytes) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {e}")))
}

/// Authorize, parse the body, run the action, map the outcome.
pub(crate) async fn dispatch(binding: &RouteBinding, mut request: ActionRequest, raw_body: &Bytes) -> Response {
    if let Err(err) = authorize_route(&request.principal, binding.required) {
        return err.into_response();
    }

    request.body = match parse_body(raw_body) {
        Ok(body) => body,
        Err(err) => return err.into_response(),
    };

    match (binding.action)(request).await {
        Ok(Some(reply)) => reply.into_response(),
        Ok(None) => ApiError::NotFound.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn not_found() -> Response {
    ApiError::NotFound.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fleetroster_auth::Principal;
    use serde_json::json;

    async fn named(name: &'static str) -> ActionResult {
        Reply::ok(&json!({ "action": name })).map(Some)
    }

    fn widgets() -> RouteRegistry {
        let mut registry = RouteRegistry::new();
        registry
            .controller("/widgets")
            .route(Method::GET, "/", "all", AccessLevel::Read, |_| named("all"))
            .route(Method::GET, "/:id", "one", AccessLevel::Read, |_| named("one"))
            .route(Method::POST, "", "save", AccessLevel::Write, |_| named("save"));
        registry
    }

    fn request(level: AccessLevel) -> ActionRequest {
        ActionRequest {
            principal: PrincipalContext::new(Principal::new("tok", level)),
            params: HashMap::new(),
            query: HashMap::new(),
            body: None,
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn paths_are_joined_without_trailing_slash() {
        assert_eq!(join_path("/widgets", "/"), "/widgets");
        assert_eq!(join_path("/widgets", ""), "/widgets");
        assert_eq!(join_path("/widgets", "/:id"), "/widgets/:id");
        assert_eq!(join_path("/widgets/", ":id/"), "/widgets/:id");
        assert_eq!(join_path("/", "/"), "/");
        assert_eq!(join_path("", ""), "/");
    }

    #[test]
    fn bindings_keep_declaration_order() {
        let bindings = widgets().bindings();
        let table: Vec<_> = bindings
            .iter()
            .map(|b| (b.method.clone(), b.path.as_str(), b.action_name, b.required))
            .collect();
        assert_eq!(
            table,
            [
                (Method::GET, "/widgets", "all", AccessLevel::Read),
                (Method::GET, "/widgets/:id", "one", AccessLevel::Read),
                (Method::POST, "/widgets", "save", AccessLevel::Write),
            ]
        );
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = widgets();
        registry
            .controller("/widgets")
            .route(Method::GET, "", "shadowed", AccessLevel::Read, |_| named("shadowed"))
            .route(Method::DELETE, "/:id", "remove", AccessLevel::Write, |_| named("remove"));

        let names: Vec<_> = registry.bindings().iter().map(|b| b.action_name).collect();
        assert_eq!(names, ["all", "one", "save", "remove"]);
    }

    #[test]
    fn reopening_a_controller_appends() {
        let mut registry = RouteRegistry::new();
        registry
            .controller("/a")
            .route(Method::GET, "", "first", AccessLevel::Read, |_| named("first"));
        registry
            .controller("/b")
            .route(Method::GET, "", "other", AccessLevel::Read, |_| named("other"));
        registry
            .controller("/a")
            .route(Method::PUT, "/:id", "second", AccessLevel::Write, |_| named("second"));

        let paths: Vec<_> = registry
            .bindings()
            .iter()
            .map(|b| (b.path.clone(), b.action_name))
            .collect();
        assert_eq!(
            paths,
            [
                ("/a".to_string(), "first"),
                ("/a/:id".to_string(), "second"),
                ("/b".to_string(), "other"),
            ]
        );
    }

    #[tokio::test]
    async fn read_principal_never_reaches_write_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut registry = RouteRegistry::new();
        registry.controller("/widgets").route(
            Method::DELETE,
            "/:id",
            "delete",
            AccessLevel::Write,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                named("delete")
            },
        );
        let binding = registry.bindings().remove(0);

        let response = dispatch(&binding, request(AccessLevel::Read), &Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Forbidden: Insufficient access level" })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let response = dispatch(&binding, request(AccessLevel::Write), &Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_outcome_falls_through_to_not_found() {
        let mut registry = RouteRegistry::new();
        registry
            .controller("/widgets")
            .route(Method::GET, "/:id", "one", AccessLevel::Read, |_| async { ActionResult::Ok(None) });
        let binding = registry.bindings().remove(0);

        let response = dispatch(&binding, request(AccessLevel::Read), &Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["error"], "Not Found");
    }

    #[tokio::test]
    async fn action_errors_use_the_taxonomy() {
        let mut registry = RouteRegistry::new();
        registry.controller("/widgets").route(
            Method::PUT,
            "/:id",
            "update",
            AccessLevel::Write,
            |_| async { ActionResult::Err(ApiError::BadRequest("ids differ".into())) },
        );
        let binding = registry.bindings().remove(0);

        let response = dispatch(&binding, request(AccessLevel::Write), &Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["stack"], json!(["ids differ"]));
    }

    #[test]
    fn body_parsing() {
        assert_eq!(parse_body(&Bytes::new()).unwrap(), None);
        assert_eq!(parse_body(&Bytes::from_static(b" \n")).unwrap(), None);
        assert_eq!(parse_body(&Bytes::from_static(b"{\"a\":1}")).unwrap(), Some(json!({"a": 1})));
        assert!(matches!(
            parse_body(&Bytes::from_static(b"{nope")),
            Err(ApiError::BadRequest(_))
        ));
    }
}
