//! Uniform CRUD controller for every crew kind.

use axum::http::Method;

use fleetroster_auth::AccessLevel;
use fleetroster_core::RecordId;
use fleetroster_crew::{CrewResource, ensure_body_id, merge_update, validate_new};
use fleetroster_infra::CrewStore;

use crate::app::dto::{self, MessageResponse};
use crate::registry::{ActionRequest, ActionResult, Reply, RouteRegistry};

pub fn register<R: CrewResource>(registry: &mut RouteRegistry, base_path: &str, store: CrewStore<R>) {
    let (s1, s2, s3, s4, s5) = (store.clone(), store.clone(), store.clone(), store.clone(), store);
    registry
        .controller(base_path)
        .route(Method::GET, "/", "list", AccessLevel::Read, move |req| list(s1.clone(), req))
        .route(Method::GET, "/:id", "one", AccessLevel::Read, move |req| one(s2.clone(), req))
        .route(Method::POST, "", "create", AccessLevel::Write, move |req| create(s3.clone(), req))
        .route(Method::PUT, "/:id", "update", AccessLevel::Write, move |req| update(s4.clone(), req))
        .route(Method::DELETE, "/:id", "delete", AccessLevel::Write, move |req| delete(s5.clone(), req));
}

/// Path id; anything that is not a record id cannot name a record.
fn path_id(req: &ActionRequest) -> Option<RecordId> {
    req.param("id").and_then(|id| id.parse().ok())
}

async fn list<R: CrewResource>(store: CrewStore<R>, req: ActionRequest) -> ActionResult {
    let records = store.list(&dto::list_query(&req)).await?;
    Reply::ok(&records).map(Some)
}

async fn one<R: CrewResource>(store: CrewStore<R>, req: ActionRequest) -> ActionResult {
    let Some(id) = path_id(&req) else {
        return Ok(None);
    };
    match store.get(id).await? {
        Some(record) => Reply::ok(&record).map(Some),
        None => Ok(None),
    }
}

async fn create<R: CrewResource>(store: CrewStore<R>, req: ActionRequest) -> ActionResult {
    let record: R = validate_new(req.body())?;
    store.insert(&record).await?;
    tracing::info!(kind = R::KIND, id = %record.id(), "record created");
    Reply::created(&record).map(Some)
}

async fn update<R: CrewResource>(store: CrewStore<R>, req: ActionRequest) -> ActionResult {
    let raw_id = req.param("id").unwrap_or_default();
    ensure_body_id(raw_id, req.body())?;

    let Some(id) = path_id(&req) else {
        return Ok(None);
    };
    let Some(existing) = store.get(id).await? else {
        return Ok(None);
    };

    let updated = merge_update(&existing, req.body())?;
    if !store.update(&updated).await? {
        return Ok(None);
    }
    Reply::ok(&updated).map(Some)
}

async fn delete<R: CrewResource>(store: CrewStore<R>, req: ActionRequest) -> ActionResult {
    let Some(id) = path_id(&req) else {
        return Ok(None);
    };
    if !store.delete(id).await? {
        return Ok(None);
    }
    tracing::info!(kind = R::KIND, id = %id, "record deleted");
    Reply::ok(&MessageResponse::new(format!("Successfully deleted the {}", R::KIND))).map(Some)
}
