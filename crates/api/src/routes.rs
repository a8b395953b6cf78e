//! HTTP routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::entity::EntityCatalog;
use crate::error::{ApiError, ApiResult};
use crate::store::RecordStore;
use crate::unique::UniqueRequest;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Record lookups.
    pub store: Arc<dyn RecordStore>,
    /// Property constraints.
    pub catalog: Arc<EntityCatalog>,
}

impl AppState {
    /// Creates the state.
    pub fn new(store: Arc<dyn RecordStore>, catalog: EntityCatalog) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/check_unique_entity", post(check_unique_entity))
        .route("/check_entity", post(check_entity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn check_unique_entity(
    State(state): State<AppState>,
    Json(request): Json<UniqueRequest>,
) -> ApiResult<Json<bool>> {
    let valid = request.check(state.store.as_ref())?;
    debug!(
        entity = request.entity_name.as_deref().unwrap_or(""),
        from_validator = request.check_from_validator,
        valid,
        "uniqueness checked"
    );
    Ok(Json(valid))
}

async fn check_entity(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Option<bool>>> {
    let Some(data) = body.get("data") else {
        return Ok(Json(None));
    };
    let data = data
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("data must be an object".to_owned()))?;
    let entity = body.get("entityName").and_then(Value::as_str).unwrap_or("");
    let Some(rules) = state.catalog.entity(entity) else {
        debug!(entity, "unknown entity");
        return Ok(Json(Some(false)));
    };

    let groups: Vec<&str> = match body.get("groups") {
        Some(Value::Array(groups)) => groups.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(group)) => vec![group.as_str()],
        _ => Vec::new(),
    };
    for group in groups {
        let valid = rules.validate(data, group)?;
        if !valid {
            debug!(entity, group, "entity rejected");
            return Ok(Json(Some(false)));
        }
    }
    Ok(Json(Some(true)))
}
