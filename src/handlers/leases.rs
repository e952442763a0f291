use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use serde_json::Value;

use crate::{
  error::{ApiError, ApiResult},
  extract::LenientJson,
  objects,
  state::AppState,
};

fn lease_not_found(name: &str) -> ApiError {
  ApiError::NotFound(format!(
    "leases.coordination.k8s.io \"{name}\" not found"
  ))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Value> {
  let leases = state.leases.read().await;
  Json(objects::list(
    "Lease",
    "coordination.k8s.io/v1",
    leases.values().cloned().collect(),
  ))
}

pub async fn get(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
  let name = params.get("name").cloned().unwrap_or_default();
  let leases = state.leases.read().await;
  leases
    .get(&name)
    .cloned()
    .map(Json)
    .ok_or_else(|| lease_not_found(&name))
}

/// absent -> present. Rejects present -> present with Conflict.
pub async fn create(
  State(state): State<Arc<AppState>>,
  LenientJson(body): LenientJson,
) -> ApiResult<(StatusCode, Json<Value>)> {
  let name = body
    .get("metadata")
    .and_then(|m| m.get("name"))
    .and_then(Value::as_str)
    .unwrap_or_default()
    .to_string();
  if name.is_empty() {
    return Err(ApiError::BadRequest(
      "metadata.name is required".to_string(),
    ));
  }
  let mut leases = state.leases.write().await;
  if leases.contains_key(&name) {
    return Err(ApiError::Conflict(format!(
      "leases.coordination.k8s.io \"{name}\" already exists"
    )));
  }
  let lease = objects::lease(&name, &state.namespace, &body);
  leases.insert(name, lease.clone());
  Ok((StatusCode::CREATED, Json(lease)))
}

/// absent|present -> present, idempotent create-or-replace. No
/// resource-version check.
pub async fn update(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
  LenientJson(body): LenientJson,
) -> Json<Value> {
  let name = params.get("name").cloned().unwrap_or_default();
  let lease = objects::lease(&name, &state.namespace, &body);
  state.leases.write().await.insert(name, lease.clone());
  Json(lease)
}

/// present -> absent. Rejects absent -> absent with NotFound.
pub async fn delete(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
  let name = params.get("name").cloned().unwrap_or_default();
  state
    .leases
    .write()
    .await
    .remove(&name)
    .map(Json)
    .ok_or_else(|| lease_not_found(&name))
}
