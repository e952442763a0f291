use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
  error::{ApiError, ApiResult, not_found_plural},
  objects, state::AppState,
};

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Value> {
  let items = state
    .services()
    .iter()
    .map(|(name, svc)| objects::pod(name, svc, &state.namespace))
    .collect();
  Json(objects::list("Pod", "v1", items))
}

pub async fn get(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
  let name = params.get("name").cloned().unwrap_or_default();
  match state.services().get(&name) {
    Some(svc) => Ok(Json(objects::pod(&name, svc, &state.namespace))),
    None => Err(not_found_plural("pods", &name)),
  }
}

pub async fn logs(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
  Query(qs): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
  let name = params.get("name").cloned().unwrap_or_default();
  if !state.services().contains_key(&name) {
    return Err(not_found_plural("pods", &name));
  }
  if !state.runtime.available {
    return Err(ApiError::NotImplemented(
      "runtime socket not mounted".to_string(),
    ));
  }
  let container_id = state
    .runtime
    .find_container(&state.project_name, &name)
    .await
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "container for pod \"{name}\" not found"
      ))
    })?;
  let tail = qs.get("tailLines").cloned().unwrap_or_else(|| "100".to_string());
  let log_bytes = state
    .runtime
    .get_logs(&container_id, &tail)
    .await
    .ok_or_else(|| {
      ApiError::InternalError("failed to retrieve logs".to_string())
    })?;

  Ok(
    (
      StatusCode::OK,
      [(header::CONTENT_TYPE, "text/plain")],
      log_bytes,
    )
      .into_response(),
  )
}
