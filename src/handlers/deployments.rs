use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::Value;

use crate::{
  error::{ApiError, ApiResult},
  extract::LenientJson,
  objects,
  state::AppState,
};

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Value> {
  let items = state
    .services()
    .iter()
    .map(|(name, svc)| objects::deployment(name, svc, &state.namespace))
    .collect();
  Json(objects::list("Deployment", "apps/v1", items))
}

pub async fn get(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
  let name = params.get("name").cloned().unwrap_or_default();
  match state.services().get(&name) {
    Some(svc) => Ok(Json(objects::deployment(&name, svc, &state.namespace))),
    None => Err(deployment_not_found(&name)),
  }
}

/// The sole supported workload mutation: best-effort restart of the
/// backing container, then an unconditional 200 with a freshly-built
/// Deployment document carrying the restart annotation. A failed restart
/// is logged, never surfaced — clients treat the 200 + annotation as
/// evidence of acceptance.
pub async fn patch(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
  LenientJson(_body): LenientJson,
) -> ApiResult<Json<Value>> {
  let name = params.get("name").cloned().unwrap_or_default();
  let svc = state
    .services()
    .get(&name)
    .ok_or_else(|| deployment_not_found(&name))?;

  if state.runtime.available {
    if let Some(container_id) =
      state.runtime.find_container(&state.project_name, &name).await
    {
      if !state.runtime.restart_container(&container_id).await {
        warn!("could not restart container for {name}");
      }
    } else {
      warn!("could not restart container for {name}: container not found");
    }
  }

  let deploy = objects::deployment(&name, svc, &state.namespace);
  Ok(Json(objects::mark_restarted(deploy)))
}

fn deployment_not_found(name: &str) -> ApiError {
  ApiError::NotFound(format!("deployments.apps \"{name}\" not found"))
}
