use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, State},
};
use serde_json::Value;

use crate::{
  error::{ApiResult, not_found_plural},
  objects, state::AppState,
};

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Value> {
  let items = state
    .services()
    .iter()
    .map(|(name, svc)| objects::service(name, svc, &state.namespace))
    .collect();
  Json(objects::list("Service", "v1", items))
}

pub async fn get(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
  let name = params.get("name").cloned().unwrap_or_default();
  match state.services().get(&name) {
    Some(svc) => Ok(Json(objects::service(&name, svc, &state.namespace))),
    None => Err(not_found_plural("services", &name)),
  }
}
