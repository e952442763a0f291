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
  let items = [&state.namespace, "default", "kube-system"]
    .into_iter()
    .map(objects::namespace)
    .collect();
  Json(objects::list("Namespace", "v1", items))
}

pub async fn get(
  State(state): State<Arc<AppState>>,
  Path(params): Path<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
  let ns = params.get("ns").cloned().unwrap_or_default();
  if ns == state.namespace || ns == "default" || ns == "kube-system" {
    Ok(Json(objects::namespace(&ns)))
  } else {
    Err(not_found_plural("namespaces", &ns))
  }
}
