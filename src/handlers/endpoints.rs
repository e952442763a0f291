use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::Value;

use crate::{objects, state::AppState};

pub async fn list(State(state): State<Arc<AppState>>) -> Json<Value> {
  let items = state
    .services()
    .iter()
    .map(|(name, svc)| objects::endpoints(name, svc, &state.namespace))
    .collect();
  Json(objects::list("Endpoints", "v1", items))
}
