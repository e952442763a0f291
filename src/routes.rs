use std::{collections::HashMap, sync::Arc};

use axum::{
  Json, Router,
  body::Body,
  http::{Method, Request, StatusCode, Uri},
  middleware::{self, Next},
  response::{IntoResponse, Response},
  routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{error::status_document, handlers, state::AppState};

pub fn app(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/version", get(handlers::discovery::version))
    .route("/api", get(handlers::discovery::api))
    .route("/api/v1", get(handlers::discovery::api_v1))
    .route("/apis", get(handlers::discovery::apis))
    .route("/apis/apps/v1", get(handlers::discovery::apps_v1))
    .route(
      "/apis/coordination.k8s.io/v1",
      get(handlers::discovery::coordination_v1),
    )
    .route("/api/v1/namespaces", get(handlers::namespaces::list))
    .route("/api/v1/namespaces/{ns}", get(handlers::namespaces::get))
    .route("/api/v1/namespaces/{ns}/pods", get(handlers::pods::list))
    .route(
      "/api/v1/namespaces/{ns}/pods/{name}",
      get(handlers::pods::get),
    )
    .route(
      "/api/v1/namespaces/{ns}/pods/{name}/log",
      get(handlers::pods::logs),
    )
    .route(
      "/api/v1/namespaces/{ns}/services",
      get(handlers::services::list),
    )
    .route(
      "/api/v1/namespaces/{ns}/services/{name}",
      get(handlers::services::get),
    )
    .route(
      "/api/v1/namespaces/{ns}/endpoints",
      get(handlers::endpoints::list),
    )
    .route(
      "/api/v1/namespaces/{ns}/configmaps",
      get(handlers::configmaps::list),
    )
    .route(
      "/api/v1/namespaces/{ns}/configmaps/{name}",
      get(handlers::configmaps::get),
    )
    .route(
      "/api/v1/namespaces/{ns}/secrets",
      get(handlers::secrets::list),
    )
    .route(
      "/api/v1/namespaces/{ns}/secrets/{name}",
      get(handlers::secrets::get),
    )
    .route(
      "/apis/apps/v1/namespaces/{ns}/deployments",
      get(handlers::deployments::list),
    )
    .route(
      "/apis/apps/v1/namespaces/{ns}/deployments/{name}",
      get(handlers::deployments::get).patch(handlers::deployments::patch),
    )
    .route(
      "/apis/coordination.k8s.io/v1/namespaces/{ns}/leases",
      get(handlers::leases::list).post(handlers::leases::create),
    )
    .route(
      "/apis/coordination.k8s.io/v1/namespaces/{ns}/leases/{name}",
      get(handlers::leases::get)
        .put(handlers::leases::update)
        .delete(handlers::leases::delete),
    )
    .fallback(unrouted)
    .method_not_allowed_fallback(unrouted)
    .layer(middleware::from_fn(reject_watch))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn unrouted(method: Method, uri: Uri) -> Response {
  let path = uri.path();
  let doc = status_document(
    StatusCode::NOT_IMPLEMENTED.as_u16(),
    "NotImplemented",
    &format!("{method} {path} not implemented"),
  );
  (StatusCode::NOT_IMPLEMENTED, Json(doc)).into_response()
}

/// Watch requests are rejected before routing is attempted, regardless
/// of whether the path would otherwise match.
async fn reject_watch(req: Request<Body>, next: Next) -> Response {
  if query_map(req.uri())
    .get("watch")
    .is_some_and(|v| v.eq_ignore_ascii_case("true"))
  {
    let doc = status_document(
      StatusCode::NOT_IMPLEMENTED.as_u16(),
      "NotImplemented",
      "watch not supported by h2c-api",
    );
    return (StatusCode::NOT_IMPLEMENTED, Json(doc)).into_response();
  }
  next.run(req).await
}

fn query_map(uri: &Uri) -> HashMap<String, String> {
  let mut map = HashMap::new();
  let Some(query) = uri.query() else {
    return map;
  };
  for pair in query.split('&') {
    let mut parts = pair.splitn(2, '=');
    let key = parts.next().unwrap_or("");
    let value = parts.next().unwrap_or("");
    let key = urlencoding::decode(key).unwrap_or_default().into_owned();
    let value = urlencoding::decode(value).unwrap_or_default().into_owned();
    map.insert(key, value);
  }
  map
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_map_parses_watch_flag() {
    let uri: Uri = "/x?watch=true&foo=bar".parse().unwrap();
    let map = query_map(&uri);
    assert_eq!(map.get("watch").map(String::as_str), Some("true"));
    assert_eq!(map.get("foo").map(String::as_str), Some("bar"));
  }

  #[test]
  fn query_map_empty_without_query_string() {
    let uri: Uri = "/x".parse().unwrap();
    assert!(query_map(&uri).is_empty());
  }
}
