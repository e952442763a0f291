//! End-to-end checks against the router, driven in-process via
//! `tower::ServiceExt::oneshot` rather than a bound socket.

use std::{collections::HashMap, sync::Arc};

use h2c_api::{runtime::RuntimeClient, state::AppState};
use http_body_util::BodyExt;
use hyper::{Request, StatusCode, body::Bytes};
use serde_json::{Value, json};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::NormalizePathLayer;

const COMPOSE: &str = r#"
name: demo
services:
  web:
    image: nginx:latest
    ports:
      - "8080:80"
  worker:
    image: demo/worker:latest
"#;

fn test_state() -> Arc<AppState> {
  let compose = serde_yaml_ng::from_str(COMPOSE).unwrap();
  let mut configmaps = HashMap::new();
  configmaps.insert(
    "app-config".to_string(),
    HashMap::from([("LOG_LEVEL".to_string(), "debug".to_string())]),
  );
  let mut secrets = HashMap::new();
  secrets.insert(
    "db-creds".to_string(),
    HashMap::from([("password".to_string(), "hunter2".to_string())]),
  );

  Arc::new(AppState {
    compose,
    project_name: "demo".to_string(),
    namespace: "demo".to_string(),
    configmaps,
    secrets,
    leases: Default::default(),
    runtime: RuntimeClient::new("/nonexistent/docker.sock".into()),
  })
}

async fn send(
  state: Arc<AppState>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let body = body.map(|v| v.to_string()).unwrap_or_default();
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(axum::body::Body::from(body))
    .unwrap();
  let response = h2c_api::routes::app(state).oneshot(request).await.unwrap();
  let status = response.status();
  let bytes: Bytes = response.into_body().collect().await.unwrap().to_bytes();
  let value = if bytes.is_empty() {
    json!(null)
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

#[tokio::test]
async fn discovery_reports_apiserver_identity() {
  let (status, body) = send(test_state(), "GET", "/version", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["major"], "1");
}

#[tokio::test]
async fn pod_list_projects_compose_services() {
  let (status, body) =
    send(test_state(), "GET", "/api/v1/namespaces/demo/pods", None).await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<&str> = body["items"]
    .as_array()
    .unwrap()
    .iter()
    .map(|p| p["metadata"]["name"].as_str().unwrap())
    .collect();
  assert!(names.contains(&"web"));
  assert!(names.contains(&"worker"));
}

#[tokio::test]
async fn pod_get_unknown_name_is_not_found_with_plural_resource() {
  let (status, body) = send(
    test_state(),
    "GET",
    "/api/v1/namespaces/demo/pods/missing",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["kind"], "Status");
  assert_eq!(body["reason"], "NotFound");
  assert_eq!(body["message"], "pods \"missing\" not found");
}

#[tokio::test]
async fn secret_values_are_base64_encoded() {
  let (status, body) = send(
    test_state(),
    "GET",
    "/api/v1/namespaces/demo/secrets/db-creds",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["password"], "aHVudGVyMg==");
}

#[tokio::test]
async fn configmap_values_stay_raw() {
  let (status, body) = send(
    test_state(),
    "GET",
    "/api/v1/namespaces/demo/configmaps/app-config",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["LOG_LEVEL"], "debug");
}

#[tokio::test]
async fn lease_lifecycle_create_conflict_then_delete() {
  let state = test_state();
  let body = json!({ "metadata": { "name": "leader" }, "spec": { "holderIdentity": "a" } });

  let (status, _) = send(
    state.clone(),
    "POST",
    "/apis/coordination.k8s.io/v1/namespaces/demo/leases",
    Some(body.clone()),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, create_conflict) = send(
    state.clone(),
    "POST",
    "/apis/coordination.k8s.io/v1/namespaces/demo/leases",
    Some(body),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(create_conflict["reason"], "Conflict");

  let (status, _) = send(
    state.clone(),
    "DELETE",
    "/apis/coordination.k8s.io/v1/namespaces/demo/leases/leader",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, delete_again) = send(
    state,
    "DELETE",
    "/apis/coordination.k8s.io/v1/namespaces/demo/leases/leader",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(delete_again["reason"], "NotFound");
}

#[tokio::test]
async fn watch_requests_are_refused_regardless_of_path() {
  let (status, body) = send(
    test_state(),
    "GET",
    "/api/v1/namespaces/demo/pods?watch=true",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
  assert_eq!(body["reason"], "NotImplemented");
}

#[tokio::test]
async fn unrouted_path_gets_501_status_document() {
  let (status, body) = send(test_state(), "GET", "/nope", None).await;
  assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
  assert_eq!(body["kind"], "Status");
}

#[tokio::test]
async fn unsupported_method_on_known_path_gets_501_not_405() {
  let (status, body) = send(
    test_state(),
    "POST",
    "/api/v1/namespaces/demo/pods/web",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
  assert_eq!(body["kind"], "Status");
  assert_eq!(body["reason"], "NotImplemented");
}

#[tokio::test]
async fn trailing_slash_is_stripped_before_matching() {
  let svc =
    NormalizePathLayer::trim_trailing_slash().layer(h2c_api::routes::app(test_state()));
  let request = Request::builder()
    .method("GET")
    .uri("/version/")
    .body(axum::body::Body::empty())
    .unwrap();
  let response = svc.oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_path_is_preserved_as_root() {
  let svc =
    NormalizePathLayer::trim_trailing_slash().layer(h2c_api::routes::app(test_state()));
  let request = Request::builder()
    .method("GET")
    .uri("/")
    .body(axum::body::Body::empty())
    .unwrap();
  let response = svc.oneshot(request).await.unwrap();
  assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn pod_logs_without_runtime_socket_is_not_implemented() {
  let (status, body) = send(
    test_state(),
    "GET",
    "/api/v1/namespaces/demo/pods/web/log",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
  assert_eq!(body["reason"], "NotImplemented");
}
