//! Static discovery documents standard cluster clients probe at bootstrap.

use axum::Json;
use serde_json::{Value, json};

pub async fn version() -> Json<Value> {
  Json(json!({
    "major": "1",
    "minor": "28",
    "gitVersion": "v1.28.0-h2c",
    "platform": "linux/amd64",
  }))
}

pub async fn api() -> Json<Value> {
  Json(json!({
    "kind": "APIVersions",
    "versions": ["v1"],
    "serverAddressByClientCIDRs": [
      { "clientCIDR": "0.0.0.0/0", "serverAddress": "h2c-api:6443" },
    ],
  }))
}

pub async fn api_v1() -> Json<Value> {
  Json(json!({
    "kind": "APIResourceList",
    "groupVersion": "v1",
    "resources": [
      { "name": "namespaces", "namespaced": false, "kind": "Namespace", "verbs": ["get", "list"] },
      { "name": "pods", "namespaced": true, "kind": "Pod", "verbs": ["get", "list"] },
      { "name": "pods/log", "namespaced": true, "kind": "Pod", "verbs": ["get"] },
      { "name": "services", "namespaced": true, "kind": "Service", "verbs": ["get", "list"] },
      { "name": "endpoints", "namespaced": true, "kind": "Endpoints", "verbs": ["get", "list"] },
      { "name": "configmaps", "namespaced": true, "kind": "ConfigMap", "verbs": ["get", "list"] },
      { "name": "secrets", "namespaced": true, "kind": "Secret", "verbs": ["get", "list"] },
    ],
  }))
}

pub async fn apis() -> Json<Value> {
  Json(json!({
    "kind": "APIGroupList",
    "groups": [
      {
        "name": "apps",
        "versions": [{ "groupVersion": "apps/v1", "version": "v1" }],
        "preferredVersion": { "groupVersion": "apps/v1", "version": "v1" },
      },
      {
        "name": "coordination.k8s.io",
        "versions": [{ "groupVersion": "coordination.k8s.io/v1", "version": "v1" }],
        "preferredVersion": { "groupVersion": "coordination.k8s.io/v1", "version": "v1" },
      },
    ],
  }))
}

pub async fn apps_v1() -> Json<Value> {
  Json(json!({
    "kind": "APIResourceList",
    "groupVersion": "apps/v1",
    "resources": [
      { "name": "deployments", "namespaced": true, "kind": "Deployment", "verbs": ["get", "list", "patch", "update"] },
    ],
  }))
}

pub async fn coordination_v1() -> Json<Value> {
  Json(json!({
    "kind": "APIResourceList",
    "groupVersion": "coordination.k8s.io/v1",
    "resources": [
      { "name": "leases", "namespaced": true, "kind": "Lease", "verbs": ["create", "delete", "get", "list", "update"] },
    ],
  }))
}
