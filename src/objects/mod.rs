//! Pure, deterministic projections of compose services and file-resource
//! mappings into Kubernetes resource documents.

use std::{
  collections::HashMap,
  hash::{Hash, Hasher},
  time::{SystemTime, UNIX_EPOCH},
};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};

use crate::compose::{self, ServiceSpec};

fn now_unix_seconds() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or_default()
}

fn now_rfc3339() -> String {
  chrono::DateTime::<chrono::Utc>::from(SystemTime::now())
    .format("%Y-%m-%dT%H:%M:%SZ")
    .to_string()
}

pub fn namespace(name: &str) -> Value {
  json!({
    "apiVersion": "v1",
    "kind": "Namespace",
    "metadata": {
      "name": name,
      "labels": { "kubernetes.io/metadata.name": name },
    },
    "status": { "phase": "Active" },
  })
}

pub fn pod(name: &str, svc: &ServiceSpec, namespace: &str) -> Value {
  let ports: Vec<Value> = compose::ports(svc)
    .into_iter()
    .map(|p| json!({ "containerPort": p }))
    .collect();
  json!({
    "apiVersion": "v1",
    "kind": "Pod",
    "metadata": {
      "name": name,
      "namespace": namespace,
      "labels": { "app": name },
    },
    "spec": {
      "containers": [{
        "name": name,
        "image": svc.image_or_unknown(),
        "ports": ports,
      }],
      "nodeName": "h2c-node",
    },
    "status": {
      "phase": "Running",
      // compose DNS contract: the service name resolves to the container
      "podIP": name,
      "hostIP": "127.0.0.1",
      "conditions": [{ "type": "Ready", "status": "True" }],
    },
  })
}

/// Deterministic-per-process hash of `name` into the 10.96.0.0/16 range.
/// Stability is only claimed within one process invocation, not across
/// restarts (see DESIGN.md's Open Question decisions).
fn cluster_ip(name: &str) -> String {
  let mut hasher = std::collections::hash_map::DefaultHasher::new();
  name.hash(&mut hasher);
  let a = (hasher.finish() % 256) as u8;
  let mut hasher2 = std::collections::hash_map::DefaultHasher::new();
  (name, "x").hash(&mut hasher2);
  let b = (hasher2.finish() % 254 + 1) as u8;
  format!("10.96.{a}.{b}")
}

pub fn service(name: &str, svc: &ServiceSpec, namespace: &str) -> Value {
  let ports: Vec<Value> = compose::ports(svc)
    .into_iter()
    .map(|p| json!({ "port": p, "targetPort": p, "protocol": "TCP" }))
    .collect();
  json!({
    "apiVersion": "v1",
    "kind": "Service",
    "metadata": {
      "name": name,
      "namespace": namespace,
      "labels": { "app": name },
    },
    "spec": {
      "type": "ClusterIP",
      "clusterIP": cluster_ip(name),
      "ports": ports,
      "selector": { "app": name },
    },
  })
}

pub fn endpoints(name: &str, svc: &ServiceSpec, namespace: &str) -> Value {
  let ports = compose::ports(svc);
  let subsets = if ports.is_empty() {
    json!([])
  } else {
    json!([{
      "addresses": [{ "ip": name, "hostname": name }],
      "ports": ports.iter().map(|p| json!({ "port": p, "protocol": "TCP" })).collect::<Vec<_>>(),
    }])
  };
  json!({
    "apiVersion": "v1",
    "kind": "Endpoints",
    "metadata": { "name": name, "namespace": namespace },
    "subsets": subsets,
  })
}

pub fn configmap(
  name: &str,
  data: &HashMap<String, String>,
  namespace: &str,
) -> Value {
  json!({
    "apiVersion": "v1",
    "kind": "ConfigMap",
    "metadata": { "name": name, "namespace": namespace },
    "data": data,
  })
}

pub fn secret(
  name: &str,
  data: &HashMap<String, String>,
  namespace: &str,
) -> Value {
  let encoded: HashMap<String, String> = data
    .iter()
    .map(|(k, v)| (k.clone(), BASE64.encode(v.as_bytes())))
    .collect();
  json!({
    "apiVersion": "v1",
    "kind": "Secret",
    "metadata": { "name": name, "namespace": namespace },
    "type": "Opaque",
    "data": encoded,
  })
}

pub fn deployment(name: &str, svc: &ServiceSpec, namespace: &str) -> Value {
  json!({
    "apiVersion": "apps/v1",
    "kind": "Deployment",
    "metadata": {
      "name": name,
      "namespace": namespace,
      "labels": { "app": name },
      "annotations": {},
      "resourceVersion": now_unix_seconds().to_string(),
    },
    "spec": {
      "replicas": 1,
      "selector": { "matchLabels": { "app": name } },
      "template": {
        "metadata": { "labels": { "app": name }, "annotations": {} },
        "spec": {
          "containers": [{
            "name": name,
            "image": svc.image_or_unknown(),
          }],
        },
      },
    },
    "status": { "replicas": 1, "readyReplicas": 1, "availableReplicas": 1 },
  })
}

/// Stamps the restart annotation onto a freshly-built Deployment document.
pub fn mark_restarted(mut deploy: Value) -> Value {
  deploy["metadata"]["annotations"]
    ["kubectl.kubernetes.io/restartedAt"] = json!(now_rfc3339());
  deploy
}

pub fn lease(name: &str, namespace: &str, body: &Value) -> Value {
  let mut doc = json!({
    "apiVersion": "coordination.k8s.io/v1",
    "kind": "Lease",
    "metadata": {
      "name": name,
      "namespace": namespace,
      "resourceVersion": now_unix_seconds().to_string(),
      "creationTimestamp": now_rfc3339(),
    },
    "spec": {},
  });
  if let Some(spec) = body.get("spec") {
    doc["spec"] = spec.clone();
  }
  if let Some(metadata) = body.get("metadata").and_then(Value::as_object) {
    for key in ["labels", "annotations"] {
      if let Some(value) = metadata.get(key) {
        doc["metadata"][key] = value.clone();
      }
    }
  }
  doc
}

pub fn list(kind: &str, api_version: &str, items: Vec<Value>) -> Value {
  json!({
    "kind": format!("{kind}List"),
    "apiVersion": api_version,
    "metadata": { "resourceVersion": "1" },
    "items": items,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap as Map;

  fn svc(image: &str, ports: &str) -> ServiceSpec {
    serde_yaml_ng::from_str(&format!("image: {image}\nports: {ports}"))
      .unwrap()
  }

  #[test]
  fn pod_projects_name_image_ports() {
    let svc = svc("nginx", "[\"8080:80/tcp\"]");
    let p = pod("web", &svc, "demo");
    assert_eq!(p["metadata"]["name"], "web");
    assert_eq!(p["spec"]["containers"][0]["image"], "nginx");
    assert_eq!(p["spec"]["containers"][0]["ports"][0]["containerPort"], 80);
    assert_eq!(p["status"]["podIP"], "web");
    assert_eq!(p["status"]["phase"], "Running");
  }

  #[test]
  fn secret_base64_round_trips() {
    let mut data = Map::new();
    data.insert("password".to_string(), "hunter2".to_string());
    let s = secret("creds", &data, "demo");
    assert_eq!(s["data"]["password"], "aHVudGVyMg==");
  }

  #[test]
  fn configmap_data_is_raw() {
    let mut data = Map::new();
    data.insert("k".to_string(), "v".to_string());
    let c = configmap("cm", &data, "demo");
    assert_eq!(c["data"]["k"], "v");
  }

  #[test]
  fn endpoints_empty_subsets_when_no_ports() {
    let svc = svc("nginx", "[]");
    let ep = endpoints("web", &svc, "demo");
    assert_eq!(ep["subsets"], json!([]));
  }

  #[test]
  fn lease_copies_spec_and_metadata() {
    let body = json!({
      "metadata": { "name": "l1", "labels": { "a": "b" } },
      "spec": { "holderIdentity": "x" },
    });
    let l = lease("l1", "demo", &body);
    assert_eq!(l["spec"]["holderIdentity"], "x");
    assert_eq!(l["metadata"]["labels"]["a"], "b");
  }

  #[test]
  fn cluster_ip_is_stable_within_process() {
    assert_eq!(cluster_ip("web"), cluster_ip("web"));
  }

  #[test]
  fn list_envelope_shape() {
    let l = list("Pod", "v1", vec![json!({"a": 1})]);
    assert_eq!(l["kind"], "PodList");
    assert_eq!(l["items"].as_array().unwrap().len(), 1);
  }
}
