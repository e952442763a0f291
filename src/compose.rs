use std::{collections::HashMap, path::Path};

use anyhow::Context;
use serde::Deserialize;

/// A single compose service entry. Only the fields this system projects
/// into Kubernetes resources are typed; everything else in the service
/// mapping (environment, volumes, ...) is accepted and ignored rather
/// than rejected, so a real-world compose file parses cleanly.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSpec {
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub ports: Vec<PortSpec>,
  #[serde(flatten)]
  pub extra: serde_yaml_ng::Mapping,
}

impl ServiceSpec {
  pub fn image_or_unknown(&self) -> &str {
    self.image.as_deref().unwrap_or("unknown")
  }
}

/// One compose port declaration: a bare integer, `"host:container[/proto]"`,
/// `"container[/proto]"`, or a mapping with `target` (preferred) or
/// `published`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortSpec {
  Int(u32),
  Str(String),
  Map { target: Option<u32>, published: Option<PublishedPort> },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PublishedPort {
  Int(u32),
  Str(String),
}

impl PortSpec {
  /// Projects a port declaration to the container-facing port number.
  pub fn container_port(&self) -> u32 {
    match self {
      PortSpec::Int(port) => *port,
      PortSpec::Str(s) => {
        let without_proto = s.split('/').next().unwrap_or(s);
        let last = without_proto
          .rsplit(':')
          .next()
          .unwrap_or(without_proto);
        last.parse().unwrap_or(0)
      }
      PortSpec::Map { target: Some(target), .. } => *target,
      PortSpec::Map { published: Some(PublishedPort::Int(p)), .. } => *p,
      PortSpec::Map { published: Some(PublishedPort::Str(p)), .. } => {
        p.parse().unwrap_or(0)
      }
      PortSpec::Map { .. } => 0,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ComposeFile {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub services: HashMap<String, ServiceSpec>,
}

impl ComposeFile {
  pub fn project_name(&self) -> String {
    self.name.clone().unwrap_or_else(|| "default".to_string())
  }
}

pub fn load(path: &Path) -> anyhow::Result<ComposeFile> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read compose file {path:?}"))?;
  serde_yaml_ng::from_str(&raw)
    .with_context(|| format!("failed to parse compose file {path:?}"))
}

pub fn ports(svc: &ServiceSpec) -> Vec<u32> {
  svc.ports.iter().map(PortSpec::container_port).collect()
}
