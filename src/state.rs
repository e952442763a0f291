use std::{
  collections::HashMap,
  path::{Path, PathBuf},
};

use anyhow::Context;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{compose::ComposeFile, runtime::RuntimeClient};

pub type FileResources = HashMap<String, HashMap<String, String>>;

pub struct AppState {
  pub compose: ComposeFile,
  pub project_name: String,
  pub namespace: String,
  pub configmaps: FileResources,
  pub secrets: FileResources,
  pub leases: RwLock<HashMap<String, Value>>,
  pub runtime: RuntimeClient,
}

impl AppState {
  pub fn load(
    compose_path: &Path,
    data_dir: &Path,
    runtime_socket: &Path,
  ) -> anyhow::Result<AppState> {
    let compose = crate::compose::load(compose_path)
      .context("fatal: could not load compose file")?;
    let project_name = compose.project_name();
    let namespace = project_name.clone();
    let configmaps = load_file_resources(data_dir, "configmaps");
    let secrets = load_file_resources(data_dir, "secrets");
    let runtime = RuntimeClient::new(runtime_socket.to_path_buf());

    Ok(AppState {
      compose,
      project_name,
      namespace,
      configmaps,
      secrets,
      leases: RwLock::new(HashMap::new()),
      runtime,
    })
  }

  pub fn services(&self) -> &HashMap<String, crate::compose::ServiceSpec> {
    &self.compose.services
  }
}

/// Scans `<base_dir>/<kind>/<name>/<key>` into `{name: {key: value}}`.
/// Missing `<kind>/` directory yields an empty table, not an error.
/// Unreadable individual files are skipped with a warning.
fn load_file_resources(base_dir: &Path, kind: &str) -> FileResources {
  let mut resources = FileResources::new();
  let resource_dir = base_dir.join(kind);
  let Ok(mut entries) = std::fs::read_dir(&resource_dir) else {
    return resources;
  };
  let mut name_dirs: Vec<PathBuf> = Vec::new();
  while let Some(Ok(entry)) = entries.next() {
    let path = entry.path();
    if path.is_dir() {
      name_dirs.push(path);
    }
  }
  name_dirs.sort();

  for name_dir in name_dirs {
    let name = match name_dir.file_name().and_then(|n| n.to_str()) {
      Some(name) => name.to_string(),
      None => continue,
    };
    let mut data = HashMap::new();
    let Ok(mut key_files) = std::fs::read_dir(&name_dir) else {
      continue;
    };
    let mut keys: Vec<PathBuf> = Vec::new();
    while let Some(Ok(entry)) = key_files.next() {
      let path = entry.path();
      if path.is_file() {
        keys.push(path);
      }
    }
    keys.sort();
    for key_path in keys {
      let key = match key_path.file_name().and_then(|n| n.to_str()) {
        Some(key) => key.to_string(),
        None => continue,
      };
      match std::fs::read_to_string(&key_path) {
        Ok(contents) => {
          data.insert(key, contents);
        }
        Err(e) => {
          warn!("skipping unreadable file {key_path:?} | {e:#}");
        }
      }
    }
    if !data.is_empty() {
      resources.insert(name, data);
    }
  }
  resources
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn loads_sorted_file_resources() {
    let dir = tempfile::tempdir().unwrap();
    let secrets = dir.path().join("secrets/creds");
    fs::create_dir_all(&secrets).unwrap();
    fs::write(secrets.join("password"), "hunter2").unwrap();

    let resources = load_file_resources(dir.path(), "secrets");
    assert_eq!(resources["creds"]["password"], "hunter2");
  }

  #[test]
  fn missing_directory_yields_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let resources = load_file_resources(dir.path(), "configmaps");
    assert!(resources.is_empty());
  }

  #[test]
  fn empty_subdirectory_is_elided() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("configmaps/empty")).unwrap();
    let resources = load_file_resources(dir.path(), "configmaps");
    assert!(resources.is_empty());
  }
}
