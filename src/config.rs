use std::{path::PathBuf, sync::OnceLock};

use clap::Parser;
use serde::Deserialize;

fn default_compose() -> PathBuf {
  PathBuf::from("/data/compose.yml")
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("/data")
}

fn default_port() -> u16 {
  6443
}

fn default_runtime_socket() -> PathBuf {
  PathBuf::from("/var/run/docker.sock")
}

fn default_sa_dir() -> PathBuf {
  PathBuf::from("/var/run/secrets/kubernetes.io/serviceaccount")
}

/// One field per `H2C_*` environment variable.
#[derive(Debug, Deserialize)]
pub struct Env {
  #[serde(default = "default_compose")]
  pub h2c_compose: PathBuf,
  #[serde(default = "default_data_dir")]
  pub h2c_data_dir: PathBuf,
  #[serde(default = "default_port")]
  pub h2c_port: u16,
  #[serde(default = "default_runtime_socket")]
  pub h2c_runtime_socket: PathBuf,
  #[serde(default = "default_sa_dir")]
  pub h2c_sa_dir: PathBuf,
}

impl Default for Env {
  fn default() -> Self {
    Env {
      h2c_compose: default_compose(),
      h2c_data_dir: default_data_dir(),
      h2c_port: default_port(),
      h2c_runtime_socket: default_runtime_socket(),
      h2c_sa_dir: default_sa_dir(),
    }
  }
}

#[derive(Debug, Parser)]
#[command(
  name = "h2c-api",
  version,
  about = "Fake Kubernetes API server fronting a compose stack"
)]
pub struct CliArgs {
  /// Override H2C_COMPOSE
  #[arg(long)]
  pub compose: Option<PathBuf>,
  /// Override H2C_DATA_DIR
  #[arg(long)]
  pub data_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Config {
  pub compose_path: PathBuf,
  pub data_dir: PathBuf,
  pub port: u16,
  pub runtime_socket: PathBuf,
  pub sa_dir: PathBuf,
}

impl Config {
  pub fn cert_file(&self) -> PathBuf {
    self.sa_dir.join("tls.crt")
  }

  pub fn key_file(&self) -> PathBuf {
    self.sa_dir.join("tls.key")
  }
}

pub fn cli_args() -> &'static CliArgs {
  static ARGS: OnceLock<CliArgs> = OnceLock::new();
  ARGS.get_or_init(CliArgs::parse)
}

pub fn config() -> &'static Config {
  static CONFIG: OnceLock<Config> = OnceLock::new();
  CONFIG.get_or_init(|| {
    let env: Env = envy::from_env().unwrap_or_else(|e| {
      warn!("failed to parse environment, using defaults | {e:#}");
      Env::default()
    });
    let args = cli_args();
    Config {
      compose_path: args.compose.clone().unwrap_or(env.h2c_compose),
      data_dir: args.data_dir.clone().unwrap_or(env.h2c_data_dir),
      port: env.h2c_port,
      runtime_socket: env.h2c_runtime_socket,
      sa_dir: env.h2c_sa_dir,
    }
  })
}
