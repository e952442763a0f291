#[macro_use]
extern crate tracing;

use std::sync::Arc;

use anyhow::Context;
use h2c_api::{config, routes, state::AppState};
use tower::{Layer, make::Shared};
use tower_http::normalize_path::NormalizePathLayer;

async fn app() -> anyhow::Result<()> {
  let config = config::config();

  info!("h2c-api version: v{}", env!("CARGO_PKG_VERSION"));
  info!("{config:?}");

  let state = AppState::load(
    &config.compose_path,
    &config.data_dir,
    &config.runtime_socket,
  )
  .context("fatal: could not initialize state from compose file")?;

  info!(
    "loaded project '{}': {} services, {} configmaps, {} secrets, runtime {}",
    state.project_name,
    state.services().len(),
    state.configmaps.len(),
    state.secrets.len(),
    if state.runtime.available { "available" } else { "unavailable" },
  );

  let state = Arc::new(state);
  let router = routes::app(state);
  // A `.layer()` inside `routes::app` would run after routing and
  // couldn't affect matching, so trailing-slash stripping is applied
  // out here, wrapping the whole router as a single service.
  let router = NormalizePathLayer::trim_trailing_slash().layer(router);
  let make_service = Shared::new(router);

  let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));

  let cert_file = config.cert_file();
  let key_file = config.key_file();

  if cert_file.is_file() && key_file.is_file() {
    rustls::crypto::aws_lc_rs::default_provider()
      .install_default()
      .ok();
    info!("serving https://{addr}");
    let tls_config =
      axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_file, key_file)
        .await
        .context("invalid tls cert / key")?;
    axum_server::bind_rustls(addr, tls_config)
      .serve(make_service)
      .await
      .context("server crashed")?;
  } else {
    info!("serving http://{addr}");
    axum_server::bind(addr)
      .serve(make_service)
      .await
      .context("server crashed")?;
  }

  Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into()),
    )
    .init();

  // Force CliArgs/Env parsing now so a malformed --compose/--data-dir
  // flag fails fast instead of after the subscriber has gone quiet.
  config::cli_args();

  let mut term_signal =
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

  let serve = tokio::spawn(app());

  tokio::select! {
    res = serve => return res?,
    _ = term_signal.recv() => info!("received SIGTERM, shutting down"),
    _ = tokio::signal::ctrl_c() => info!("received SIGINT, shutting down"),
  }

  Ok(())
}
