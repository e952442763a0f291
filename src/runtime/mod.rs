//! Minimal Docker-compatible API client over a Unix domain socket.
//! One connection per request, no pooling.

mod demux;

use std::{path::PathBuf, time::Duration};

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, StatusCode, body::Incoming, client::conn::http1};
use serde_json::Value;
use tokio::net::UnixStream;

pub use demux::demux_docker_logs;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

pub struct RuntimeClient {
  socket_path: PathBuf,
  /// Recorded once at construction time.
  pub available: bool,
}

impl RuntimeClient {
  pub fn new(socket_path: PathBuf) -> RuntimeClient {
    let available = socket_path.exists();
    RuntimeClient { socket_path, available }
  }

  /// Issues one request over a fresh Unix-domain connection. Returns
  /// `None` on any transport failure; the failure is logged here so
  /// handlers never see a raw transport error, only an absent result.
  async fn request(
    &self,
    method: Method,
    path: &str,
  ) -> Option<(StatusCode, Bytes)> {
    let connect = async {
      let stream = UnixStream::connect(&self.socket_path).await?;
      let io = hyper_util_io(stream);
      http1::handshake(io).await
    };

    let (mut sender, conn) =
      match tokio::time::timeout(CONNECT_TIMEOUT, connect).await {
        Ok(Ok(pair)) => pair,
        Ok(Err(e)) => {
          warn!("runtime socket connect error | {e:#}");
          return None;
        }
        Err(_) => {
          warn!("runtime socket connect timed out");
          return None;
        }
      };

    tokio::spawn(async move {
      if let Err(e) = conn.await {
        warn!("runtime socket connection error | {e:#}");
      }
    });

    let request = hyper::Request::builder()
      .method(method)
      .uri(path)
      .header("Host", "localhost")
      .body(Empty::<Bytes>::new())
      .ok()?;

    let response = match sender.send_request(request).await {
      Ok(response) => response,
      Err(e) => {
        warn!("runtime socket request error | {e:#}");
        return None;
      }
    };
    let status = response.status();
    let body = match collect_body(response.into_body()).await {
      Ok(body) => body,
      Err(e) => {
        warn!("runtime socket body read error | {e:#}");
        return None;
      }
    };
    Some((status, body))
  }

  /// `GET /containers/json?filters=...` filtered by compose project +
  /// service labels. Returns the first matching container's `Id`.
  pub async fn find_container(
    &self,
    project: &str,
    service: &str,
  ) -> Option<String> {
    let filters = serde_json::json!({
      "label": [
        format!("com.docker.compose.project={project}"),
        format!("com.docker.compose.service={service}"),
      ]
    });
    let encoded = urlencoding::encode(&filters.to_string());
    let path = format!("/containers/json?filters={encoded}");
    let (status, body) = self.request(Method::GET, &path).await?;
    if status != StatusCode::OK {
      return None;
    }
    let containers: Value = serde_json::from_slice(&body).ok()?;
    containers
      .as_array()?
      .first()?
      .get("Id")?
      .as_str()
      .map(str::to_string)
  }

  /// `GET /containers/<id>/logs?...`, demultiplexed.
  pub async fn get_logs(
    &self,
    container_id: &str,
    tail: &str,
  ) -> Option<Vec<u8>> {
    let path = format!(
      "/containers/{container_id}/logs?stdout=1&stderr=1&tail={tail}&timestamps=1"
    );
    let (status, body) = self.request(Method::GET, &path).await?;
    if status != StatusCode::OK {
      return None;
    }
    Some(demux_docker_logs(&body))
  }

  /// `POST /containers/<id>/restart`. True iff the daemon answers 204.
  pub async fn restart_container(&self, container_id: &str) -> bool {
    let path = format!("/containers/{container_id}/restart");
    match self.request(Method::POST, &path).await {
      Some((status, _)) => status == StatusCode::NO_CONTENT,
      None => false,
    }
  }
}

async fn collect_body(body: Incoming) -> anyhow::Result<Bytes> {
  Ok(body.collect().await?.to_bytes())
}

/// Adapts a `tokio::net::UnixStream` to hyper's `Read`/`Write` traits.
fn hyper_util_io(
  stream: UnixStream,
) -> hyper_util::rt::TokioIo<UnixStream> {
  hyper_util::rt::TokioIo::new(stream)
}
