use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};

/// A Kubernetes-style error response. Each variant knows its own HTTP
/// status code and `reason` string, rather than hardcoding one reason
/// for every failure.
#[derive(Debug)]
pub enum ApiError {
  NotFound(String),
  Conflict(String),
  BadRequest(String),
  InternalError(String),
  NotImplemented(String),
}

impl ApiError {
  fn parts(&self) -> (StatusCode, &'static str, &str) {
    match self {
      ApiError::NotFound(msg) => {
        (StatusCode::NOT_FOUND, "NotFound", msg)
      }
      ApiError::Conflict(msg) => {
        (StatusCode::CONFLICT, "Conflict", msg)
      }
      ApiError::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, "BadRequest", msg)
      }
      ApiError::InternalError(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg)
      }
      ApiError::NotImplemented(msg) => {
        (StatusCode::NOT_IMPLEMENTED, "NotImplemented", msg)
      }
    }
  }

  pub fn status_document(&self) -> Value {
    let (code, reason, message) = self.parts();
    status_document(code.as_u16(), reason, message)
  }
}

pub fn status_document(code: u16, reason: &str, message: &str) -> Value {
  json!({
    "kind": "Status",
    "apiVersion": "v1",
    "status": "Failure",
    "message": message,
    "reason": reason,
    "code": code,
  })
}

impl IntoResponse for ApiError {
  fn into_response(self) -> axum::response::Response {
    let (code, _, _) = self.parts();
    (code, Json(self.status_document())).into_response()
  }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn not_found_plural(plural: &str, name: &str) -> ApiError {
  ApiError::NotFound(format!("{plural} \"{name}\" not found"))
}
