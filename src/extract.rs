use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
};
use serde_json::{Value, json};

/// A JSON body extractor that never fails: a malformed or absent body
/// becomes an empty object, leaving it to each write handler to decide
/// whether a required field is missing.
pub struct LenientJson(pub Value);

impl<S: Send + Sync> FromRequest<S> for LenientJson {
  type Rejection = std::convert::Infallible;

  async fn from_request(
    req: Request,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let bytes = Bytes::from_request(req, state)
      .await
      .unwrap_or_default();
    let value = serde_json::from_slice(&bytes).unwrap_or(json!({}));
    Ok(LenientJson(value))
  }
}
