//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Well-formed input that fails a domain rule: a bad blend, a failed import
  /// check or a value that does not decode.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<cuvee_core::Error> for ApiError {
  fn from(e: cuvee_core::Error) -> Self {
    use cuvee_core::Error as E;
    match e {
      E::UnknownField(_) | E::MalformedTerm(_) | E::InvalidSlot(_) => {
        ApiError::BadRequest(e.to_string())
      }
      E::GrapeCompositionExceeds100 { .. }
      | E::InvalidGrapeVariety { .. }
      | E::InvalidDraft(_)
      | E::NotSettable(_)
      | E::InvalidValue { .. }
      | E::InvalidImport(_) => ApiError::Unprocessable(e.to_string()),
      E::StorageRead(_) | E::StorageWrite(_) | E::Store(_) | E::Serialization(_) => {
        ApiError::Store(Box::new(e))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
