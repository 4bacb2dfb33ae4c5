//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tribunal_core::ErrorKind;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No authenticated [`tribunal_core::access::Caller`] was attached to the
  /// request.
  #[error("authentication required")]
  Unauthenticated,

  #[error(transparent)]
  Core(#[from] tribunal_core::Error),
}

fn status_for(kind: ErrorKind) -> StatusCode {
  match kind {
    ErrorKind::Validation => StatusCode::BAD_REQUEST,
    ErrorKind::NotFound => StatusCode::NOT_FOUND,
    ErrorKind::InvalidState => StatusCode::CONFLICT,
    ErrorKind::Authorization => StatusCode::FORBIDDEN,
    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthenticated => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": self.to_string(), "kind": "authentication" })),
      )
        .into_response(),
      ApiError::Core(e) => {
        let kind = e.kind();
        if kind == ErrorKind::Internal {
          tracing::error!(error = %e, "request failed");
        }
        (
          status_for(kind),
          Json(json!({ "error": e.to_string(), "kind": kind })),
        )
          .into_response()
      }
    }
  }
}
