//! HTTP Basic authentication against the configured accounts.
//!
//! A successful check resolves the account's [`Caller`] and attaches it to
//! the request as an extension, where `tribunal-api` picks it up.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde_json::json;
use thiserror::Error;
use tribunal_core::access::Caller;

use crate::AccountConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
  #[error("missing or malformed credentials")]
  Malformed,
  #[error("invalid username or password")]
  Rejected,
}

impl IntoResponse for AuthError {
  fn into_response(self) -> Response {
    let mut res = (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "error": self.to_string(), "kind": "authentication" })),
    )
      .into_response();
    res.headers_mut().insert(
      header::WWW_AUTHENTICATE,
      HeaderValue::from_static("Basic realm=\"tribunal\""),
    );
    res
  }
}

/// Check the `Authorization` header against `accounts` and return the
/// caller of the matching account.
pub fn verify_auth(
  headers: &HeaderMap,
  accounts: &[AccountConfig],
) -> Result<Caller, AuthError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(AuthError::Malformed)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(AuthError::Malformed)?;

  let decoded = B64.decode(encoded).map_err(|_| AuthError::Malformed)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| AuthError::Malformed)?;

  let (username, password) = creds.split_once(':').ok_or(AuthError::Malformed)?;

  let account = accounts
    .iter()
    .find(|a| a.username == username)
    .ok_or(AuthError::Rejected)?;

  let parsed_hash =
    PasswordHash::new(&account.password_hash).map_err(|_| AuthError::Rejected)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| AuthError::Rejected)?;

  Ok(account.caller())
}

/// Middleware: authenticate the request or answer 401.
pub async fn authenticate(
  State(accounts): State<Arc<[AccountConfig]>>,
  mut req: Request,
  next: Next,
) -> Result<Response, AuthError> {
  let caller = match verify_auth(req.headers(), &accounts) {
    Ok(caller) => caller,
    Err(e) => {
      tracing::debug!(error = %e, uri = %req.uri(), "authentication failed");
      return Err(e);
    }
  };
  req.extensions_mut().insert(caller);
  Ok(next.run(req).await)
}
