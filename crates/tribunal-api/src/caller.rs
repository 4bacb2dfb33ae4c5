//! The [`Authenticated`] extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use tribunal_core::access::Caller;

use crate::error::ApiError;

/// The [`Caller`] the transport attached to this request as an extension.
/// Rejects with 401 when there is none.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

impl<St> FromRequestParts<St> for Authenticated
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Caller>()
      .cloned()
      .map(Authenticated)
      .ok_or(ApiError::Unauthenticated)
  }
}
