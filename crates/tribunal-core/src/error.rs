//! Error types for `tribunal-core`.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{access::Operation, case::CaseStatus, person::PersonId};

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is blank, or a participant spec is contradictory.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("hearing not found: {0}")]
  HearingNotFound(Uuid),

  #[error("cannot {action} case {case_id} while it is {status}")]
  InvalidState {
    case_id: Uuid,
    status:  CaseStatus,
    action:  &'static str,
  },

  #[error("caller is not allowed to {0}")]
  Unauthorized(Operation),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of an [`Error`], used by transports to pick a
/// status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  Validation,
  NotFound,
  InvalidState,
  Authorization,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Validation(_) => ErrorKind::Validation,
      Self::PersonNotFound(_)
      | Self::CaseNotFound(_)
      | Self::HearingNotFound(_) => ErrorKind::NotFound,
      Self::InvalidState { .. } => ErrorKind::InvalidState,
      Self::Unauthorized(_) => ErrorKind::Authorization,
      Self::Store(_) => ErrorKind::Internal,
    }
  }

  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

impl From<std::convert::Infallible> for Error {
  fn from(e: std::convert::Infallible) -> Self { match e {} }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
