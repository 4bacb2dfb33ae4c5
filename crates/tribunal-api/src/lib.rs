//! JSON REST API for Tribunal.
//!
//! Exposes an axum [`Router`] backed by a [`Justice`] service. The API does
//! not authenticate anyone itself: the embedding server attaches the
//! [`Caller`](tribunal_core::access::Caller) of each request as an
//! extension, and mutating handlers reject requests without one.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tribunal_api::api_router(justice.clone()))
//! ```

pub mod caller;
pub mod cases;
pub mod error;
pub mod hearings;
pub mod persons;

use axum::{
  Router,
  routing::{get, post},
};
use tribunal_core::{
  service::Justice,
  store::{BankLedger, CaseStore, HearingStore, MedicalRegistry, PersonDirectory},
};

pub use caller::Authenticated;
pub use error::ApiError;

/// Build a fully-materialised API router for `justice`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, B, M>(justice: Justice<S, B, M>) -> Router<()>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Router::new()
    // Cases
    .route("/cases", get(cases::list::<S, B, M>).post(cases::create::<S, B, M>))
    .route(
      "/cases/{id}",
      get(cases::get_one::<S, B, M>).put(cases::update::<S, B, M>),
    )
    .route("/cases/{id}/send-to-court", post(cases::send_to_court::<S, B, M>))
    .route("/cases/{id}/close", post(cases::close::<S, B, M>))
    .route("/cases/{id}/hearings", get(cases::hearings::<S, B, M>))
    // Hearings
    .route(
      "/hearings",
      get(hearings::list::<S, B, M>).post(hearings::create::<S, B, M>),
    )
    .route("/hearings/{id}", get(hearings::get_one::<S, B, M>))
    .route("/hearings/{id}/appeal", post(hearings::appeal::<S, B, M>))
    .route("/hearings/{id}/revisions", get(hearings::revisions::<S, B, M>))
    // Persons
    .route("/persons/{id}", get(persons::get_one::<S, B, M>))
    .route("/persons/{id}/dossier", get(persons::dossier::<S, B, M>))
    .with_state(justice)
}
