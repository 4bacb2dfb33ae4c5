//! Handlers for `/hearings` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/hearings` | `?plaintiff_id` required |
//! | `POST` | `/hearings` | Body: [`HearingDraft`]; returns 201; 409 unless the case is `SENT_TO_COURT` |
//! | `GET`  | `/hearings/:id` | 404 if not found |
//! | `POST` | `/hearings/:id/appeal` | Body: `{"protocol":"...","verdict":"..."}` |
//! | `GET`  | `/hearings/:id/revisions` | Superseded protocol/verdict pairs, oldest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tribunal_core::{
  hearing::{AppealDraft, Hearing, HearingDraft, HearingRevision},
  person::PersonId,
  service::Justice,
  store::{BankLedger, CaseStore, HearingStore, MedicalRegistry, PersonDirectory},
};
use uuid::Uuid;

use crate::{caller::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub plaintiff_id: PersonId,
}

/// `GET /hearings?plaintiff_id=<id>`
pub async fn list<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Hearing>>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.list_hearings_by_plaintiff(params.plaintiff_id).await?))
}

/// `POST /hearings`
pub async fn create<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Json(draft): Json<HearingDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  let hearing = justice.create_hearing(&caller, draft).await?;
  Ok((StatusCode::CREATED, Json(hearing)))
}

/// `GET /hearings/:id`
pub async fn get_one<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Hearing>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.get_hearing(id).await?))
}

/// `POST /hearings/:id/appeal`
pub async fn appeal<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<Uuid>,
  Json(draft): Json<AppealDraft>,
) -> Result<Json<Hearing>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.appeal_hearing(&caller, id, draft).await?))
}

/// `GET /hearings/:id/revisions`
pub async fn revisions<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<HearingRevision>>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.list_hearing_revisions(id).await?))
}
