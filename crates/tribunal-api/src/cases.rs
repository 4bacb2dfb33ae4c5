//! Handlers for `/cases` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/cases` | `?suspect_id` required |
//! | `POST` | `/cases` | Body: [`CreateBody`]; returns 201 + stored case |
//! | `GET`  | `/cases/:id` | 404 if not found |
//! | `PUT`  | `/cases/:id` | Body: [`CaseDraft`]; 409 once closed |
//! | `POST` | `/cases/:id/send-to-court` | `OPEN` → `SENT_TO_COURT` |
//! | `POST` | `/cases/:id/close` | any → `CLOSED` |
//! | `GET`  | `/cases/:id/hearings` | Oldest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tribunal_core::{
  case::{Case, CaseDraft},
  hearing::Hearing,
  person::PersonId,
  service::Justice,
  store::{BankLedger, CaseStore, HearingStore, MedicalRegistry, PersonDirectory},
};
use uuid::Uuid;

use crate::{caller::Authenticated, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub suspect_id: PersonId,
}

/// `GET /cases?suspect_id=<id>`
pub async fn list<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Case>>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  let cases = justice.list_cases_by_suspect(params.suspect_id).await?;
  Ok(Json(cases))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub investigator_id: PersonId,
  #[serde(flatten)]
  pub case:            CaseDraft,
}

/// `POST /cases`
pub async fn create<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  let case = justice
    .create_case(&caller, body.investigator_id, body.case)
    .await?;
  Ok((StatusCode::CREATED, Json(case)))
}

// ─── Get / update ─────────────────────────────────────────────────────────────

/// `GET /cases/:id`
pub async fn get_one<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.get_case(id).await?))
}

/// `PUT /cases/:id`
pub async fn update<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<Uuid>,
  Json(draft): Json<CaseDraft>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.update_case(&caller, id, draft).await?))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// `POST /cases/:id/send-to-court`
pub async fn send_to_court<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.send_to_court(&caller, id).await?))
}

/// `POST /cases/:id/close`
pub async fn close<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Case>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.close_case(&caller, id).await?))
}

// ─── Hearings of a case ───────────────────────────────────────────────────────

/// `GET /cases/:id/hearings`
pub async fn hearings<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Hearing>>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.list_hearings_by_case(id).await?))
}
