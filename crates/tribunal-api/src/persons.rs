//! Handlers for `/persons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons/:id` | Directory entry |
//! | `GET`  | `/persons/:id/dossier` | Guarded; see [`tribunal_core::access::RolePolicy`] |

use axum::{
  Json,
  extract::{Path, State},
};
use tribunal_core::{
  dossier::Dossier,
  person::{Person, PersonId},
  service::Justice,
  store::{BankLedger, CaseStore, HearingStore, MedicalRegistry, PersonDirectory},
};

use crate::{caller::Authenticated, error::ApiError};

/// `GET /persons/:id`
pub async fn get_one<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.get_person(id).await?))
}

/// `GET /persons/:id/dossier`
pub async fn dossier<S, B, M>(
  State(justice): State<Justice<S, B, M>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<PersonId>,
) -> Result<Json<Dossier>, ApiError>
where
  S: CaseStore + HearingStore + PersonDirectory + 'static,
  B: BankLedger + 'static,
  M: MedicalRegistry + 'static,
{
  Ok(Json(justice.build_dossier(&caller, id).await?))
}
