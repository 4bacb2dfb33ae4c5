//! Dossiers: read-only summaries of one person's exposure across the
//! justice, judiciary, financial and medical subsystems.
//!
//! A dossier is never stored. It is assembled on request by fanning out to
//! the stores and collaborators concurrently; no snapshot or lock spans the
//! reads, so the sources may be mutually stale by a few milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  case::Case,
  hearing::Hearing,
  person::{Person, PersonId},
  store::{BankLedger, CaseStore, HearingStore, MedicalRegistry, into_core},
};

// ─── Types ───────────────────────────────────────────────────────────────────

/// The outcome of an optional, best-effort enrichment read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Enrichment<T> {
  Present(T),
  /// The source answered, and has nothing for this person.
  Absent,
  /// The source could not be reached.
  Unavailable,
}

impl<T> Enrichment<T> {
  pub fn is_present(&self) -> bool { matches!(self, Self::Present(_)) }

  pub fn as_present(&self) -> Option<&T> {
    match self {
      Self::Present(v) => Some(v),
      Self::Absent | Self::Unavailable => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
  pub person_id:          PersonId,
  pub name:               String,
  pub rights:             Vec<String>,
  pub registration_place: String,
}

impl From<&Person> for PersonSummary {
  fn from(p: &Person) -> Self {
    Self {
      person_id:          p.person_id,
      name:               p.name.clone(),
      rights:             p.rights.clone(),
      registration_place: p.registration_place.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankSummary {
  pub account_id: i64,
  /// Minor currency units.
  pub balance:    i64,
}

/// The composite view returned by `build_dossier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dossier {
  pub person:                PersonSummary,
  pub health_status:         Enrichment<String>,
  pub case_count:            usize,
  /// Cases naming this person as the registered suspect.
  pub cases_as_suspect:      Vec<Case>,
  pub hearing_count:         usize,
  /// Hearings naming this person as the registered plaintiff.
  pub hearings_as_plaintiff: Vec<Hearing>,
  pub bank:                  Enrichment<BankSummary>,
  pub assembled_at:          DateTime<Utc>,
}

// ─── Assembly ────────────────────────────────────────────────────────────────

/// Fan out to every source for `person` and assemble the dossier.
///
/// Case and hearing reads are the dossier's substance; their failures
/// propagate. Bank and medical reads only enrich it; their failures are
/// logged and reported as [`Enrichment::Unavailable`].
pub async fn assemble<S, B, M>(
  person: &Person,
  store: &S,
  bank: &B,
  medical: &M,
) -> Result<Dossier>
where
  S: CaseStore + HearingStore,
  B: BankLedger,
  M: MedicalRegistry,
{
  let id = person.person_id;

  let (cases, hearings, account, record) = tokio::join!(
    store.list_cases_by_suspect(id),
    store.list_hearings_by_plaintiff(id),
    bank.account_for_person(id),
    medical.record_for_person(id),
  );

  let cases_as_suspect = cases.map_err(into_core)?;
  let hearings_as_plaintiff = hearings.map_err(into_core)?;

  let bank = match account {
    Ok(Some(account)) => Enrichment::Present(BankSummary {
      account_id: account.account_id,
      balance:    account.balance,
    }),
    Ok(None) => Enrichment::Absent,
    Err(e) => {
      tracing::warn!(person_id = id, error = %e, "bank ledger unavailable");
      Enrichment::Unavailable
    }
  };

  // Fall back to the status mirrored on the person when no record can be
  // read.
  let mirrored = (!person.health_status.is_empty())
    .then(|| Enrichment::Present(person.health_status.clone()));
  let health_status = match record {
    Ok(Some(record)) => Enrichment::Present(record.health_status),
    Ok(None) => mirrored.unwrap_or(Enrichment::Absent),
    Err(e) => {
      tracing::warn!(person_id = id, error = %e, "medical registry unavailable");
      mirrored.unwrap_or(Enrichment::Unavailable)
    }
  };

  Ok(Dossier {
    person: PersonSummary::from(person),
    health_status,
    case_count: cases_as_suspect.len(),
    cases_as_suspect,
    hearing_count: hearings_as_plaintiff.len(),
    hearings_as_plaintiff,
    bank,
    assembled_at: Utc::now(),
  })
}
