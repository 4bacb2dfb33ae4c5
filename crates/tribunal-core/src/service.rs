//! [`Justice`]: the operations this core exposes to transports.
//!
//! Each operation follows the same shape: ask the [`AccessGuard`], validate
//! and resolve the input, then hand a fully-formed record to the store,
//! which applies the state machine atomically.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  access::{AccessGuard, Caller, Operation},
  case::{Case, CaseDetails, CaseDraft, CaseTransition, NewCase},
  dossier::{self, Dossier},
  hearing::{AppealDraft, Hearing, HearingDraft, HearingRevision, NewHearing},
  party::Participant,
  person::{Person, PersonId},
  store::{
    BankLedger, CaseStore, HearingStore, MedicalRegistry, PersonDirectory,
    into_core,
  },
};

/// Trim `value`, failing with a validation error if nothing is left.
fn require_text(field: &str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(format!("{field} must not be blank")));
  }
  Ok(trimmed.to_owned())
}

/// Case and hearing operations over a store `S`, with dossier enrichment
/// from a bank ledger `B` and a medical registry `M`.
///
/// Clones share every component.
pub struct Justice<S, B, M> {
  store:   Arc<S>,
  bank:    Arc<B>,
  medical: Arc<M>,
  guard:   Arc<dyn AccessGuard>,
}

impl<S, B, M> Clone for Justice<S, B, M> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      bank:    Arc::clone(&self.bank),
      medical: Arc::clone(&self.medical),
      guard:   Arc::clone(&self.guard),
    }
  }
}

impl<S, B, M> Justice<S, B, M>
where
  S: CaseStore + HearingStore + PersonDirectory,
  B: BankLedger,
  M: MedicalRegistry,
{
  pub fn new(
    store: Arc<S>,
    bank: Arc<B>,
    medical: Arc<M>,
    guard: Arc<dyn AccessGuard>,
  ) -> Self {
    Self { store, bank, medical, guard }
  }

  // ── Cases ─────────────────────────────────────────────────────────────────

  async fn resolve_case(&self, draft: &CaseDraft) -> Result<CaseDetails> {
    let statement = require_text("statement", &draft.statement)?;
    let article = require_text("article", &draft.article)?;
    let complainant = draft.complainant.claim(Participant::Complainant)?;
    let suspect = draft.suspect.claim(Participant::Suspect)?;
    let evidence_url = draft
      .evidence_url
      .as_deref()
      .map(str::trim)
      .filter(|u| !u.is_empty())
      .map(str::to_owned);

    Ok(CaseDetails {
      complainant: complainant.resolve(&*self.store).await?,
      suspect: suspect.resolve(&*self.store).await?,
      statement,
      article,
      evidence_url,
    })
  }

  /// Open a new case in `OPEN` status, investigated by `investigator_id`.
  pub async fn create_case(
    &self,
    caller: &Caller,
    investigator_id: PersonId,
    draft: CaseDraft,
  ) -> Result<Case> {
    self.guard.authorize(caller, Operation::CreateCase)?;

    let details = self.resolve_case(&draft).await?;
    if !self
      .store
      .person_exists(investigator_id)
      .await
      .map_err(into_core)?
    {
      return Err(Error::PersonNotFound(investigator_id));
    }

    let case = self
      .store
      .insert_case(NewCase { investigator_id, details })
      .await
      .map_err(into_core)?;

    tracing::info!(case_id = %case.case_id, investigator_id, "case opened");
    Ok(case)
  }

  /// Replace the parties, statement, article and evidence of a case that is
  /// not closed.
  pub async fn update_case(
    &self,
    caller: &Caller,
    case_id: Uuid,
    draft: CaseDraft,
  ) -> Result<Case> {
    self.guard.authorize(caller, Operation::UpdateCase)?;

    let details = self.resolve_case(&draft).await?;
    let case = self
      .store
      .update_case(case_id, details)
      .await
      .map_err(into_core)?;

    tracing::info!(%case_id, "case updated");
    Ok(case)
  }

  /// `OPEN` → `SENT_TO_COURT`.
  pub async fn send_to_court(
    &self,
    caller: &Caller,
    case_id: Uuid,
  ) -> Result<Case> {
    self.guard.authorize(caller, Operation::SendToCourt)?;
    self.transition(case_id, CaseTransition::SendToCourt).await
  }

  /// Any non-terminal status → `CLOSED`. Irreversible.
  pub async fn close_case(&self, caller: &Caller, case_id: Uuid) -> Result<Case> {
    self.guard.authorize(caller, Operation::CloseCase)?;
    self.transition(case_id, CaseTransition::Close).await
  }

  async fn transition(
    &self,
    case_id: Uuid,
    transition: CaseTransition,
  ) -> Result<Case> {
    let case = self
      .store
      .transition_case(case_id, transition)
      .await
      .map_err(into_core)?;

    tracing::info!(%case_id, status = %case.status, "case status changed");
    Ok(case)
  }

  pub async fn get_case(&self, case_id: Uuid) -> Result<Case> {
    self
      .store
      .get_case(case_id)
      .await
      .map_err(into_core)?
      .ok_or(Error::CaseNotFound(case_id))
  }

  pub async fn list_cases_by_suspect(
    &self,
    person_id: PersonId,
  ) -> Result<Vec<Case>> {
    self
      .store
      .list_cases_by_suspect(person_id)
      .await
      .map_err(into_core)
  }

  // ── Hearings ──────────────────────────────────────────────────────────────

  /// Open a hearing against a case in `SENT_TO_COURT`; the case moves to
  /// `VERDICT_PRONOUNCED` in the same write.
  pub async fn create_hearing(
    &self,
    caller: &Caller,
    draft: HearingDraft,
  ) -> Result<Hearing> {
    self.guard.authorize(caller, Operation::CreateHearing)?;

    let protocol = require_text("protocol", &draft.protocol)?;
    let verdict = require_text("verdict", &draft.verdict)?;
    let plaintiff = draft
      .plaintiff
      .claim(Participant::Plaintiff)?
      .resolve(&*self.store)
      .await?;

    let hearing = self
      .store
      .insert_hearing(NewHearing {
        case_id: draft.case_id,
        plaintiff,
        protocol,
        verdict,
      })
      .await
      .map_err(into_core)?;

    tracing::info!(
      hearing_id = %hearing.hearing_id,
      case_id = %hearing.case_id,
      "hearing opened, verdict pronounced"
    );
    Ok(hearing)
  }

  /// Revise the protocol and verdict of a hearing. The owning case stays
  /// `VERDICT_PRONOUNCED`.
  pub async fn appeal_hearing(
    &self,
    caller: &Caller,
    hearing_id: Uuid,
    draft: AppealDraft,
  ) -> Result<Hearing> {
    self.guard.authorize(caller, Operation::AppealHearing)?;

    let appeal = AppealDraft {
      protocol: require_text("protocol", &draft.protocol)?,
      verdict:  require_text("verdict", &draft.verdict)?,
    };
    let hearing = self
      .store
      .appeal_hearing(hearing_id, appeal)
      .await
      .map_err(into_core)?;

    tracing::info!(%hearing_id, case_id = %hearing.case_id, "appeal recorded");
    Ok(hearing)
  }

  pub async fn get_hearing(&self, hearing_id: Uuid) -> Result<Hearing> {
    self
      .store
      .get_hearing(hearing_id)
      .await
      .map_err(into_core)?
      .ok_or(Error::HearingNotFound(hearing_id))
  }

  /// Hearings of an existing case, oldest first.
  pub async fn list_hearings_by_case(&self, case_id: Uuid) -> Result<Vec<Hearing>> {
    self.get_case(case_id).await?;
    self
      .store
      .list_hearings_by_case(case_id)
      .await
      .map_err(into_core)
  }

  pub async fn list_hearings_by_plaintiff(
    &self,
    person_id: PersonId,
  ) -> Result<Vec<Hearing>> {
    self
      .store
      .list_hearings_by_plaintiff(person_id)
      .await
      .map_err(into_core)
  }

  /// Appeal history of an existing hearing, oldest first.
  pub async fn list_hearing_revisions(
    &self,
    hearing_id: Uuid,
  ) -> Result<Vec<HearingRevision>> {
    self.get_hearing(hearing_id).await?;
    self
      .store
      .list_revisions(hearing_id)
      .await
      .map_err(into_core)
  }

  // ── Persons and dossiers ──────────────────────────────────────────────────

  pub async fn get_person(&self, person_id: PersonId) -> Result<Person> {
    self
      .store
      .find_person(person_id)
      .await
      .map_err(into_core)?
      .ok_or(Error::PersonNotFound(person_id))
  }

  /// Assemble the dossier of `person_id`, if `caller` may see it.
  pub async fn build_dossier(
    &self,
    caller: &Caller,
    person_id: PersonId,
  ) -> Result<Dossier> {
    let person = self.get_person(person_id).await?;
    self.guard.authorize_dossier(caller, &person)?;

    tracing::debug!(person_id, "assembling dossier");
    dossier::assemble(&person, &*self.store, &*self.bank, &*self.medical).await
  }
}
