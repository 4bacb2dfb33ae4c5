//! Storage and collaborator traits.
//!
//! [`CaseStore`] and [`HearingStore`] are implemented by storage backends
//! (e.g. `tribunal-store-sqlite`) and own the state machine: every status
//! change is a check-and-write that the backend performs atomically.
//! [`PersonDirectory`], [`BankLedger`] and [`MedicalRegistry`] describe the
//! external systems this core only reads from.
//!
//! None of these traits perform authorization; that is the job of
//! [`crate::access::AccessGuard`], consulted by [`crate::service::Justice`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::{Case, CaseDetails, CaseTransition, NewCase},
  hearing::{AppealDraft, Hearing, HearingRevision, NewHearing},
  person::{BankAccount, MedicalRecord, Person, PersonId},
};

/// Convert a backend error into the core error. Backends map their own
/// domain failures back to the matching core variant and wrap everything
/// else as [`crate::Error::Store`].
pub(crate) fn into_core<E: Into<crate::Error>>(e: E) -> crate::Error {
  e.into()
}

// ─── External collaborators ──────────────────────────────────────────────────

/// Read access to the person directory.
pub trait PersonDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  fn find_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn person_exists(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// Read access to bank accounts. Failures only degrade a dossier, so the
/// error type needs no conversion into the core error.
pub trait BankLedger: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The account linked to `id`, if any.
  fn account_for_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<BankAccount>, Self::Error>> + Send + '_;
}

/// Read access to medical records.
pub trait MedicalRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The medical record linked to `id`, if any.
  fn record_for_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<MedicalRecord>, Self::Error>>
  + Send
  + '_;
}

// ─── Cases ───────────────────────────────────────────────────────────────────

pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Persist a new case in `OPEN` status. Identifier and timestamps are set
  /// by the store.
  fn insert_case(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Retrieve a case by UUID. Returns `None` if not found.
  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  /// Replace the editable contents of a case.
  ///
  /// Fails with `CaseNotFound`, or `InvalidState` if the case is closed.
  fn update_case(
    &self,
    id: Uuid,
    details: CaseDetails,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Apply a status transition as one atomic check-and-write.
  ///
  /// An idempotent transition that finds the case already in its target
  /// status returns the case untouched.
  fn transition_case(
    &self,
    id: Uuid,
    transition: CaseTransition,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// All cases whose suspect is the registered person `person_id`, oldest
  /// first.
  fn list_cases_by_suspect(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;
}

// ─── Hearings ────────────────────────────────────────────────────────────────

pub trait HearingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Persist a hearing and pronounce the verdict on its case, atomically.
  ///
  /// Fails with `CaseNotFound`, or `InvalidState` unless the case is
  /// `SENT_TO_COURT`; in both cases nothing is written.
  fn insert_hearing(
    &self,
    input: NewHearing,
  ) -> impl Future<Output = Result<Hearing, Self::Error>> + Send + '_;

  /// Overwrite protocol and verdict, keep the old pair as a
  /// [`HearingRevision`], and re-pronounce the verdict on the owning case.
  ///
  /// Fails with `HearingNotFound`, or `InvalidState` if the owning case can
  /// no longer carry a verdict (it was closed).
  fn appeal_hearing(
    &self,
    id: Uuid,
    appeal: AppealDraft,
  ) -> impl Future<Output = Result<Hearing, Self::Error>> + Send + '_;

  fn get_hearing(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Hearing>, Self::Error>> + Send + '_;

  /// Hearings of a case, oldest first; the last one is the current one.
  fn list_hearings_by_case(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Hearing>, Self::Error>> + Send + '_;

  /// Hearings whose plaintiff is the registered person `person_id`.
  fn list_hearings_by_plaintiff(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Hearing>, Self::Error>> + Send + '_;

  /// Appeal history of a hearing, oldest first.
  fn list_revisions(
    &self,
    hearing_id: Uuid,
  ) -> impl Future<Output = Result<Vec<HearingRevision>, Self::Error>>
  + Send
  + '_;
}
