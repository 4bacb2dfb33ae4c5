//! Cases (police investigation records) and the status state machine that
//! carries them from complaint to closure.
//!
//! ```text
//! OPEN ──send_to_court──▶ SENT_TO_COURT ──pronounce_verdict──▶ VERDICT_PRONOUNCED
//!   │                          │                                   │    ▲   │
//!   │                          │                                   │    └───┘ (appeal)
//!   └──────────close───────────┴───────────────close───────────────┴──▶ CLOSED
//! ```
//!
//! Status never moves backwards. `CLOSED` is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{
  Error, Result,
  party::{Party, PartySpec},
  person::PersonId,
};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
  Open,
  SentToCourt,
  VerdictPronounced,
  Closed,
}

impl CaseStatus {
  pub fn is_terminal(self) -> bool { matches!(self, Self::Closed) }

  /// Whether the case's statement, parties and evidence may still be edited.
  pub fn is_editable(self) -> bool { !self.is_terminal() }
}

/// A status change requested of the case store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTransition {
  SendToCourt,
  /// Only ever triggered by opening or appealing a hearing.
  PronounceVerdict,
  Close,
}

/// Outcome of applying a [`CaseTransition`] to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Advance(CaseStatus),
  /// The case is already where the transition would put it.
  Unchanged,
}

impl CaseTransition {
  /// Verb phrase used in error messages.
  pub fn action(self) -> &'static str {
    match self {
      Self::SendToCourt => "send to court",
      Self::PronounceVerdict => "pronounce a verdict on",
      Self::Close => "close",
    }
  }

  /// Apply the transition to `current`, or explain why it is not allowed.
  pub fn check(self, case_id: Uuid, current: CaseStatus) -> Result<Step> {
    use CaseStatus::*;

    let step = match (self, current) {
      (Self::SendToCourt, Open) => Some(Step::Advance(SentToCourt)),
      (Self::PronounceVerdict, SentToCourt) => {
        Some(Step::Advance(VerdictPronounced))
      }
      (Self::PronounceVerdict, VerdictPronounced) => Some(Step::Unchanged),
      (Self::Close, Open | SentToCourt | VerdictPronounced) => {
        Some(Step::Advance(Closed))
      }
      _ => None,
    };

    step.ok_or_else(|| Error::InvalidState {
      case_id,
      status: current,
      action: self.action(),
    })
  }
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// A police investigation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
  pub case_id:         Uuid,
  pub complainant:     Party,
  /// Always a registered person.
  pub investigator_id: PersonId,
  pub suspect:         Party,
  pub statement:       String,
  /// Citation of the violated article.
  pub article:         String,
  /// Photo composite or other evidence reference.
  pub evidence_url:    Option<String>,
  pub status:          CaseStatus,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Caller-supplied case contents, before participants are resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDraft {
  pub complainant:  PartySpec,
  pub suspect:      PartySpec,
  pub statement:    String,
  pub article:      String,
  #[serde(default)]
  pub evidence_url: Option<String>,
}

/// Validated case contents with participants resolved; what the store
/// writes on create and update.
#[derive(Debug, Clone)]
pub struct CaseDetails {
  pub complainant:  Party,
  pub suspect:      Party,
  pub statement:    String,
  pub article:      String,
  pub evidence_url: Option<String>,
}

/// Input to [`crate::store::CaseStore::insert_case`]. The store assigns the
/// identifier, the timestamps and the initial `OPEN` status.
#[derive(Debug, Clone)]
pub struct NewCase {
  pub investigator_id: PersonId,
  pub details:         CaseDetails,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
