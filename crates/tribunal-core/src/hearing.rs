//! Hearings, court records bound to exactly one case, and their appeal
//! history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::party::{Party, PartySpec};

/// A court record capturing the protocol of proceedings and the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hearing {
  pub hearing_id: Uuid,
  /// The owning case; never changes after creation.
  pub case_id:    Uuid,
  pub plaintiff:  Party,
  pub protocol:   String,
  pub verdict:    String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The protocol and verdict a hearing carried before an appeal replaced
/// them. Revisions are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HearingRevision {
  pub revision_id:   Uuid,
  pub hearing_id:    Uuid,
  pub protocol:      String,
  pub verdict:       String,
  /// When the appeal that replaced this revision was recorded.
  pub superseded_at: DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Caller-supplied request to open a hearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingDraft {
  pub case_id:   Uuid,
  pub plaintiff: PartySpec,
  pub protocol:  String,
  pub verdict:   String,
}

/// Caller-supplied revised protocol and verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealDraft {
  pub protocol: String,
  pub verdict:  String,
}

/// Input to [`crate::store::HearingStore::insert_hearing`], with the
/// plaintiff resolved and the texts validated.
#[derive(Debug, Clone)]
pub struct NewHearing {
  pub case_id:   Uuid,
  pub plaintiff: Party,
  pub protocol:  String,
  pub verdict:   String,
}
