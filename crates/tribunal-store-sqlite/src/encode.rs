//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond
//! precision, so that lexical order is chronological order. UUIDs are stored
//! as hyphenated lowercase strings. Parties are split over three columns
//! (kind, person id, name).

use chrono::{DateTime, SecondsFormat, Utc};
use tribunal_core::{
  case::{Case, CaseStatus},
  hearing::{Hearing, HearingRevision},
  party::{CITY_NAME, Party},
  person::{BankAccount, MedicalRecord, Person, PersonId},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current time truncated to the stored precision, so values written and
/// values returned to the caller compare equal after a round trip.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── CaseStatus ──────────────────────────────────────────────────────────────

pub fn encode_status(s: CaseStatus) -> &'static str {
  match s {
    CaseStatus::Open => "OPEN",
    CaseStatus::SentToCourt => "SENT_TO_COURT",
    CaseStatus::VerdictPronounced => "VERDICT_PRONOUNCED",
    CaseStatus::Closed => "CLOSED",
  }
}

pub fn decode_status(s: &str) -> Result<CaseStatus> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown case status: {s:?}")))
}

// ─── Party ───────────────────────────────────────────────────────────────────

/// Column triple for a party: `(kind, person_id, name)`.
pub fn encode_party(p: &Party) -> (&'static str, Option<PersonId>, String) {
  match p {
    Party::Person { person_id, name } => ("person", Some(*person_id), name.clone()),
    Party::FreeText { name } => ("free_text", None, name.clone()),
    Party::City => ("city", None, CITY_NAME.to_owned()),
  }
}

pub fn decode_party(
  kind: &str,
  person_id: Option<PersonId>,
  name: String,
) -> Result<Party> {
  match (kind, person_id) {
    ("person", Some(person_id)) => Ok(Party::Person { person_id, name }),
    ("free_text", None) => Ok(Party::FreeText { name }),
    ("city", None) => Ok(Party::City),
    (other, id) => Err(Error::Decode(format!(
      "inconsistent party columns: kind {other:?}, person_id {id:?}"
    ))),
  }
}

// ─── Rights ──────────────────────────────────────────────────────────────────

pub fn encode_rights(rights: &[String]) -> Result<String> {
  Ok(serde_json::to_string(rights)?)
}

pub fn decode_rights(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCase::from_row`].
pub const CASE_COLUMNS: &str = "case_id,
  complainant_kind, complainant_person_id, complainant_name,
  investigator_id,
  suspect_kind, suspect_person_id, suspect_name,
  statement, article, evidence_url, status, created_at, updated_at";

/// Raw values read directly from a `cases` row.
pub struct RawCase {
  pub case_id:               String,
  pub complainant_kind:      String,
  pub complainant_person_id: Option<i64>,
  pub complainant_name:      String,
  pub investigator_id:       i64,
  pub suspect_kind:          String,
  pub suspect_person_id:     Option<i64>,
  pub suspect_name:          String,
  pub statement:             String,
  pub article:               String,
  pub evidence_url:          Option<String>,
  pub status:                String,
  pub created_at:            String,
  pub updated_at:            String,
}

impl RawCase {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      case_id:               row.get(0)?,
      complainant_kind:      row.get(1)?,
      complainant_person_id: row.get(2)?,
      complainant_name:      row.get(3)?,
      investigator_id:       row.get(4)?,
      suspect_kind:          row.get(5)?,
      suspect_person_id:     row.get(6)?,
      suspect_name:          row.get(7)?,
      statement:             row.get(8)?,
      article:               row.get(9)?,
      evidence_url:          row.get(10)?,
      status:                row.get(11)?,
      created_at:            row.get(12)?,
      updated_at:            row.get(13)?,
    })
  }

  pub fn into_case(self) -> Result<Case> {
    Ok(Case {
      case_id:         decode_uuid(&self.case_id)?,
      complainant:     decode_party(
        &self.complainant_kind,
        self.complainant_person_id,
        self.complainant_name,
      )?,
      investigator_id: self.investigator_id,
      suspect:         decode_party(
        &self.suspect_kind,
        self.suspect_person_id,
        self.suspect_name,
      )?,
      statement:       self.statement,
      article:         self.article,
      evidence_url:    self.evidence_url,
      status:          decode_status(&self.status)?,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawHearing::from_row`].
pub const HEARING_COLUMNS: &str = "hearing_id, case_id,
  plaintiff_kind, plaintiff_person_id, plaintiff_name,
  protocol, verdict, created_at, updated_at";

/// Raw values read directly from a `hearings` row.
pub struct RawHearing {
  pub hearing_id:          String,
  pub case_id:             String,
  pub plaintiff_kind:      String,
  pub plaintiff_person_id: Option<i64>,
  pub plaintiff_name:      String,
  pub protocol:            String,
  pub verdict:             String,
  pub created_at:          String,
  pub updated_at:          String,
}

impl RawHearing {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      hearing_id:          row.get(0)?,
      case_id:             row.get(1)?,
      plaintiff_kind:      row.get(2)?,
      plaintiff_person_id: row.get(3)?,
      plaintiff_name:      row.get(4)?,
      protocol:            row.get(5)?,
      verdict:             row.get(6)?,
      created_at:          row.get(7)?,
      updated_at:          row.get(8)?,
    })
  }

  pub fn into_hearing(self) -> Result<Hearing> {
    Ok(Hearing {
      hearing_id: decode_uuid(&self.hearing_id)?,
      case_id:    decode_uuid(&self.case_id)?,
      plaintiff:  decode_party(
        &self.plaintiff_kind,
        self.plaintiff_person_id,
        self.plaintiff_name,
      )?,
      protocol:   self.protocol,
      verdict:    self.verdict,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `hearing_revisions` row.
pub struct RawRevision {
  pub revision_id:   String,
  pub hearing_id:    String,
  pub protocol:      String,
  pub verdict:       String,
  pub superseded_at: String,
}

impl RawRevision {
  pub fn into_revision(self) -> Result<HearingRevision> {
    Ok(HearingRevision {
      revision_id:   decode_uuid(&self.revision_id)?,
      hearing_id:    decode_uuid(&self.hearing_id)?,
      protocol:      self.protocol,
      verdict:       self.verdict,
      superseded_at: decode_dt(&self.superseded_at)?,
    })
  }
}

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:          i64,
  pub name:               String,
  pub rights:             String,
  pub health_status:      String,
  pub balance:            i64,
  pub registration_place: String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:          self.person_id,
      name:               self.name,
      rights:             decode_rights(&self.rights)?,
      health_status:      self.health_status,
      balance:            self.balance,
      registration_place: self.registration_place,
    })
  }
}

pub fn bank_account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BankAccount> {
  Ok(BankAccount {
    account_id: row.get(0)?,
    person_id:  row.get(1)?,
    balance:    row.get(2)?,
  })
}

pub fn medical_record_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<MedicalRecord> {
  Ok(MedicalRecord {
    record_id:     row.get(0)?,
    person_id:     row.get(1)?,
    health_status: row.get(2)?,
  })
}
