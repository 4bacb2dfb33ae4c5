//! [`SqliteStore`]: the SQLite implementation of [`CaseStore`] and
//! [`HearingStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use tribunal_core::{
  case::{Case, CaseDetails, CaseStatus, CaseTransition, NewCase, Step},
  hearing::{AppealDraft, Hearing, HearingRevision, NewHearing},
  person::PersonId,
  store::{CaseStore, HearingStore},
};

use crate::{
  Result,
  encode::{
    CASE_COLUMNS, HEARING_COLUMNS, RawCase, RawHearing, RawRevision, encode_dt,
    encode_party, encode_status, encode_uuid, now,
  },
  schema::SCHEMA,
};

type CoreError = tribunal_core::Error;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tribunal store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Synchronous helpers (run on the connection thread) ──────────────────────

/// Run `f` inside an immediate transaction. The write lock is taken up
/// front, so the read-check-write sequence in `f` cannot interleave with
/// another writer. Dropping the transaction on error rolls it back.
pub(crate) fn immediate<T>(
  conn: &mut Connection,
  f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let out = f(&tx)?;
  tx.commit()?;
  Ok(out)
}

fn select_case(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawCase>> {
  conn
    .query_row(
      &format!("SELECT {CASE_COLUMNS} FROM cases WHERE case_id = ?1"),
      rusqlite::params![id],
      RawCase::from_row,
    )
    .optional()
}

fn load_case(conn: &Connection, case_id: Uuid) -> Result<Case> {
  select_case(conn, &encode_uuid(case_id))?
    .ok_or(CoreError::CaseNotFound(case_id))?
    .into_case()
}

fn select_hearing(
  conn: &Connection,
  id: &str,
) -> rusqlite::Result<Option<RawHearing>> {
  conn
    .query_row(
      &format!("SELECT {HEARING_COLUMNS} FROM hearings WHERE hearing_id = ?1"),
      rusqlite::params![id],
      RawHearing::from_row,
    )
    .optional()
}

/// Check `transition` against the stored status and write the new one.
fn apply_transition(
  conn: &Connection,
  case_id: Uuid,
  transition: CaseTransition,
  at: DateTime<Utc>,
) -> Result<Case> {
  let case = load_case(conn, case_id)?;

  let next = match transition.check(case_id, case.status)? {
    Step::Unchanged => return Ok(case),
    Step::Advance(next) => next,
  };

  let changed = conn.execute(
    "UPDATE cases SET status = ?1, updated_at = ?2
     WHERE case_id = ?3 AND status = ?4",
    rusqlite::params![
      encode_status(next),
      encode_dt(at),
      encode_uuid(case_id),
      encode_status(case.status),
    ],
  )?;
  if changed == 0 {
    return Err(
      CoreError::InvalidState {
        case_id,
        status: case.status,
        action: transition.action(),
      }
      .into(),
    );
  }

  Ok(Case { status: next, updated_at: at, ..case })
}

fn replace_details(
  conn: &Connection,
  case_id: Uuid,
  details: CaseDetails,
  at: DateTime<Utc>,
) -> Result<Case> {
  let case = load_case(conn, case_id)?;
  if !case.status.is_editable() {
    return Err(
      CoreError::InvalidState { case_id, status: case.status, action: "edit" }
        .into(),
    );
  }

  let (c_kind, c_person, c_name) = encode_party(&details.complainant);
  let (s_kind, s_person, s_name) = encode_party(&details.suspect);

  conn.execute(
    "UPDATE cases SET
       complainant_kind = ?1, complainant_person_id = ?2, complainant_name = ?3,
       suspect_kind = ?4, suspect_person_id = ?5, suspect_name = ?6,
       statement = ?7, article = ?8, evidence_url = ?9, updated_at = ?10
     WHERE case_id = ?11",
    rusqlite::params![
      c_kind,
      c_person,
      c_name,
      s_kind,
      s_person,
      s_name,
      details.statement,
      details.article,
      details.evidence_url,
      encode_dt(at),
      encode_uuid(case_id),
    ],
  )?;

  Ok(Case {
    complainant: details.complainant,
    suspect: details.suspect,
    statement: details.statement,
    article: details.article,
    evidence_url: details.evidence_url,
    updated_at: at,
    ..case
  })
}

fn open_hearing(conn: &Connection, hearing: &Hearing) -> Result<()> {
  let case = load_case(conn, hearing.case_id)?;
  if case.status != CaseStatus::SentToCourt {
    return Err(
      CoreError::InvalidState {
        case_id: case.case_id,
        status:  case.status,
        action:  "open a hearing on",
      }
      .into(),
    );
  }

  let (p_kind, p_person, p_name) = encode_party(&hearing.plaintiff);
  conn.execute(
    "INSERT INTO hearings (
       hearing_id, case_id, plaintiff_kind, plaintiff_person_id, plaintiff_name,
       protocol, verdict, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    rusqlite::params![
      encode_uuid(hearing.hearing_id),
      encode_uuid(hearing.case_id),
      p_kind,
      p_person,
      p_name,
      hearing.protocol,
      hearing.verdict,
      encode_dt(hearing.created_at),
      encode_dt(hearing.updated_at),
    ],
  )?;

  apply_transition(
    conn,
    hearing.case_id,
    CaseTransition::PronounceVerdict,
    hearing.created_at,
  )?;
  Ok(())
}

fn record_appeal(
  conn: &Connection,
  hearing_id: Uuid,
  appeal: AppealDraft,
  at: DateTime<Utc>,
) -> Result<Hearing> {
  let id_str = encode_uuid(hearing_id);
  let hearing = select_hearing(conn, &id_str)?
    .ok_or(CoreError::HearingNotFound(hearing_id))?
    .into_hearing()?;

  conn.execute(
    "INSERT INTO hearing_revisions (
       revision_id, hearing_id, protocol, verdict, superseded_at
     ) VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      encode_uuid(Uuid::new_v4()),
      id_str,
      hearing.protocol,
      hearing.verdict,
      encode_dt(at),
    ],
  )?;

  conn.execute(
    "UPDATE hearings SET protocol = ?1, verdict = ?2, updated_at = ?3
     WHERE hearing_id = ?4",
    rusqlite::params![appeal.protocol, appeal.verdict, encode_dt(at), id_str],
  )?;

  apply_transition(conn, hearing.case_id, CaseTransition::PronounceVerdict, at)?;

  Ok(Hearing {
    protocol: appeal.protocol,
    verdict: appeal.verdict,
    updated_at: at,
    ..hearing
  })
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_case(&self, input: NewCase) -> Result<Case> {
    let at = now();
    let details = input.details;
    let case = Case {
      case_id:         Uuid::new_v4(),
      complainant:     details.complainant,
      investigator_id: input.investigator_id,
      suspect:         details.suspect,
      statement:       details.statement,
      article:         details.article,
      evidence_url:    details.evidence_url,
      status:          CaseStatus::Open,
      created_at:      at,
      updated_at:      at,
    };

    let id_str          = encode_uuid(case.case_id);
    let (c_kind, c_person, c_name) = encode_party(&case.complainant);
    let (s_kind, s_person, s_name) = encode_party(&case.suspect);
    let investigator_id = case.investigator_id;
    let statement       = case.statement.clone();
    let article         = case.article.clone();
    let evidence_url    = case.evidence_url.clone();
    let status_str      = encode_status(case.status);
    let at_str          = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cases (
             case_id,
             complainant_kind, complainant_person_id, complainant_name,
             investigator_id,
             suspect_kind, suspect_person_id, suspect_name,
             statement, article, evidence_url, status, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
          rusqlite::params![
            id_str,
            c_kind,
            c_person,
            c_name,
            investigator_id,
            s_kind,
            s_person,
            s_name,
            statement,
            article,
            evidence_url,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(case)
  }

  async fn get_case(&self, id: Uuid) -> Result<Option<Case>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCase> = self
      .conn
      .call(move |conn| Ok(select_case(conn, &id_str)?))
      .await?;

    raw.map(RawCase::into_case).transpose()
  }

  async fn update_case(&self, id: Uuid, details: CaseDetails) -> Result<Case> {
    let at = now();
    self
      .conn
      .call(move |conn| {
        Ok(immediate(conn, |tx| replace_details(tx, id, details, at)))
      })
      .await?
  }

  async fn transition_case(
    &self,
    id: Uuid,
    transition: CaseTransition,
  ) -> Result<Case> {
    let at = now();
    self
      .conn
      .call(move |conn| {
        Ok(immediate(conn, |tx| apply_transition(tx, id, transition, at)))
      })
      .await?
  }

  async fn list_cases_by_suspect(&self, person_id: PersonId) -> Result<Vec<Case>> {
    let raws: Vec<RawCase> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CASE_COLUMNS} FROM cases
           WHERE suspect_person_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawCase::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCase::into_case).collect()
  }
}

// ─── HearingStore impl ───────────────────────────────────────────────────────

impl HearingStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_hearing(&self, input: NewHearing) -> Result<Hearing> {
    let at = now();
    let hearing = Hearing {
      hearing_id: Uuid::new_v4(),
      case_id:    input.case_id,
      plaintiff:  input.plaintiff,
      protocol:   input.protocol,
      verdict:    input.verdict,
      created_at: at,
      updated_at: at,
    };

    let row = hearing.clone();
    self
      .conn
      .call(move |conn| Ok(immediate(conn, |tx| open_hearing(tx, &row))))
      .await??;

    Ok(hearing)
  }

  async fn appeal_hearing(&self, id: Uuid, appeal: AppealDraft) -> Result<Hearing> {
    let at = now();
    self
      .conn
      .call(move |conn| {
        Ok(immediate(conn, |tx| record_appeal(tx, id, appeal, at)))
      })
      .await?
  }

  async fn get_hearing(&self, id: Uuid) -> Result<Option<Hearing>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawHearing> = self
      .conn
      .call(move |conn| Ok(select_hearing(conn, &id_str)?))
      .await?;

    raw.map(RawHearing::into_hearing).transpose()
  }

  async fn list_hearings_by_case(&self, case_id: Uuid) -> Result<Vec<Hearing>> {
    let id_str = encode_uuid(case_id);

    let raws: Vec<RawHearing> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HEARING_COLUMNS} FROM hearings
           WHERE case_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawHearing::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHearing::into_hearing).collect()
  }

  async fn list_hearings_by_plaintiff(
    &self,
    person_id: PersonId,
  ) -> Result<Vec<Hearing>> {
    let raws: Vec<RawHearing> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HEARING_COLUMNS} FROM hearings
           WHERE plaintiff_person_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawHearing::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHearing::into_hearing).collect()
  }

  async fn list_revisions(&self, hearing_id: Uuid) -> Result<Vec<HearingRevision>> {
    let id_str = encode_uuid(hearing_id);

    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT revision_id, hearing_id, protocol, verdict, superseded_at
           FROM hearing_revisions
           WHERE hearing_id = ?1
           ORDER BY superseded_at, rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawRevision {
              revision_id:   row.get(0)?,
              hearing_id:    row.get(1)?,
              protocol:      row.get(2)?,
              verdict:       row.get(3)?,
              superseded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }
}
