//! SQL schema for the Tribunal SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Local mirror of the external person directory. Read-only to the core.
CREATE TABLE IF NOT EXISTS persons (
    person_id          INTEGER PRIMARY KEY,
    name               TEXT NOT NULL,
    rights             TEXT NOT NULL DEFAULT '[]',   -- JSON array of tags
    health_status      TEXT NOT NULL DEFAULT '',
    balance            INTEGER NOT NULL DEFAULT 0,
    registration_place TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS bank_accounts (
    account_id INTEGER PRIMARY KEY,
    person_id  INTEGER,
    balance    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS medical_records (
    record_id     INTEGER PRIMARY KEY,
    person_id     INTEGER,
    health_status TEXT NOT NULL
);

-- Party columns: when *_kind = 'person' the person id is set and *_name is
-- a snapshot of the person's name at write time; otherwise the id is NULL
-- and *_name is authoritative.
CREATE TABLE IF NOT EXISTS cases (
    case_id               TEXT PRIMARY KEY,
    complainant_kind      TEXT NOT NULL CHECK (complainant_kind IN ('person', 'free_text')),
    complainant_person_id INTEGER,
    complainant_name      TEXT NOT NULL,
    investigator_id       INTEGER NOT NULL,
    suspect_kind          TEXT NOT NULL CHECK (suspect_kind IN ('person', 'free_text')),
    suspect_person_id     INTEGER,
    suspect_name          TEXT NOT NULL,
    statement             TEXT NOT NULL,
    article               TEXT NOT NULL,
    evidence_url          TEXT,
    status                TEXT NOT NULL DEFAULT 'OPEN'
                          CHECK (status IN ('OPEN', 'SENT_TO_COURT', 'VERDICT_PRONOUNCED', 'CLOSED')),
    created_at            TEXT NOT NULL,
    updated_at            TEXT NOT NULL,
    CHECK ((complainant_kind = 'person') = (complainant_person_id IS NOT NULL)),
    CHECK ((suspect_kind = 'person') = (suspect_person_id IS NOT NULL))
);

CREATE TABLE IF NOT EXISTS hearings (
    hearing_id          TEXT PRIMARY KEY,
    case_id             TEXT NOT NULL REFERENCES cases(case_id),
    plaintiff_kind      TEXT NOT NULL CHECK (plaintiff_kind IN ('person', 'free_text', 'city')),
    plaintiff_person_id INTEGER,
    plaintiff_name      TEXT NOT NULL,
    protocol            TEXT NOT NULL,
    verdict             TEXT NOT NULL,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    CHECK ((plaintiff_kind = 'person') = (plaintiff_person_id IS NOT NULL))
);

-- Protocol/verdict pairs replaced by appeals. Append-only.
CREATE TABLE IF NOT EXISTS hearing_revisions (
    revision_id   TEXT PRIMARY KEY,
    hearing_id    TEXT NOT NULL REFERENCES hearings(hearing_id),
    protocol      TEXT NOT NULL,
    verdict       TEXT NOT NULL,
    superseded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS bank_accounts_person_idx   ON bank_accounts(person_id);
CREATE INDEX IF NOT EXISTS medical_records_person_idx ON medical_records(person_id);
CREATE INDEX IF NOT EXISTS cases_suspect_idx          ON cases(suspect_person_id);
CREATE INDEX IF NOT EXISTS hearings_case_idx          ON hearings(case_id);
CREATE INDEX IF NOT EXISTS hearings_plaintiff_idx     ON hearings(plaintiff_person_id);
CREATE INDEX IF NOT EXISTS revisions_hearing_idx      ON hearing_revisions(hearing_id);

PRAGMA user_version = 1;
";
