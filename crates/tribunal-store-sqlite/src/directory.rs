//! The local mirror of the person directory, bank ledger and medical
//! registry. The core only reads these tables; the `upsert_*` methods and
//! [`SqliteStore::seed`] are how operators load them.

use rusqlite::OptionalExtension as _;
use serde::Deserialize;

use tribunal_core::{
  person::{BankAccount, MedicalRecord, Person, PersonId},
  store::{BankLedger, MedicalRegistry, PersonDirectory},
};

use crate::{
  Result,
  encode::{
    RawPerson, bank_account_from_row, encode_rights, medical_record_from_row,
  },
  store::{SqliteStore, immediate},
};

/// A batch of directory records, as loaded by `tribunal-server --seed`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryFixture {
  #[serde(default)]
  pub persons:         Vec<Person>,
  #[serde(default)]
  pub bank_accounts:   Vec<BankAccount>,
  #[serde(default)]
  pub medical_records: Vec<MedicalRecord>,
}

fn write_person(conn: &rusqlite::Connection, person: &Person) -> Result<()> {
  conn.execute(
    "INSERT INTO persons (
       person_id, name, rights, health_status, balance, registration_place
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT(person_id) DO UPDATE SET
       name = excluded.name,
       rights = excluded.rights,
       health_status = excluded.health_status,
       balance = excluded.balance,
       registration_place = excluded.registration_place",
    rusqlite::params![
      person.person_id,
      person.name,
      encode_rights(&person.rights)?,
      person.health_status,
      person.balance,
      person.registration_place,
    ],
  )?;
  Ok(())
}

fn write_bank_account(
  conn: &rusqlite::Connection,
  account: &BankAccount,
) -> Result<()> {
  conn.execute(
    "INSERT INTO bank_accounts (account_id, person_id, balance)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(account_id) DO UPDATE SET
       person_id = excluded.person_id,
       balance = excluded.balance",
    rusqlite::params![account.account_id, account.person_id, account.balance],
  )?;
  Ok(())
}

fn write_medical_record(
  conn: &rusqlite::Connection,
  record: &MedicalRecord,
) -> Result<()> {
  conn.execute(
    "INSERT INTO medical_records (record_id, person_id, health_status)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(record_id) DO UPDATE SET
       person_id = excluded.person_id,
       health_status = excluded.health_status",
    rusqlite::params![record.record_id, record.person_id, record.health_status],
  )?;
  Ok(())
}

impl SqliteStore {
  /// Insert or replace a person. Case and hearing snapshots of the old name
  /// are left untouched.
  pub async fn upsert_person(&self, person: Person) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(write_person(conn, &person)))
      .await?
  }

  pub async fn upsert_bank_account(&self, account: BankAccount) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(write_bank_account(conn, &account)))
      .await?
  }

  pub async fn upsert_medical_record(&self, record: MedicalRecord) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(write_medical_record(conn, &record)))
      .await?
  }

  /// Load every record of `fixture` in one transaction.
  pub async fn seed(&self, fixture: DirectoryFixture) -> Result<()> {
    let counts = (
      fixture.persons.len(),
      fixture.bank_accounts.len(),
      fixture.medical_records.len(),
    );

    self
      .conn
      .call(move |conn| {
        Ok(immediate(conn, |tx| {
          for person in &fixture.persons {
            write_person(tx, person)?;
          }
          for account in &fixture.bank_accounts {
            write_bank_account(tx, account)?;
          }
          for record in &fixture.medical_records {
            write_medical_record(tx, record)?;
          }
          Ok(())
        }))
      })
      .await??;

    tracing::info!(
      persons = counts.0,
      bank_accounts = counts.1,
      medical_records = counts.2,
      "directory seeded"
    );
    Ok(())
  }
}

// ─── Collaborator impls ──────────────────────────────────────────────────────

impl PersonDirectory for SqliteStore {
  type Error = crate::Error;

  async fn find_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT person_id, name, rights, health_status, balance,
                    registration_place
             FROM persons WHERE person_id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawPerson {
                person_id:          row.get(0)?,
                name:               row.get(1)?,
                rights:             row.get(2)?,
                health_status:      row.get(3)?,
                balance:            row.get(4)?,
                registration_place: row.get(5)?,
              })
            },
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn person_exists(&self, id: PersonId) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        let exists: bool = conn.query_row(
          "SELECT EXISTS(SELECT 1 FROM persons WHERE person_id = ?1)",
          rusqlite::params![id],
          |row| row.get(0),
        )?;
        Ok(exists)
      })
      .await?;
    Ok(exists)
  }
}

impl BankLedger for SqliteStore {
  type Error = crate::Error;

  async fn account_for_person(&self, id: PersonId) -> Result<Option<BankAccount>> {
    let account = self
      .conn
      .call(move |conn| {
        let account = conn
          .query_row(
            "SELECT account_id, person_id, balance FROM bank_accounts
             WHERE person_id = ?1
             ORDER BY account_id
             LIMIT 1",
            rusqlite::params![id],
            bank_account_from_row,
          )
          .optional()?;
        Ok(account)
      })
      .await?;
    Ok(account)
  }
}

impl MedicalRegistry for SqliteStore {
  type Error = crate::Error;

  async fn record_for_person(
    &self,
    id: PersonId,
  ) -> Result<Option<MedicalRecord>> {
    let record = self
      .conn
      .call(move |conn| {
        let record = conn
          .query_row(
            "SELECT record_id, person_id, health_status FROM medical_records
             WHERE person_id = ?1
             ORDER BY record_id
             LIMIT 1",
            rusqlite::params![id],
            medical_record_from_row,
          )
          .optional()?;
        Ok(record)
      })
      .await?;
    Ok(record)
  }
}
