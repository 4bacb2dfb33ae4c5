//! Records owned by external systems and only read by this core: the person
//! directory, bank accounts and medical records.

use serde::{Deserialize, Serialize};

/// Identifier of a person in the external person directory.
pub type PersonId = i64;

/// A registered person. Created and edited by administrative flows outside
/// this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:          PersonId,
  pub name:               String,
  /// Role/right tags, e.g. `"police"`, `"court"`, `"joker"`.
  #[serde(default)]
  pub rights:             Vec<String>,
  #[serde(default)]
  pub health_status:      String,
  /// Balance in minor currency units as last mirrored from the ledger.
  #[serde(default)]
  pub balance:            i64,
  #[serde(default)]
  pub registration_place: String,
}

impl Person {
  pub fn has_right(&self, right: &str) -> bool {
    self.rights.iter().any(|r| r.eq_ignore_ascii_case(right))
  }
}

/// A bank account, optionally linked to a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
  pub account_id: i64,
  pub person_id:  Option<PersonId>,
  /// Current balance in minor currency units.
  pub balance:    i64,
}

/// A medical record, optionally linked to a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
  pub record_id:     i64,
  pub person_id:     Option<PersonId>,
  pub health_status: String,
}
