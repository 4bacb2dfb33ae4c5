//! Participants in a proceeding: complainants, suspects and plaintiffs.
//!
//! A participant is captured either as a reference to a registered person or
//! as free text. A hearing plaintiff may additionally be the City itself.
//! When a person is referenced, their name is copied at write time; later
//! renames in the directory do not rewrite historical records.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
  Error, Result,
  person::PersonId,
  store::{PersonDirectory, into_core},
};

/// Display name recorded for the City sentinel.
pub const CITY_NAME: &str = "City";

// ─── Resolved party ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Party {
  /// A registered person; `name` is a snapshot taken when the record was
  /// written.
  Person { person_id: PersonId, name: String },
  FreeText { name: String },
  /// The City as plaintiff. Only valid on hearings.
  City,
}

impl Party {
  pub fn person_id(&self) -> Option<PersonId> {
    match self {
      Self::Person { person_id, .. } => Some(*person_id),
      Self::FreeText { .. } | Self::City => None,
    }
  }

  pub fn display_name(&self) -> &str {
    match self {
      Self::Person { name, .. } | Self::FreeText { name } => name,
      Self::City => CITY_NAME,
    }
  }
}

// ─── Caller input ────────────────────────────────────────────────────────────

/// A participant as supplied by a caller. Exactly one of the three fields
/// must be set; a blank `name` counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySpec {
  #[serde(default)]
  pub person_id: Option<PersonId>,
  #[serde(default)]
  pub name:      Option<String>,
  #[serde(default)]
  pub city:      bool,
}

impl PartySpec {
  pub fn person(person_id: PersonId) -> Self {
    Self { person_id: Some(person_id), ..Self::default() }
  }

  pub fn named(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Self::default() }
  }

  pub fn city() -> Self { Self { city: true, ..Self::default() } }
}

/// The position a participant occupies; decides whether the City sentinel
/// is acceptable and labels validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Participant {
  Complainant,
  Suspect,
  Plaintiff,
}

impl Participant {
  pub fn allows_city(self) -> bool { matches!(self, Self::Plaintiff) }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// A well-formed participant spec that has not yet been checked against the
/// person directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
  Person(PersonId),
  FreeText(String),
  City,
}

impl PartySpec {
  /// Check the exactly-one rule without touching the directory.
  pub fn claim(&self, role: Participant) -> Result<Claim> {
    let name = self
      .name
      .as_deref()
      .map(str::trim)
      .filter(|n| !n.is_empty());

    match (self.person_id, name, self.city) {
      (Some(id), None, false) => Ok(Claim::Person(id)),
      (None, Some(name), false) => Ok(Claim::FreeText(name.to_owned())),
      (None, None, true) if role.allows_city() => Ok(Claim::City),
      (None, None, true) => {
        Err(Error::validation(format!("{role} cannot be the City")))
      }
      (None, None, false) if role.allows_city() => Err(Error::validation(
        format!("{role}: one of person_id, name or city is required"),
      )),
      (None, None, false) => Err(Error::validation(format!(
        "{role}: one of person_id or name is required"
      ))),
      _ => Err(Error::validation(format!(
        "{role}: person_id, name and city are mutually exclusive"
      ))),
    }
  }
}

impl Claim {
  /// Turn the claim into a [`Party`], snapshotting the person's current name.
  pub async fn resolve<D>(self, directory: &D) -> Result<Party>
  where
    D: PersonDirectory,
  {
    match self {
      Self::Person(person_id) => {
        let person = directory
          .find_person(person_id)
          .await
          .map_err(into_core)?
          .ok_or(Error::PersonNotFound(person_id))?;
        Ok(Party::Person { person_id, name: person.name })
      }
      Self::FreeText(name) => Ok(Party::FreeText { name }),
      Self::City => Ok(Party::City),
    }
  }
}

/// Validate `spec` for `role` and resolve it against `directory`.
pub async fn resolve<D>(
  directory: &D,
  role: Participant,
  spec: &PartySpec,
) -> Result<Party>
where
  D: PersonDirectory,
{
  spec.claim(role)?.resolve(directory).await
}

// ─── Tests ───────────────────────────────────────────────────────────────────
