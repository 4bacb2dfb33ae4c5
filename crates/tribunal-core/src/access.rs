//! The access-guard seam: who may do what.
//!
//! A transport authenticates the request and hands [`Caller`] to
//! [`crate::service::Justice`], which asks an [`AccessGuard`] before every
//! mutating operation and before assembling a dossier. The stores never see
//! the caller.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
  Error, Result,
  person::{Person, PersonId},
};

// ─── Roles and operations ────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
  Police,
  Court,
  Administrator,
  /// Unrestricted observer; may see privileged dossiers.
  Joker,
}

/// Every operation the guard is asked about.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  #[strum(to_string = "open cases")]
  CreateCase,
  #[strum(to_string = "edit cases")]
  UpdateCase,
  #[strum(to_string = "send cases to court")]
  SendToCourt,
  #[strum(to_string = "close cases")]
  CloseCase,
  #[strum(to_string = "open hearings")]
  CreateHearing,
  #[strum(to_string = "record appeals")]
  AppealHearing,
  #[strum(to_string = "view this dossier")]
  ViewDossier,
}

// ─── Caller ──────────────────────────────────────────────────────────────────

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  /// The directory entry of the caller, when they are a registered person.
  pub person_id: Option<PersonId>,
  pub roles:     BTreeSet<Role>,
}

impl Caller {
  pub fn new(
    person_id: Option<PersonId>,
    roles: impl IntoIterator<Item = Role>,
  ) -> Self {
    Self { person_id, roles: roles.into_iter().collect() }
  }

  pub fn has_any(&self, roles: &BTreeSet<Role>) -> bool {
    !self.roles.is_disjoint(roles)
  }

  pub fn is(&self, person_id: PersonId) -> bool {
    self.person_id == Some(person_id)
  }
}

// ─── Guard ───────────────────────────────────────────────────────────────────

pub trait AccessGuard: Send + Sync {
  /// Fail with [`Error::Unauthorized`] unless `caller` may perform
  /// `operation`.
  fn authorize(&self, caller: &Caller, operation: Operation) -> Result<()>;

  /// Fail with [`Error::Unauthorized`] unless `caller` may see the dossier
  /// of `subject`.
  fn authorize_dossier(&self, caller: &Caller, subject: &Person) -> Result<()>;
}

/// Role-based policy: each operation is granted to a set of roles.
///
/// Dossiers have two extra rules. Anyone may read their own. The dossier of
/// a person holding a privileged right (`joker`, `administrator`) is only
/// visible to callers holding a privileged role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
  grants:     BTreeMap<Operation, BTreeSet<Role>>,
  privileged: BTreeSet<Role>,
}

impl Default for RolePolicy {
  fn default() -> Self {
    use Operation::*;
    use Role::*;

    let grants = [
      (CreateCase, vec![Police, Administrator]),
      (UpdateCase, vec![Police, Administrator]),
      (SendToCourt, vec![Police, Administrator]),
      (CloseCase, vec![Police, Court, Administrator]),
      (CreateHearing, vec![Court, Administrator]),
      (AppealHearing, vec![Court, Administrator]),
      (ViewDossier, vec![Police, Court, Administrator, Joker]),
    ]
    .into_iter()
    .map(|(op, roles)| (op, roles.into_iter().collect()))
    .collect();

    Self { grants, privileged: [Administrator, Joker].into_iter().collect() }
  }
}

impl RolePolicy {
  /// Replace the roles granted `operation`.
  pub fn grant(
    mut self,
    operation: Operation,
    roles: impl IntoIterator<Item = Role>,
  ) -> Self {
    self.grants.insert(operation, roles.into_iter().collect());
    self
  }

  /// Apply a batch of overrides, e.g. from configuration.
  pub fn with_overrides(
    self,
    overrides: impl IntoIterator<Item = (Operation, Vec<Role>)>,
  ) -> Self {
    overrides
      .into_iter()
      .fold(self, |policy, (op, roles)| policy.grant(op, roles))
  }

  pub fn roles_for(&self, operation: Operation) -> Option<&BTreeSet<Role>> {
    self.grants.get(&operation)
  }

  fn is_privileged(&self, subject: &Person) -> bool {
    self.privileged.iter().any(|role| subject.has_right(role.as_ref()))
  }
}

impl AccessGuard for RolePolicy {
  fn authorize(&self, caller: &Caller, operation: Operation) -> Result<()> {
    match self.grants.get(&operation) {
      Some(roles) if caller.has_any(roles) => Ok(()),
      _ => Err(Error::Unauthorized(operation)),
    }
  }

  fn authorize_dossier(&self, caller: &Caller, subject: &Person) -> Result<()> {
    if caller.is(subject.person_id) {
      return Ok(());
    }
    self.authorize(caller, Operation::ViewDossier)?;
    if self.is_privileged(subject) && !caller.has_any(&self.privileged) {
      return Err(Error::Unauthorized(Operation::ViewDossier));
    }
    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
