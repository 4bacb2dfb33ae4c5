//! HTTP server for Tribunal.
//!
//! Wires a [`SqliteStore`] into a [`Justice`] service, puts the JSON API
//! behind HTTP Basic authentication, and adds request tracing.

pub mod auth;

use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tribunal_core::{
  access::{Caller, Operation, Role, RolePolicy},
  person::PersonId,
  service::Justice,
};
use tribunal_store_sqlite::SqliteStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TRIBUNAL_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub accounts:   Vec<AccountConfig>,
  /// Per-operation role grants replacing the defaults of [`RolePolicy`].
  #[serde(default)]
  pub access:     BTreeMap<Operation, Vec<Role>>,
}

impl ServerConfig {
  pub fn policy(&self) -> RolePolicy {
    RolePolicy::default().with_overrides(self.access.clone())
  }
}

/// A login allowed to use the API.
#[derive(Deserialize, Clone, Debug)]
pub struct AccountConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  /// The directory entry behind this login, if any. Lets the account read
  /// its own dossier.
  #[serde(default)]
  pub person_id:     Option<PersonId>,
  #[serde(default)]
  pub roles:         Vec<Role>,
}

impl AccountConfig {
  pub fn caller(&self) -> Caller {
    Caller::new(self.person_id, self.roles.iter().copied())
  }
}

// ─── Application ──────────────────────────────────────────────────────────────

pub type SqliteJustice = Justice<SqliteStore, SqliteStore, SqliteStore>;

/// A [`Justice`] service where one store plays every collaborator role.
pub fn justice(store: SqliteStore, policy: RolePolicy) -> SqliteJustice {
  Justice::new(
    Arc::new(store.clone()),
    Arc::new(store.clone()),
    Arc::new(store),
    Arc::new(policy),
  )
}

/// Build the full router: the API under `/api`, authenticated against
/// `accounts`, with request tracing.
pub fn router(justice: SqliteJustice, accounts: Arc<[AccountConfig]>) -> Router {
  let api = tribunal_api::api_router(justice)
    .layer(middleware::from_fn_with_state(accounts, auth::authenticate));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
