//! SQLite backend for Tribunal.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every status change runs inside a
//! single immediate transaction on that thread, which serialises competing
//! transitions of the same case.
//!
//! The same file also hosts a local mirror of the person directory, bank
//! accounts and medical records, so one [`SqliteStore`] can play every
//! collaborator role the core needs.

mod directory;
mod encode;
mod schema;
mod store;

pub mod error;

pub use directory::DirectoryFixture;
pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
