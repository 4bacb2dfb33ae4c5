//! Core types and trait definitions for the Tribunal case-lifecycle service.
//!
//! No HTTP or database code lives here. Storage backends implement the
//! traits in [`store`]; transports drive the [`service::Justice`] façade,
//! which is where access checks, party resolution and dossier aggregation
//! happen.

pub mod access;
pub mod case;
pub mod dossier;
pub mod error;
pub mod hearing;
pub mod party;
pub mod person;
pub mod service;
pub mod store;

pub use error::{Error, ErrorKind, Result};
