//! Core FieldLedger library (backend client, sessions, derivations, config).

pub mod api;
pub mod auth;
pub mod config;
pub mod derive;
pub mod money;
pub mod session;
