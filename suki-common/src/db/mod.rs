//! Database access layer
//!
//! Schema creation and shared row models. Query helpers that are specific to
//! the inference engine live in the `suki-pe` crate.

pub mod init;
pub mod models;

pub use init::{create_tables, init_database, init_default_settings};
