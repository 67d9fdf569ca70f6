//! # Suki Common Library
//!
//! Shared code for the Suki persona inference system including:
//! - Database initialization and row models
//! - Error types
//! - Configuration loading (TOML bootstrap + database runtime settings)
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
