//! suki-pe - Persona Inference Engine
//!
//! Infers a behavioral persona/role (e.g. "Student", "Night-Shift Worker",
//! "Reseller") for each retail transaction from whatever signals are
//! available: transcript text, timestamp, product category, basket size, and
//! optional demographics.
//!
//! Pipeline per transaction:
//! transaction context → signal extraction → rule scoring → conflict
//! resolution → idempotent result upsert.
//!
//! Classification logic lives in `persona_rules` records maintained by
//! business users; the engine loads one immutable snapshot per recompute run
//! and evaluates it deterministically, so re-running over unchanged rules and
//! transactions reproduces identical results.

pub mod cli;
pub mod db;
pub mod models;
pub mod recompute;
pub mod resolver;
pub mod rules;
pub mod scoring;
pub mod signals;
pub mod transcript;

pub use models::{BasketBucket, Candidate, Daypart, Inference, Signals, TransactionContext};
pub use recompute::{RecomputeOptions, Scope};
pub use resolver::ConflictResolver;
pub use rules::{PersonaRule, RuleSnapshot};
pub use scoring::ScoringEngine;
pub use signals::SignalExtractor;
