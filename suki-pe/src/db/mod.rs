//! Engine-specific database operations
//!
//! Scoped fetches of the read-only inputs (rules, transactions) and the
//! idempotent write paths (results, diagnostics, run audit rows).

pub mod diagnostics;
pub mod results;
pub mod rules;
pub mod runs;
pub mod transactions;
