//! Conflict resolution
//!
//! Selects a single winning candidate (or none) per transaction. An explicit
//! role on the transaction wins unconditionally; otherwise candidates are
//! ordered by a strict lexicographic key so ties resolve identically on
//! every run.

use crate::models::{Candidate, Inference, TransactionContext};

/// Confidence reported for explicit overrides
const EXPLICIT_CONFIDENCE: f64 = 1.0;

/// Confidence assigned when the configurable fallback role applies
const FALLBACK_CONFIDENCE: f64 = 0.30;

/// Conflict resolver
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver {
    /// Role assigned when no candidate survives; `None` leaves the
    /// transaction unresolved (the default contract).
    fallback_role: Option<String>,
}

impl ConflictResolver {
    pub fn new(fallback_role: Option<String>) -> Self {
        Self { fallback_role }
    }

    /// Resolve one transaction's candidates into an inference, or `None` when
    /// the transaction stays unresolved.
    pub fn resolve(&self, tx: &TransactionContext, candidates: Vec<Candidate>) -> Option<Inference> {
        // Explicit override bypasses scoring entirely
        if let Some(role) = tx.explicit_role_opt() {
            return Some(Inference {
                transaction_id: tx.transaction_id.clone(),
                role: role.to_string(),
                confidence: EXPLICIT_CONFIDENCE,
                rule_source: "explicit".to_string(),
            });
        }

        if let Some(winner) = select_winner(candidates) {
            return Some(Inference {
                transaction_id: tx.transaction_id.clone(),
                role: winner.role_name.clone(),
                confidence: winner.confidence,
                rule_source: format!("rule:{}", winner.rule_id),
            });
        }

        self.fallback_role.as_ref().map(|role| Inference {
            transaction_id: tx.transaction_id.clone(),
            role: role.clone(),
            confidence: FALLBACK_CONFIDENCE,
            rule_source: "fallback".to_string(),
        })
    }
}

/// Select the winner by strict lexicographic ordering; the first
/// differentiator wins:
/// 1. exclude_hits ascending (fewer exclusions preferred)
/// 2. priority ascending (stronger rules preferred)
/// 3. include_hits descending (more textual evidence preferred)
/// 4. confidence descending
/// 5. rule_id ascending (final deterministic tie-break)
fn select_winner(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().min_by(|a, b| {
        a.exclude_hits
            .cmp(&b.exclude_hits)
            .then(a.priority.cmp(&b.priority))
            .then(b.include_hits.cmp(&a.include_hits))
            .then(b.confidence.total_cmp(&a.confidence))
            .then(a.rule_id.cmp(&b.rule_id))
    })
}
