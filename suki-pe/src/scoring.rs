//! Scoring engine
//!
//! Evaluates one transaction's signals against the rule snapshot and produces
//! candidate matches with computed confidence. A rule becomes a candidate
//! only when it has at least one include hit AND every gate passes; a rule
//! with zero include hits is excluded entirely, not scored at zero.

use crate::models::{BasketBucket, Candidate, Signals, TransactionContext};
use crate::rules::{standard_gates, Gate, PersonaRule, RuleSnapshot};

/// Confidence base by rule priority: 0.95 for priority 1, 0.85 for
/// priority 2, 0.75 otherwise.
fn base_confidence(priority: u32) -> f64 {
    match priority {
        1 => 0.95,
        2 => 0.85,
        _ => 0.75,
    }
}

/// Flat confidence when any exclude term hits. An override, not a
/// subtraction: priority and include hits no longer matter.
const EXCLUDE_OVERRIDE_CONFIDENCE: f64 = 0.50;

/// Per-hit include bonus beyond the first hit, and its cap
const INCLUDE_BONUS_PER_HIT: f64 = 0.01;
const INCLUDE_BONUS_CAP: f64 = 0.04;

/// Bonus for bulk baskets
const BULK_BONUS: f64 = 0.02;

/// Scoring engine: the text gate plus the pluggable gate set
pub struct ScoringEngine {
    gates: Vec<Box<dyn Gate>>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            gates: standard_gates(),
        }
    }

    /// Evaluate one transaction against the snapshot.
    ///
    /// Uses the snapshot's token index to visit only rules with a possible
    /// include hit; gate semantics and results are identical to brute force
    /// over every rule.
    pub fn evaluate(
        &self,
        snapshot: &RuleSnapshot,
        signals: &Signals,
        tx: &TransactionContext,
    ) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for pos in snapshot.index().candidate_positions(&signals.tokens) {
            let rule = &snapshot.rules()[pos];
            if let Some(candidate) = self.evaluate_rule(rule, signals, tx) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    fn evaluate_rule(
        &self,
        rule: &PersonaRule,
        signals: &Signals,
        tx: &TransactionContext,
    ) -> Option<Candidate> {
        let include_hits = count_hits(&signals.tokens, &rule.include_terms);
        if include_hits == 0 {
            return None;
        }

        if !self.gates.iter().all(|gate| gate.passes(rule, signals, tx)) {
            return None;
        }

        let exclude_hits = count_hits(&signals.tokens, &rule.exclude_terms);
        let confidence = compute_confidence(
            rule.priority,
            include_hits,
            exclude_hits,
            signals.basket_bucket == BasketBucket::Bulk,
        );

        Some(Candidate {
            rule_id: rule.id,
            role_name: rule.role_name.clone(),
            priority: rule.priority,
            include_hits,
            exclude_hits,
            hour_ok: true,
            category_ok: true,
            confidence,
        })
    }
}

fn count_hits(
    tokens: &std::collections::HashSet<String>,
    terms: &std::collections::HashSet<String>,
) -> u32 {
    tokens.iter().filter(|t| terms.contains(*t)).count() as u32
}

/// Confidence = base(priority) with exclude override, include bonus, and bulk
/// bonus, clamped to [0, 1].
pub fn compute_confidence(priority: u32, include_hits: u32, exclude_hits: u32, bulk: bool) -> f64 {
    if exclude_hits > 0 {
        return EXCLUDE_OVERRIDE_CONFIDENCE;
    }

    let include_bonus =
        (INCLUDE_BONUS_PER_HIT * include_hits.saturating_sub(1) as f64).min(INCLUDE_BONUS_CAP);
    let bulk_bonus = if bulk { BULK_BONUS } else { 0.0 };

    (base_confidence(priority) + include_bonus + bulk_bonus).clamp(0.0, 1.0)
}
