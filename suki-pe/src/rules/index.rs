//! Inverted token index over rule include terms
//!
//! A rule only becomes a candidate with at least one include hit, so scoring
//! can skip every rule sharing no token with the transaction. The index
//! prunes the rule-by-transaction cross product down to the rules that can
//! possibly match, with results identical to brute force over the full
//! snapshot.

use super::PersonaRule;
use std::collections::{BTreeSet, HashMap, HashSet};

/// token → positions (into the snapshot's rule vector) of rules whose
/// include_terms contain that token
#[derive(Debug, Default)]
pub struct TokenIndex {
    map: HashMap<String, Vec<usize>>,
}

impl TokenIndex {
    pub fn build(rules: &[PersonaRule]) -> Self {
        let mut map: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, rule) in rules.iter().enumerate() {
            for term in &rule.include_terms {
                map.entry(term.clone()).or_default().push(pos);
            }
        }
        Self { map }
    }

    /// Positions of rules with at least one include term in `tokens`, in
    /// ascending (deterministic) order.
    pub fn candidate_positions(&self, tokens: &HashSet<String>) -> Vec<usize> {
        let mut positions = BTreeSet::new();
        for token in tokens {
            if let Some(rule_positions) = self.map.get(token) {
                positions.extend(rule_positions.iter().copied());
            }
        }
        positions.into_iter().collect()
    }
}
