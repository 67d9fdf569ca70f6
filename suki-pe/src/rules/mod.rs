//! Persona rule records and the per-run rule snapshot
//!
//! Rules are data, not code: business users maintain `persona_rules` rows
//! outside this engine. A recompute run loads one immutable `RuleSnapshot`
//! up front and evaluates only that snapshot, so concurrent rule edits can
//! never produce non-deterministic results mid-run.

pub mod gates;
pub mod index;
pub mod store;

pub use gates::{standard_gates, Gate};
pub use index::TokenIndex;
pub use store::load_snapshot;

use std::collections::HashSet;

/// An hour interval [lo, hi] in 0..=23. `lo > hi` wraps across midnight:
/// [22, 5] covers 22,23,0,1,2,3,4,5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub lo: u8,
    pub hi: u8,
}

impl HourRange {
    pub fn contains(&self, hour: u8) -> bool {
        if self.lo <= self.hi {
            hour >= self.lo && hour <= self.hi
        } else {
            hour >= self.lo || hour <= self.hi
        }
    }
}

/// One validated persona rule
///
/// Empty sets mean wildcard for categories, hours, and genders.
/// `include_terms` is never empty on a validated rule.
#[derive(Debug, Clone)]
pub struct PersonaRule {
    pub id: i64,
    pub role_name: String,
    /// Lower = stronger
    pub priority: u32,
    pub include_terms: HashSet<String>,
    pub exclude_terms: HashSet<String>,
    /// Canonical category group names, lowercased; empty = any
    pub required_categories: HashSet<String>,
    /// Empty = any hour
    pub active_hours: Vec<HourRange>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    /// Lowercased; empty = any
    pub allowed_genders: HashSet<String>,
    pub min_basket_items: Option<u32>,
}

impl PersonaRule {
    /// True when the hour satisfies the temporal constraint (wildcard or at
    /// least one range)
    pub fn hour_ok(&self, hour: u8) -> bool {
        self.active_hours.is_empty() || self.active_hours.iter().any(|r| r.contains(hour))
    }

    /// True when the category group satisfies the category constraint
    pub fn category_ok(&self, category_group: &str) -> bool {
        self.required_categories.is_empty()
            || self
                .required_categories
                .contains(&category_group.to_lowercase())
    }
}

/// Immutable set of validated rules for one recompute run
#[derive(Debug)]
pub struct RuleSnapshot {
    rules: Vec<PersonaRule>,
    index: TokenIndex,
    rejected: usize,
}

impl RuleSnapshot {
    /// Build a snapshot from already-validated rules
    pub fn new(rules: Vec<PersonaRule>, rejected: usize) -> Self {
        let index = TokenIndex::build(&rules);
        Self {
            rules,
            index,
            rejected,
        }
    }

    pub fn rules(&self) -> &[PersonaRule] {
        &self.rules
    }

    pub fn index(&self) -> &TokenIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules rejected by validation at load time
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
