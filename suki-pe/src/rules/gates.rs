//! Rule gates
//!
//! Each gate type (temporal, category, demographic, basket) is one `Gate`
//! implementation; new gate types slot in without touching the scorer or the
//! resolver. The text gate is not listed here: include/exclude hit counting
//! feeds the confidence computation, so the scoring engine owns it.
//!
//! Demographic and basket gates fail closed: a rule that constrains a field
//! the transaction does not carry does not match.

use super::PersonaRule;
use crate::models::{Signals, TransactionContext};

/// A boolean precondition a rule must satisfy to become a candidate
pub trait Gate: Send + Sync {
    fn name(&self) -> &'static str;
    fn passes(&self, rule: &PersonaRule, signals: &Signals, tx: &TransactionContext) -> bool;
}

/// The standard gate set, evaluated in order
pub fn standard_gates() -> Vec<Box<dyn Gate>> {
    vec![
        Box::new(HourGate),
        Box::new(CategoryGate),
        Box::new(DemographicGate),
        Box::new(BasketGate),
    ]
}

/// Temporal gate: wildcard, or the transaction hour falls in at least one
/// active range (wraparound ranges included)
pub struct HourGate;

impl Gate for HourGate {
    fn name(&self) -> &'static str {
        "hour"
    }

    fn passes(&self, rule: &PersonaRule, signals: &Signals, _tx: &TransactionContext) -> bool {
        rule.hour_ok(signals.hour_of_day)
    }
}

/// Category gate: wildcard, or the derived category group is a member of the
/// rule's required set
pub struct CategoryGate;

impl Gate for CategoryGate {
    fn name(&self) -> &'static str {
        "category"
    }

    fn passes(&self, rule: &PersonaRule, signals: &Signals, _tx: &TransactionContext) -> bool {
        rule.category_ok(&signals.category_group)
    }
}

/// Demographic gate: age bounds and allowed genders
pub struct DemographicGate;

impl Gate for DemographicGate {
    fn name(&self) -> &'static str {
        "demographic"
    }

    fn passes(&self, rule: &PersonaRule, _signals: &Signals, tx: &TransactionContext) -> bool {
        if rule.min_age.is_some() || rule.max_age.is_some() {
            let Some(age) = tx.age else {
                return false;
            };
            if rule.min_age.is_some_and(|lo| age < lo) {
                return false;
            }
            if rule.max_age.is_some_and(|hi| age > hi) {
                return false;
            }
        }

        if !rule.allowed_genders.is_empty() {
            let Some(gender) = tx.gender.as_deref() else {
                return false;
            };
            if !rule.allowed_genders.contains(&gender.trim().to_lowercase()) {
                return false;
            }
        }

        true
    }
}

/// Basket gate: minimum item count
pub struct BasketGate;

impl Gate for BasketGate {
    fn name(&self) -> &'static str {
        "basket"
    }

    fn passes(&self, rule: &PersonaRule, _signals: &Signals, tx: &TransactionContext) -> bool {
        rule.min_basket_items
            .map_or(true, |min| tx.item_count >= min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasketBucket, Daypart};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn rule() -> PersonaRule {
        PersonaRule {
            id: 1,
            role_name: "Test".to_string(),
            priority: 1,
            include_terms: ["x".to_string()].into_iter().collect(),
            exclude_terms: HashSet::new(),
            required_categories: HashSet::new(),
            active_hours: Vec::new(),
            min_age: None,
            max_age: None,
            allowed_genders: HashSet::new(),
            min_basket_items: None,
        }
    }

    fn tx() -> TransactionContext {
        TransactionContext {
            transaction_id: "t1".to_string(),
            ts: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            category: None,
            brand: None,
            item_count: 2,
            transcript: None,
            age: None,
            gender: None,
            explicit_role: None,
        }
    }

    fn signals(hour: u8) -> Signals {
        Signals {
            tokens: HashSet::new(),
            hour_of_day: hour,
            daypart: Daypart::from_hour(hour),
            category_group: "Snacks".to_string(),
            basket_bucket: BasketBucket::Small,
        }
    }

    #[test]
    fn test_demographic_gate_fails_closed_on_missing_age() {
        let mut r = rule();
        r.min_age = Some(18);
        assert!(!DemographicGate.passes(&r, &signals(8), &tx()));

        let mut t = tx();
        t.age = Some(25);
        assert!(DemographicGate.passes(&r, &signals(8), &t));

        t.age = Some(15);
        assert!(!DemographicGate.passes(&r, &signals(8), &t));
    }

    #[test]
    fn test_demographic_gate_fails_closed_on_missing_gender() {
        let mut r = rule();
        r.allowed_genders = ["female".to_string()].into_iter().collect();
        assert!(!DemographicGate.passes(&r, &signals(8), &tx()));

        let mut t = tx();
        t.gender = Some("Female".to_string());
        assert!(DemographicGate.passes(&r, &signals(8), &t));

        t.gender = Some("male".to_string());
        assert!(!DemographicGate.passes(&r, &signals(8), &t));
    }

    #[test]
    fn test_demographic_gate_wildcard_passes_null_fields() {
        assert!(DemographicGate.passes(&rule(), &signals(8), &tx()));
    }

    #[test]
    fn test_basket_gate() {
        let mut r = rule();
        assert!(BasketGate.passes(&r, &signals(8), &tx()));

        r.min_basket_items = Some(8);
        assert!(!BasketGate.passes(&r, &signals(8), &tx()));

        let mut t = tx();
        t.item_count = 9;
        assert!(BasketGate.passes(&r, &signals(8), &t));
    }

    #[test]
    fn test_hour_gate_uses_ranges() {
        let mut r = rule();
        r.active_hours = vec![super::super::HourRange { lo: 22, hi: 5 }];
        assert!(HourGate.passes(&r, &signals(2), &tx()));
        assert!(!HourGate.passes(&r, &signals(12), &tx()));
    }

    #[test]
    fn test_category_gate() {
        let mut r = rule();
        assert!(CategoryGate.passes(&r, &signals(8), &tx()));

        r.required_categories = ["energy drinks".to_string()].into_iter().collect();
        assert!(!CategoryGate.passes(&r, &signals(8), &tx()));

        let mut s = signals(8);
        s.category_group = "Energy Drinks".to_string();
        assert!(CategoryGate.passes(&r, &s, &tx()));
    }
}
