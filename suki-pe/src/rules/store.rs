//! Rule loading and validation
//!
//! Active `persona_rules` rows are parsed and validated once per run. A
//! malformed rule is logged and excluded; the run continues with the
//! remaining valid rules - a single bad rule must not abort the batch.

use super::{HourRange, PersonaRule, RuleSnapshot};
use crate::signals::tokenizer::normalize_term;
use sqlx::SqlitePool;
use std::collections::HashSet;
use suki_common::db::models::PersonaRuleRow;
use suki_common::Result;
use tracing::{info, warn};

/// Load the active rule snapshot for one recompute run
pub async fn load_snapshot(pool: &SqlitePool) -> Result<RuleSnapshot> {
    let rows = crate::db::rules::fetch_active_rule_rows(pool).await?;
    let total = rows.len();

    let mut rules = Vec::with_capacity(total);
    let mut rejected = 0usize;
    for row in rows {
        let id = row.id;
        match parse_rule(row) {
            Ok(rule) => rules.push(rule),
            Err(reason) => {
                warn!("Excluding invalid persona rule {}: {}", id, reason);
                rejected += 1;
            }
        }
    }

    info!("Loaded rule snapshot: {} active rules ({} rejected)", rules.len(), rejected);
    Ok(RuleSnapshot::new(rules, rejected))
}

/// Parse and validate one raw rule row
pub fn parse_rule(row: PersonaRuleRow) -> std::result::Result<PersonaRule, String> {
    if row.priority <= 0 {
        return Err(format!("priority must be > 0, got {}", row.priority));
    }

    let include_terms = parse_term_set(Some(&row.include_terms), "include_terms")?;
    if include_terms.is_empty() {
        // Every active rule must define include terms; matching solely on an
        // explicit override is not a rule's job.
        return Err("active rule has no include_terms".to_string());
    }
    for term in &include_terms {
        if term.contains(' ') {
            warn!(
                "Rule {} include term '{}' contains whitespace and can never match a single token",
                row.id, term
            );
        }
    }

    let exclude_terms = parse_term_set(row.exclude_terms.as_deref(), "exclude_terms")?;

    let required_categories = parse_string_set(row.required_categories.as_deref(), "required_categories")?
        .into_iter()
        .map(|c| c.to_lowercase())
        .collect();

    let allowed_genders = parse_string_set(row.allowed_genders.as_deref(), "allowed_genders")?
        .into_iter()
        .map(|g| g.to_lowercase())
        .collect();

    let active_hours = parse_hour_ranges(row.active_hours.as_deref())?;

    let min_age = parse_bound(row.min_age, "min_age")?;
    let max_age = parse_bound(row.max_age, "max_age")?;
    if let (Some(lo), Some(hi)) = (min_age, max_age) {
        if lo > hi {
            return Err(format!("min_age {} exceeds max_age {}", lo, hi));
        }
    }

    let min_basket_items = parse_bound(row.min_basket_items, "min_basket_items")?;

    Ok(PersonaRule {
        id: row.id,
        role_name: row.role_name,
        priority: row.priority as u32,
        include_terms,
        exclude_terms,
        required_categories,
        active_hours,
        min_age,
        max_age,
        allowed_genders,
        min_basket_items,
    })
}

/// Parse a JSON string-array column into a normalized term set.
/// NULL and empty arrays yield the empty set.
fn parse_term_set(raw: Option<&str>, field: &str) -> std::result::Result<HashSet<String>, String> {
    Ok(parse_string_set(raw, field)?
        .into_iter()
        .map(|t| normalize_term(&t))
        .filter(|t| !t.is_empty())
        .collect())
}

fn parse_string_set(raw: Option<&str>, field: &str) -> std::result::Result<Vec<String>, String> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Ok(Vec::new()),
    };
    serde_json::from_str::<Vec<String>>(raw).map_err(|e| format!("{} is not a JSON string array: {}", field, e))
}

/// Parse the active_hours JSON array of [lo, hi] pairs
fn parse_hour_ranges(raw: Option<&str>) -> std::result::Result<Vec<HourRange>, String> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Ok(Vec::new()),
    };
    let pairs: Vec<[i64; 2]> = serde_json::from_str(raw)
        .map_err(|e| format!("active_hours is not a JSON array of [lo, hi] pairs: {}", e))?;

    let mut ranges = Vec::with_capacity(pairs.len());
    for [lo, hi] in pairs {
        if !(0..=23).contains(&lo) || !(0..=23).contains(&hi) {
            return Err(format!("hour bounds [{}, {}] outside 0..23", lo, hi));
        }
        ranges.push(HourRange {
            lo: lo as u8,
            hi: hi as u8,
        });
    }
    Ok(ranges)
}

fn parse_bound(raw: Option<i64>, field: &str) -> std::result::Result<Option<u32>, String> {
    match raw {
        None => Ok(None),
        Some(v) if v < 0 => Err(format!("{} must be >= 0, got {}", field, v)),
        Some(v) => Ok(Some(v as u32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_row() -> PersonaRuleRow {
        PersonaRuleRow {
            id: 1,
            role_name: "Student".to_string(),
            priority: 1,
            include_terms: r#"["school", "Aral"]"#.to_string(),
            exclude_terms: None,
            required_categories: None,
            active_hours: None,
            min_age: None,
            max_age: None,
            allowed_genders: None,
            min_basket_items: None,
            is_active: 1,
        }
    }

    #[test]
    fn test_parse_valid_rule() {
        let rule = parse_rule(base_row()).unwrap();
        assert_eq!(rule.id, 1);
        assert_eq!(rule.priority, 1);
        assert!(rule.include_terms.contains("school"));
        // Terms are normalized to lowercase
        assert!(rule.include_terms.contains("aral"));
        assert!(rule.exclude_terms.is_empty());
        assert!(rule.active_hours.is_empty());
    }

    #[test]
    fn test_reject_nonpositive_priority() {
        let mut row = base_row();
        row.priority = 0;
        assert!(parse_rule(row).is_err());

        let mut row = base_row();
        row.priority = -3;
        assert!(parse_rule(row).is_err());
    }

    #[test]
    fn test_reject_empty_include_terms() {
        let mut row = base_row();
        row.include_terms = "[]".to_string();
        assert!(parse_rule(row).is_err());

        let mut row = base_row();
        row.include_terms = r#"["  "]"#.to_string();
        assert!(parse_rule(row).is_err());
    }

    #[test]
    fn test_reject_out_of_range_hours() {
        let mut row = base_row();
        row.active_hours = Some("[[22, 24]]".to_string());
        assert!(parse_rule(row).is_err());

        let mut row = base_row();
        row.active_hours = Some("[[-1, 5]]".to_string());
        assert!(parse_rule(row).is_err());
    }

    #[test]
    fn test_parse_wraparound_hours() {
        let mut row = base_row();
        row.active_hours = Some("[[22, 5]]".to_string());
        let rule = parse_rule(row).unwrap();
        assert_eq!(rule.active_hours, vec![HourRange { lo: 22, hi: 5 }]);
    }

    #[test]
    fn test_reject_malformed_json() {
        let mut row = base_row();
        row.include_terms = "school, aral".to_string();
        assert!(parse_rule(row).is_err());
    }

    #[test]
    fn test_reject_inverted_age_bounds() {
        let mut row = base_row();
        row.min_age = Some(40);
        row.max_age = Some(18);
        assert!(parse_rule(row).is_err());
    }

    #[test]
    fn test_categories_and_genders_lowercased() {
        let mut row = base_row();
        row.required_categories = Some(r#"["Energy Drinks"]"#.to_string());
        row.allowed_genders = Some(r#"["Female", "MALE"]"#.to_string());
        let rule = parse_rule(row).unwrap();
        assert!(rule.required_categories.contains("energy drinks"));
        assert!(rule.allowed_genders.contains("female"));
        assert!(rule.allowed_genders.contains("male"));
    }
}
