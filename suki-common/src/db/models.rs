//! Database row models
//!
//! Raw rows as stored; JSON-encoded columns (term sets, hour ranges) are
//! parsed and validated by the engine's rule store, not here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Raw persona_rules row. `include_terms`/`exclude_terms`/
/// `required_categories`/`allowed_genders` hold JSON string arrays;
/// `active_hours` holds a JSON array of [lo, hi] pairs.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonaRuleRow {
    pub id: i64,
    pub role_name: String,
    pub priority: i64,
    pub include_terms: String,
    pub exclude_terms: Option<String>,
    pub required_categories: Option<String>,
    pub active_hours: Option<String>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub allowed_genders: Option<String>,
    pub min_basket_items: Option<i64>,
    pub is_active: i64,
}

/// Raw transactions row (upstream warehouse feed)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub ts: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub item_count: i64,
    pub transcript: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub explicit_role: Option<String>,
}

/// Inference output row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InferenceResultRow {
    pub transaction_id: String,
    pub role: String,
    pub confidence: f64,
    pub rule_source: String,
    pub updated_at: String,
}

/// Recompute run audit row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InferenceRunRow {
    pub run_id: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub status: String,
    pub scope: String,
    pub dry_run: i64,
    pub report: Option<String>,
}
