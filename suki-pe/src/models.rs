//! Engine data types
//!
//! Inputs (TransactionContext), derived signals, scoring candidates, and the
//! inference output. Signals are transient: owned by the engine for the
//! duration of one evaluation, optionally exported for diagnostics.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One cleaned transaction from the upstream warehouse (read-only input)
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub transaction_id: String,
    pub ts: DateTime<Utc>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub item_count: u32,
    pub transcript: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// Pre-assigned label that bypasses scoring entirely
    pub explicit_role: Option<String>,
}

impl TransactionContext {
    /// Explicit role override, if present and non-empty
    pub fn explicit_role_opt(&self) -> Option<&str> {
        self.explicit_role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn hour_of_day(&self) -> u8 {
        self.ts.hour() as u8
    }
}

/// Named bucket of hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Daypart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Daypart {
    /// Fixed boundary table: morning 5-10, afternoon 11-15, evening 16-20,
    /// night otherwise (including the wrap across midnight).
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            5..=10 => Daypart::Morning,
            11..=15 => Daypart::Afternoon,
            16..=20 => Daypart::Evening,
            _ => Daypart::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Daypart::Morning => "morning",
            Daypart::Afternoon => "afternoon",
            Daypart::Evening => "evening",
            Daypart::Night => "night",
        }
    }
}

/// Basket size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasketBucket {
    Small,
    Medium,
    Bulk,
}

impl BasketBucket {
    pub fn from_item_count(item_count: u32) -> Self {
        match item_count {
            0..=3 => BasketBucket::Small,
            4..=7 => BasketBucket::Medium,
            _ => BasketBucket::Bulk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BasketBucket::Small => "small",
            BasketBucket::Medium => "medium",
            BasketBucket::Bulk => "bulk",
        }
    }
}

/// Normalized signals derived from one transaction
#[derive(Debug, Clone)]
pub struct Signals {
    /// Lowercased, punctuation-stripped transcript tokens
    pub tokens: HashSet<String>,
    pub hour_of_day: u8,
    pub daypart: Daypart,
    /// Canonical category group, "Unknown" when unmapped
    pub category_group: String,
    pub basket_bucket: BasketBucket,
}

/// A rule that passed all its gates for a given transaction
#[derive(Debug, Clone)]
pub struct Candidate {
    pub rule_id: i64,
    pub role_name: String,
    pub priority: u32,
    pub include_hits: u32,
    pub exclude_hits: u32,
    pub hour_ok: bool,
    pub category_ok: bool,
    pub confidence: f64,
}

/// Resolved inference for one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub transaction_id: String,
    pub role: String,
    pub confidence: f64,
    /// "rule:{id}", "explicit", or "fallback"
    pub rule_source: String,
}

/// Heuristic speaker tag for a transcript utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Customer,
    Owner,
    Unknown,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Customer => "customer",
            Speaker::Owner => "owner",
            Speaker::Unknown => "unknown",
        }
    }
}

/// One segmented transcript utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub speaker: Speaker,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_daypart_boundaries() {
        assert_eq!(Daypart::from_hour(5), Daypart::Morning);
        assert_eq!(Daypart::from_hour(10), Daypart::Morning);
        assert_eq!(Daypart::from_hour(11), Daypart::Afternoon);
        assert_eq!(Daypart::from_hour(15), Daypart::Afternoon);
        assert_eq!(Daypart::from_hour(16), Daypart::Evening);
        assert_eq!(Daypart::from_hour(20), Daypart::Evening);
        assert_eq!(Daypart::from_hour(21), Daypart::Night);
        assert_eq!(Daypart::from_hour(0), Daypart::Night);
        assert_eq!(Daypart::from_hour(4), Daypart::Night);
    }

    #[test]
    fn test_basket_buckets() {
        assert_eq!(BasketBucket::from_item_count(0), BasketBucket::Small);
        assert_eq!(BasketBucket::from_item_count(3), BasketBucket::Small);
        assert_eq!(BasketBucket::from_item_count(4), BasketBucket::Medium);
        assert_eq!(BasketBucket::from_item_count(7), BasketBucket::Medium);
        assert_eq!(BasketBucket::from_item_count(8), BasketBucket::Bulk);
        assert_eq!(BasketBucket::from_item_count(100), BasketBucket::Bulk);
    }

    #[test]
    fn test_explicit_role_opt_trims_and_filters() {
        let mut tx = TransactionContext {
            transaction_id: "t1".to_string(),
            ts: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            category: None,
            brand: None,
            item_count: 1,
            transcript: None,
            age: None,
            gender: None,
            explicit_role: None,
        };
        assert_eq!(tx.explicit_role_opt(), None);

        tx.explicit_role = Some("  ".to_string());
        assert_eq!(tx.explicit_role_opt(), None);

        tx.explicit_role = Some(" Reseller ".to_string());
        assert_eq!(tx.explicit_role_opt(), Some("Reseller"));
    }
}
