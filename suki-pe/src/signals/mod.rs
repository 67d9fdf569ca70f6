//! Signal extraction
//!
//! Derives normalized signals (token set, hour/daypart, category group,
//! basket bucket) from one transaction's raw context. Pure function of its
//! input; no side effects. Fails softly: a null/empty transcript yields an
//! empty token set, a null category yields the "Unknown" group.

pub mod category;
pub mod tokenizer;

pub use category::CategoryMapper;

use crate::models::{BasketBucket, Daypart, Signals, TransactionContext};

/// Signal extractor
///
/// Owns the category mapping table; build once per run and share across
/// workers.
#[derive(Debug, Clone, Default)]
pub struct SignalExtractor {
    categories: CategoryMapper,
}

impl SignalExtractor {
    pub fn new() -> Self {
        Self {
            categories: CategoryMapper::new(),
        }
    }

    /// Derive signals from one transaction
    pub fn extract(&self, tx: &TransactionContext) -> Signals {
        let tokens = tx
            .transcript
            .as_deref()
            .map(tokenizer::tokenize)
            .unwrap_or_default();

        let hour_of_day = tx.hour_of_day();

        Signals {
            tokens,
            hour_of_day,
            daypart: Daypart::from_hour(hour_of_day),
            category_group: self
                .categories
                .map(tx.category.as_deref(), tx.brand.as_deref()),
            basket_bucket: BasketBucket::from_item_count(tx.item_count),
        }
    }
}
