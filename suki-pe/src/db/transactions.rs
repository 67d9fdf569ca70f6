//! Transaction feed fetches
//!
//! The transactions table is a read-only input owned by the upstream
//! warehouse; the engine only selects from it.

use crate::models::TransactionContext;
use crate::recompute::Scope;
use sqlx::SqlitePool;
use suki_common::db::models::TransactionRow;
use suki_common::{time, Result};
use tracing::warn;

/// Fetch transactions in scope.
///
/// Returns the parsed contexts plus the number of rows skipped because their
/// timestamp could not be parsed (logged, not fatal).
pub async fn fetch_in_scope(
    pool: &SqlitePool,
    scope: &Scope,
) -> Result<(Vec<TransactionContext>, usize)> {
    let rows = fetch_rows(pool, scope).await?;

    let mut transactions = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        match parse_row(row) {
            Ok(tx) => transactions.push(tx),
            Err(id) => {
                warn!("Skipping transaction {} with unparseable timestamp", id);
                skipped += 1;
            }
        }
    }

    Ok((transactions, skipped))
}

async fn fetch_rows(pool: &SqlitePool, scope: &Scope) -> Result<Vec<TransactionRow>> {
    const BASE: &str = "SELECT transaction_id, ts, category, brand, item_count, \
                        transcript, age, gender, explicit_role FROM transactions";

    let rows = match scope {
        Scope::All => {
            sqlx::query_as::<_, TransactionRow>(&format!("{} ORDER BY transaction_id", BASE))
                .fetch_all(pool)
                .await?
        }
        Scope::DateRange { from, to } => {
            let mut sql = String::from(BASE);
            sql.push_str(" WHERE 1 = 1");
            if from.is_some() {
                sql.push_str(" AND date(ts) >= date(?)");
            }
            if to.is_some() {
                sql.push_str(" AND date(ts) <= date(?)");
            }
            sql.push_str(" ORDER BY transaction_id");

            let mut query = sqlx::query_as::<_, TransactionRow>(&sql);
            if let Some(from) = from {
                query = query.bind(from.format("%Y-%m-%d").to_string());
            }
            if let Some(to) = to {
                query = query.bind(to.format("%Y-%m-%d").to_string());
            }
            query.fetch_all(pool).await?
        }
        Scope::Ids(ids) => {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            let sql = format!(
                "{} WHERE transaction_id IN ({}) ORDER BY transaction_id",
                BASE, placeholders
            );
            let mut query = sqlx::query_as::<_, TransactionRow>(&sql);
            for id in ids {
                query = query.bind(id);
            }
            query.fetch_all(pool).await?
        }
    };

    Ok(rows)
}

/// Convert a raw row; the error carries the transaction id for logging
fn parse_row(row: TransactionRow) -> std::result::Result<TransactionContext, String> {
    let ts = time::parse_timestamp(&row.ts).ok_or_else(|| row.transaction_id.clone())?;

    Ok(TransactionContext {
        transaction_id: row.transaction_id,
        ts,
        category: row.category,
        brand: row.brand,
        item_count: row.item_count.max(0) as u32,
        transcript: row.transcript,
        age: row.age.and_then(|a| u32::try_from(a).ok()),
        gender: row.gender,
        explicit_role: row.explicit_role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ts: &str) -> TransactionRow {
        TransactionRow {
            transaction_id: "t1".to_string(),
            ts: ts.to_string(),
            category: None,
            brand: None,
            item_count: 3,
            transcript: None,
            age: Some(-5),
            gender: None,
            explicit_role: None,
        }
    }

    #[test]
    fn test_parse_row_rfc3339() {
        let tx = parse_row(row("2025-06-01T08:15:00Z")).unwrap();
        assert_eq!(tx.hour_of_day(), 8);
        // Negative ages from upstream are dropped rather than wrapped
        assert_eq!(tx.age, None);
    }

    #[test]
    fn test_parse_row_bad_timestamp() {
        assert!(parse_row(row("not-a-date")).is_err());
    }
}
