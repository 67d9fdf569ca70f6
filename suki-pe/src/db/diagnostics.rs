//! Optional per-transaction signal export
//!
//! Written only when a recompute is invoked with signal export enabled; the
//! table exists for rule tuning and is not read by the engine itself.

use crate::models::Signals;
use sqlx::SqlitePool;
use suki_common::Result;

/// Upsert the derived signals for one transaction
pub async fn upsert_signal_diagnostic(
    pool: &SqlitePool,
    transaction_id: &str,
    signals: &Signals,
    updated_at: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO signal_diagnostics
            (transaction_id, hour_of_day, daypart, category_group, basket_bucket, token_count, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(transaction_id) DO UPDATE SET
            hour_of_day = excluded.hour_of_day,
            daypart = excluded.daypart,
            category_group = excluded.category_group,
            basket_bucket = excluded.basket_bucket,
            token_count = excluded.token_count,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(transaction_id)
    .bind(signals.hour_of_day as i64)
    .bind(signals.daypart.as_str())
    .bind(&signals.category_group)
    .bind(signals.basket_bucket.as_str())
    .bind(signals.tokens.len() as i64)
    .bind(updated_at)
    .execute(pool)
    .await?;

    Ok(())
}
