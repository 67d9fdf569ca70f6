//! Inference result cache
//!
//! Idempotent upserts keyed on transaction_id: insert if absent, overwrite
//! when the outcome changed. The `DO UPDATE` carries a WHERE clause that
//! skips rows whose role/confidence/rule_source are unchanged, so a
//! recompute over unchanged rules and transactions leaves every row
//! byte-identical (including updated_at).

use crate::models::Inference;
use sqlx::SqlitePool;
use suki_common::Result;

/// Upsert one inference result
pub async fn upsert_result(pool: &SqlitePool, inference: &Inference, updated_at: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO inference_results (transaction_id, role, confidence, rule_source, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(transaction_id) DO UPDATE SET
            role = excluded.role,
            confidence = excluded.confidence,
            rule_source = excluded.rule_source,
            updated_at = excluded.updated_at
        WHERE inference_results.role != excluded.role
           OR inference_results.confidence != excluded.confidence
           OR inference_results.rule_source != excluded.rule_source
        "#,
    )
    .bind(&inference.transaction_id)
    .bind(&inference.role)
    .bind(inference.confidence)
    .bind(&inference.rule_source)
    .bind(updated_at)
    .execute(pool)
    .await?;

    Ok(())
}
