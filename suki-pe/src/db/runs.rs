//! Recompute run audit rows

use sqlx::SqlitePool;
use suki_common::Result;

pub const STATUS_RUNNING: &str = "RUNNING";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_FAILED: &str = "FAILED";

/// Record the start of a recompute run
pub async fn insert_run(
    pool: &SqlitePool,
    run_id: &str,
    started_at: &str,
    scope: &str,
    dry_run: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO inference_runs (run_id, started_at, status, scope, dry_run)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(run_id)
    .bind(started_at)
    .bind(STATUS_RUNNING)
    .bind(scope)
    .bind(dry_run as i64)
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark a run finished and attach its JSON report
pub async fn finalize_run(
    pool: &SqlitePool,
    run_id: &str,
    completed_at: &str,
    status: &str,
    report_json: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE inference_runs
        SET completed_at = ?, status = ?, report = ?
        WHERE run_id = ?
        "#,
    )
    .bind(completed_at)
    .bind(status)
    .bind(report_json)
    .bind(run_id)
    .execute(pool)
    .await?;

    Ok(())
}
