//! Database initialization
//!
//! Opens (creating if needed) the SQLite database and brings the schema up to
//! date. All table creation is idempotent; calling `init_database` on an
//! existing database is safe.

use crate::config::EngineSettings;
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer, which matters when a
    // recompute run flushes batches while diagnostics are being read.
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_tables(&pool).await?;
    init_default_settings(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_persona_rules_table(pool).await?;
    create_transactions_table(pool).await?;
    create_inference_results_table(pool).await?;
    create_signal_diagnostics_table(pool).await?;
    create_inference_runs_table(pool).await?;
    Ok(())
}

/// Seed built-in defaults for engine settings not yet present
pub async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    let defaults: [(&str, String); 3] = [
        ("fallback_role", EngineSettings::DEFAULT_FALLBACK_ROLE.to_string()),
        ("batch_flush_size", EngineSettings::DEFAULT_BATCH_FLUSH_SIZE.to_string()),
        ("worker_threads", EngineSettings::DEFAULT_WORKER_THREADS.to_string()),
    ];

    for (key, value) in defaults {
        sqlx::query(
            "INSERT OR IGNORE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Persona rule records maintained by business users.
///
/// Term, category, and gender sets are JSON arrays of strings; active_hours
/// is a JSON array of [lo, hi] pairs. NULL or empty array means wildcard.
async fn create_persona_rules_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS persona_rules (
            id INTEGER PRIMARY KEY,
            role_name TEXT NOT NULL,
            priority INTEGER NOT NULL,
            include_terms TEXT NOT NULL,
            exclude_terms TEXT,
            required_categories TEXT,
            active_hours TEXT,
            min_age INTEGER,
            max_age INTEGER,
            allowed_genders TEXT,
            min_basket_items INTEGER,
            is_active INTEGER NOT NULL DEFAULT 1,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Cleaned transaction feed from the upstream warehouse (read-only input)
async fn create_transactions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            transaction_id TEXT PRIMARY KEY,
            ts TEXT NOT NULL,
            category TEXT,
            brand TEXT,
            item_count INTEGER NOT NULL DEFAULT 0,
            transcript TEXT,
            age INTEGER,
            gender TEXT,
            explicit_role TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_transactions_ts ON transactions(ts)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Inference output: at most one row per transaction_id
async fn create_inference_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inference_results (
            transaction_id TEXT PRIMARY KEY,
            role TEXT NOT NULL,
            confidence REAL NOT NULL,
            rule_source TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Optional per-transaction signal export for rule tuning
async fn create_signal_diagnostics_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS signal_diagnostics (
            transaction_id TEXT PRIMARY KEY,
            hour_of_day INTEGER NOT NULL,
            daypart TEXT NOT NULL,
            category_group TEXT NOT NULL,
            basket_bucket TEXT NOT NULL,
            token_count INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Audit trail of recompute runs
async fn create_inference_runs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inference_runs (
            run_id TEXT PRIMARY KEY,
            started_at TEXT NOT NULL,
            completed_at TEXT,
            status TEXT NOT NULL,
            scope TEXT NOT NULL,
            dry_run INTEGER NOT NULL DEFAULT 0,
            report TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("suki.db");

        let pool = init_database(&db_path).await.expect("init failed");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();

        for expected in [
            "settings",
            "persona_rules",
            "transactions",
            "inference_results",
            "signal_diagnostics",
            "inference_runs",
        ] {
            assert!(names.contains(&expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_init_database_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("suki.db");

        let pool = init_database(&db_path).await.unwrap();
        drop(pool);
        // Second open must succeed against the existing file
        init_database(&db_path).await.unwrap();
    }

    #[tokio::test]
    async fn test_default_settings_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("suki.db");
        let pool = init_database(&db_path).await.unwrap();

        let (value,): (String,) =
            sqlx::query_as("SELECT value FROM settings WHERE key = 'batch_flush_size'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(value, "500");
    }

    #[tokio::test]
    async fn test_default_settings_do_not_clobber() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("suki.db");
        let pool = init_database(&db_path).await.unwrap();

        sqlx::query("UPDATE settings SET value = 'Regular' WHERE key = 'fallback_role'")
            .execute(&pool)
            .await
            .unwrap();

        init_default_settings(&pool).await.unwrap();

        let (value,): (String,) =
            sqlx::query_as("SELECT value FROM settings WHERE key = 'fallback_role'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(value, "Regular");
    }
}
