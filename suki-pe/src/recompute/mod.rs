//! Recompute orchestration
//!
//! The single operational entry point: re-evaluates the active rule snapshot
//! against every transaction in scope and upserts the winning inference per
//! transaction.
//!
//! Per-transaction evaluation is a pure function of (transaction, snapshot)
//! with no shared mutable state, so scoring fans out over a rayon pool inside
//! `spawn_blocking`. The only shared write path is the result cache, whose
//! upserts are keyed by transaction_id and therefore safe regardless of
//! completion order. An aborted run leaves the cache valid (if incomplete)
//! and is simply re-run.

pub mod statistics;

pub use statistics::{ConfidenceHistogram, RunReport};

use crate::models::{Inference, Signals, TransactionContext};
use crate::resolver::ConflictResolver;
use crate::rules::{self, RuleSnapshot};
use crate::scoring::ScoringEngine;
use crate::signals::SignalExtractor;
use chrono::NaiveDate;
use rayon::prelude::*;
use sqlx::SqlitePool;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use suki_common::config::EngineSettings;
use suki_common::{time, Error, Result};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Which transactions a recompute run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    /// Inclusive UTC date bounds; either side may be open
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// Explicit transaction-id list
    Ids(Vec<String>),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "all"),
            Scope::DateRange { from, to } => {
                let fmt_bound =
                    |b: &Option<NaiveDate>| b.map_or("*".to_string(), |d| d.to_string());
                write!(f, "date:{}..{}", fmt_bound(from), fmt_bound(to))
            }
            Scope::Ids(ids) => write!(f, "ids:{}", ids.len()),
        }
    }
}

/// Recompute parameters
#[derive(Debug, Clone)]
pub struct RecomputeOptions {
    pub scope: Scope,
    /// Compute and report without writing anything
    pub dry_run: bool,
    /// Scoring worker threads; 0 defers to the `worker_threads` setting
    /// (which defaults to one per core)
    pub workers: usize,
    /// Also upsert per-transaction signal diagnostics
    pub export_signals: bool,
}

/// Scored-and-resolved outcome for one transaction
struct Outcome {
    transaction_id: String,
    inference: Option<Inference>,
    /// Present only when signal export was requested
    signals: Option<Signals>,
}

/// Run a recompute over the given scope.
///
/// Fails fast before any write when the source is unreachable; a failure
/// after the run row exists marks the run FAILED.
pub async fn run(pool: &SqlitePool, options: RecomputeOptions) -> Result<RunReport> {
    let settings = EngineSettings::load(pool).await?;
    let run_id = Uuid::new_v4().to_string();
    let started_at = time::now().to_rfc3339();
    let scope_desc = options.scope.to_string();

    info!(
        "Starting recompute run {} (scope {}, dry_run {})",
        run_id, scope_desc, options.dry_run
    );

    if !options.dry_run {
        crate::db::runs::insert_run(pool, &run_id, &started_at, &scope_desc, options.dry_run)
            .await?;
    }

    match run_inner(pool, &options, &settings, &run_id, &scope_desc, &started_at).await {
        Ok(report) => {
            if !options.dry_run {
                let report_json = serde_json::to_string(&report)
                    .map_err(|e| Error::Internal(format!("Failed to serialize report: {}", e)))?;
                crate::db::runs::finalize_run(
                    pool,
                    &run_id,
                    &time::now().to_rfc3339(),
                    crate::db::runs::STATUS_COMPLETED,
                    Some(&report_json),
                )
                .await?;
            }
            info!("Recompute run {} completed", run_id);
            Ok(report)
        }
        Err(e) => {
            error!("Recompute run {} failed: {}", run_id, e);
            if !options.dry_run {
                // Best effort: the failure may be the database itself
                if let Err(mark_err) = crate::db::runs::finalize_run(
                    pool,
                    &run_id,
                    &time::now().to_rfc3339(),
                    crate::db::runs::STATUS_FAILED,
                    None,
                )
                .await
                {
                    warn!("Could not mark run {} FAILED: {}", run_id, mark_err);
                }
            }
            Err(e)
        }
    }
}

async fn run_inner(
    pool: &SqlitePool,
    options: &RecomputeOptions,
    settings: &EngineSettings,
    run_id: &str,
    scope_desc: &str,
    started_at: &str,
) -> Result<RunReport> {
    // One immutable snapshot per run: loaded before any transaction is
    // scored so concurrent rule edits cannot change results mid-run.
    let snapshot = Arc::new(rules::load_snapshot(pool).await?);

    let (transactions, skipped_inputs) =
        crate::db::transactions::fetch_in_scope(pool, &options.scope).await?;
    info!(
        "Fetched {} transactions in scope ({} skipped)",
        transactions.len(),
        skipped_inputs
    );

    let workers = if options.workers > 0 {
        options.workers
    } else {
        settings.worker_threads
    };

    let resolver = ConflictResolver::new(settings.fallback_role_opt().map(String::from));
    let outcomes = score_all(
        Arc::clone(&snapshot),
        transactions,
        resolver,
        workers,
        options.export_signals,
    )
    .await?;

    let mut report = RunReport::new(run_id.to_string(), scope_desc.to_string(), options.dry_run);
    report.rules_active = snapshot.len();
    report.rules_rejected = snapshot.rejected();
    report.considered = outcomes.len();
    report.skipped_inputs = skipped_inputs;
    for outcome in &outcomes {
        match &outcome.inference {
            Some(inference) => report.record_resolution(inference),
            None => report.record_unresolved(),
        }
    }

    if !options.dry_run {
        flush_outcomes(pool, &outcomes, settings.batch_flush_size, started_at, &mut report).await;
    }

    Ok(report)
}

/// Score every transaction on a rayon pool inside `spawn_blocking`
async fn score_all(
    snapshot: Arc<RuleSnapshot>,
    transactions: Vec<TransactionContext>,
    resolver: ConflictResolver,
    workers: usize,
    export_signals: bool,
) -> Result<Vec<Outcome>> {
    tokio::task::spawn_blocking(move || -> Result<Vec<Outcome>> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if workers > 0 {
            builder = builder.num_threads(workers);
        }
        let thread_pool = builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build worker pool: {}", e)))?;

        let extractor = SignalExtractor::new();
        let engine = ScoringEngine::new();
        let processed = AtomicUsize::new(0);
        let total = transactions.len();

        let outcomes = thread_pool.install(|| {
            transactions
                .par_iter()
                .map(|tx| {
                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 1000 == 0 {
                        debug!("Scored {}/{} transactions", count, total);
                    }
                    evaluate_one(&extractor, &engine, &resolver, &snapshot, tx, export_signals)
                })
                .collect::<Vec<_>>()
        });

        Ok(outcomes)
    })
    .await
    .map_err(|e| Error::Internal(format!("Scoring task panicked: {}", e)))?
}

/// Evaluate a single transaction: extract signals, score against the
/// snapshot (skipped entirely under an explicit override), resolve.
fn evaluate_one(
    extractor: &SignalExtractor,
    engine: &ScoringEngine,
    resolver: &ConflictResolver,
    snapshot: &RuleSnapshot,
    tx: &TransactionContext,
    export_signals: bool,
) -> Outcome {
    let signals = extractor.extract(tx);

    let inference = if tx.explicit_role_opt().is_some() {
        resolver.resolve(tx, Vec::new())
    } else {
        let candidates = engine.evaluate(snapshot, &signals, tx);
        resolver.resolve(tx, candidates)
    };

    Outcome {
        transaction_id: tx.transaction_id.clone(),
        inference,
        signals: export_signals.then_some(signals),
    }
}

/// Upsert winners (and diagnostics when requested) in batches.
///
/// Upserts are transaction-id-scoped and independent: an individual failure
/// is logged and counted, and the run continues.
async fn flush_outcomes(
    pool: &SqlitePool,
    outcomes: &[Outcome],
    batch_size: usize,
    updated_at: &str,
    report: &mut RunReport,
) {
    for (batch_idx, chunk) in outcomes.chunks(batch_size.max(1)).enumerate() {
        for outcome in chunk {
            if let Some(inference) = &outcome.inference {
                if let Err(e) = crate::db::results::upsert_result(pool, inference, updated_at).await
                {
                    warn!(
                        "Failed to write result for {}: {}",
                        inference.transaction_id, e
                    );
                    report.write_errors += 1;
                }
            }
            if let Some(signals) = &outcome.signals {
                if let Err(e) = crate::db::diagnostics::upsert_signal_diagnostic(
                    pool,
                    &outcome.transaction_id,
                    signals,
                    updated_at,
                )
                .await
                {
                    warn!(
                        "Failed to write diagnostics for {}: {}",
                        outcome.transaction_id, e
                    );
                    report.write_errors += 1;
                }
            }
        }
        debug!("Flushed batch {} ({} outcomes)", batch_idx + 1, chunk.len());
    }
}
