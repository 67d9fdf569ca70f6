//! Command-line interface

use crate::recompute::Scope;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "suki-pe", version, about = "Suki persona inference engine")]
pub struct Cli {
    /// Path to TOML config file (default: platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database (overrides config)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Root folder for Suki data (overrides SUKI_ROOT_FOLDER and config)
    #[arg(long)]
    pub root_folder: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Re-evaluate all active rules against the transactions in scope
    Recompute {
        /// Inclusive start date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,

        /// Explicit transaction ids (comma separated); wins over --from/--to
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,

        /// Compute and report statistics without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Scoring worker threads (0 = use the worker_threads setting)
        #[arg(long, default_value_t = 0)]
        workers: usize,

        /// Also export per-transaction signal diagnostics
        #[arg(long)]
        export_signals: bool,
    },
}

/// Build the recompute scope from CLI arguments.
///
/// An explicit id list is the narrower intent and wins over a date range.
pub fn build_scope(
    from: Option<&str>,
    to: Option<&str>,
    ids: &[String],
) -> anyhow::Result<Scope> {
    if !ids.is_empty() {
        let ids: Vec<String> = ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            bail!("--ids given but no usable transaction ids");
        }
        return Ok(Scope::Ids(ids));
    }

    let parse = |label: &str, raw: Option<&str>| -> anyhow::Result<Option<NaiveDate>> {
        raw.map(|r| {
            NaiveDate::parse_from_str(r, "%Y-%m-%d")
                .with_context(|| format!("Invalid {} date '{}', expected YYYY-MM-DD", label, r))
        })
        .transpose()
    };

    let from = parse("--from", from)?;
    let to = parse("--to", to)?;

    if let (Some(lo), Some(hi)) = (from, to) {
        if lo > hi {
            bail!("--from {} is after --to {}", lo, hi);
        }
    }

    if from.is_none() && to.is_none() {
        Ok(Scope::All)
    } else {
        Ok(Scope::DateRange { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filters_is_all() {
        assert_eq!(build_scope(None, None, &[]).unwrap(), Scope::All);
    }

    #[test]
    fn test_date_range() {
        let scope = build_scope(Some("2025-06-01"), Some("2025-06-30"), &[]).unwrap();
        assert_eq!(
            scope,
            Scope::DateRange {
                from: NaiveDate::from_ymd_opt(2025, 6, 1),
                to: NaiveDate::from_ymd_opt(2025, 6, 30),
            }
        );
    }

    #[test]
    fn test_open_ended_range() {
        let scope = build_scope(Some("2025-06-01"), None, &[]).unwrap();
        assert!(matches!(scope, Scope::DateRange { from: Some(_), to: None }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(build_scope(Some("2025-06-30"), Some("2025-06-01"), &[]).is_err());
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(build_scope(Some("06/01/2025"), None, &[]).is_err());
    }

    #[test]
    fn test_ids_win_over_dates() {
        let ids = vec!["t1".to_string(), " t2 ".to_string()];
        let scope = build_scope(Some("2025-06-01"), None, &ids).unwrap();
        assert_eq!(scope, Scope::Ids(vec!["t1".to_string(), "t2".to_string()]));
    }

    #[test]
    fn test_empty_ids_rejected() {
        assert!(build_scope(None, None, &[" ".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_recompute() {
        let cli = Cli::try_parse_from([
            "suki-pe",
            "recompute",
            "--from",
            "2025-06-01",
            "--dry-run",
            "--workers",
            "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Recompute {
                from,
                dry_run,
                workers,
                ..
            } => {
                assert_eq!(from.as_deref(), Some("2025-06-01"));
                assert!(dry_run);
                assert_eq!(workers, 4);
            }
        }
    }
}
