//! Recompute run statistics
//!
//! Aggregated per run for the exit report and persisted as JSON on the run's
//! audit row.

use crate::models::Inference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed confidence histogram buckets
const HISTOGRAM_LABELS: [&str; 6] = [
    "<0.50",
    "0.50-0.59",
    "0.60-0.69",
    "0.70-0.79",
    "0.80-0.89",
    "0.90-1.00",
];

/// Confidence distribution over fixed buckets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceHistogram {
    buckets: [usize; 6],
}

impl ConfidenceHistogram {
    pub fn record(&mut self, confidence: f64) {
        let idx = if confidence < 0.50 {
            0
        } else if confidence < 0.60 {
            1
        } else if confidence < 0.70 {
            2
        } else if confidence < 0.80 {
            3
        } else if confidence < 0.90 {
            4
        } else {
            5
        };
        self.buckets[idx] += 1;
    }

    pub fn buckets(&self) -> &[usize; 6] {
        &self.buckets
    }

    pub fn display_string(&self) -> String {
        HISTOGRAM_LABELS
            .iter()
            .zip(self.buckets.iter())
            .map(|(label, count)| format!("{}: {}", label, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Exit/report contract for one recompute run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub scope: String,
    pub dry_run: bool,
    /// Valid rules in the snapshot
    pub rules_active: usize,
    /// Rules rejected by validation at load time
    pub rules_rejected: usize,
    /// Transactions considered (fetched and scored)
    pub considered: usize,
    /// Input rows skipped before scoring (unparseable)
    pub skipped_inputs: usize,
    pub resolved: usize,
    pub explicit_overrides: usize,
    pub fallback_assigned: usize,
    pub unresolved: usize,
    pub write_errors: usize,
    pub per_role: BTreeMap<String, usize>,
    pub histogram: ConfidenceHistogram,
}

impl RunReport {
    pub fn new(run_id: String, scope: String, dry_run: bool) -> Self {
        Self {
            run_id,
            scope,
            dry_run,
            ..Default::default()
        }
    }

    /// Record one resolved transaction
    pub fn record_resolution(&mut self, inference: &Inference) {
        self.resolved += 1;
        match inference.rule_source.as_str() {
            "explicit" => self.explicit_overrides += 1,
            "fallback" => self.fallback_assigned += 1,
            _ => {}
        }
        *self.per_role.entry(inference.role.clone()).or_insert(0) += 1;
        self.histogram.record(inference.confidence);
    }

    /// Record one transaction no rule matched
    pub fn record_unresolved(&mut self) {
        self.unresolved += 1;
    }

    /// Share of considered transactions that resolved
    pub fn coverage_percent(&self) -> f64 {
        if self.considered == 0 {
            0.0
        } else {
            self.resolved as f64 / self.considered as f64 * 100.0
        }
    }

    /// Human-readable report lines
    pub fn display_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Run {} ({}){}",
                self.run_id,
                self.scope,
                if self.dry_run { " [dry-run]" } else { "" }
            ),
            format!(
                "Rules: {} active, {} rejected",
                self.rules_active, self.rules_rejected
            ),
            format!(
                "Transactions: {} considered, {} resolved ({:.1}% coverage), {} unresolved",
                self.considered,
                self.resolved,
                self.coverage_percent(),
                self.unresolved
            ),
            format!(
                "Overrides: {} explicit, {} fallback",
                self.explicit_overrides, self.fallback_assigned
            ),
            format!("Confidence: {}", self.histogram.display_string()),
        ];

        if !self.per_role.is_empty() {
            let roles = self
                .per_role
                .iter()
                .map(|(role, count)| format!("{}: {}", role, count))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("Roles: {}", roles));
        }

        if self.skipped_inputs > 0 {
            lines.push(format!("Skipped inputs: {}", self.skipped_inputs));
        }
        if self.write_errors > 0 {
            lines.push(format!("Write errors: {}", self.write_errors));
        }

        lines
    }
}
