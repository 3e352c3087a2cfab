// ============================================================
// Layer 2 — Stats Use Case
// ============================================================
// Reads the prediction log back:
//
//   summary()    — totals over every logged prediction:
//                  how many passed, how many were at risk (fail),
//                  how many distinct students were seen
//   latest_for() — one student's most recent prediction
//
// Counts are per prediction, so a student predicted twice is
// counted twice in passing / at_risk but once in `students`.

use anyhow::Result;
use serde::Serialize;
use std::{collections::BTreeSet, path::PathBuf};

use crate::domain::record::Outcome;
use crate::infra::prediction_log::{PredictionLog, PredictionLogEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionStats {
    pub total_predictions: usize,
    /// Distinct non-empty student ids in the log
    pub students:          usize,
    pub passing:           usize,
    pub at_risk:           usize,
}

impl PredictionStats {
    pub fn from_entries(entries: &[PredictionLogEntry]) -> Self {
        let passing = entries.iter().filter(|e| e.result.label == Outcome::Pass).count();
        let students: BTreeSet<&str> = entries
            .iter()
            .filter_map(|e| e.student_id.as_deref())
            .collect();

        Self {
            total_predictions: entries.len(),
            students:          students.len(),
            passing,
            at_risk:           entries.len() - passing,
        }
    }
}

pub struct StatsUseCase {
    log: PredictionLog,
}

impl StatsUseCase {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self { log: PredictionLog::new(log_path) }
    }

    pub fn summary(&self) -> Result<PredictionStats> {
        let stats = PredictionStats::from_entries(&self.log.read_all()?);
        tracing::debug!("Prediction stats: {:?}", stats);
        Ok(stats)
    }

    pub fn latest_for(&self, student_id: &str) -> Result<Option<PredictionLogEntry>> {
        self.log.latest_for(student_id)
    }
}
