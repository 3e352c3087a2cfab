// ============================================================
// Layer 6 — Prediction Log
// ============================================================
// Optional audit trail: one JSON object per line for every
// prediction that succeeded. Failed predictions are never logged,
// so the log only ever contains real pass/fail results.
//
// The log is append-only; file order is prediction order. It is
// read back for a student's latest prediction and for the
// pass / at-risk counts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::PathBuf,
};

use crate::domain::record::{DerivedFeatures, PredictionResult};
use crate::infra::clock::unix_now;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    pub timestamp:        u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id:       Option<String>,
    pub attendance:       f64,
    pub average_grade:    f64,
    pub performance_code: u32,
    #[serde(flatten)]
    pub result:           PredictionResult,
}

pub struct PredictionLog {
    path: PathBuf,
}

impl PredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(
        &self,
        student_id: Option<&str>,
        features:   &DerivedFeatures,
        result:     &PredictionResult,
    ) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let entry = PredictionLogEntry {
            timestamp:        unix_now(),
            student_id:       student_id.map(str::to_string),
            attendance:       features.attendance,
            average_grade:    features.average_grade,
            performance_code: features.performance_code,
            result:           *result,
        };

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Cannot open prediction log '{}'", self.path.display()))?;
        writeln!(f, "{}", serde_json::to_string(&entry)?)?;
        Ok(())
    }

    /// Every entry in file order. A log that does not exist yet is empty.
    pub fn read_all(&self) -> Result<Vec<PredictionLogEntry>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Cannot read prediction log '{}'", self.path.display())
                })
            }
        };

        text.lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| {
                serde_json::from_str::<PredictionLogEntry>(l).with_context(|| {
                    format!("{}: line {} is not a log entry", self.path.display(), i + 1)
                })
            })
            .collect()
    }

    /// The most recently appended entry for `student_id`, if any
    pub fn latest_for(&self, student_id: &str) -> Result<Option<PredictionLogEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .rev()
            .find(|e| e.student_id.as_deref() == Some(student_id)))
    }
}
