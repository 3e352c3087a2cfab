// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Advisory only: nothing downstream consumes these numbers.
//
// ClassificationReport holds per-class precision, recall, F1
// and support for the held-out evaluation partition, plus
// accuracy and the macro average. It renders as a text table
// for the terminal, and MetricsLogger appends it to a CSV file
// so successive training runs can be compared.
//
// Output file: <metrics_dir>/metrics.csv
//
// Example CSV output:
//   run,class,precision,recall,f1,support
//   1760000000,fail,0.880000,0.846154,0.862745,26
//   1760000000,pass,0.961538,0.971154,0.966330,104

use anyhow::Result;
use std::{
    fmt::Write as _,
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::domain::record::Outcome;

/// Scores for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class:     String,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Index 0 = fail, 1 = pass
    pub classes:  [ClassMetrics; 2],
    pub accuracy: f64,
    pub total:    usize,
}

impl ClassificationReport {
    /// Compare true and predicted 0/1 labels of equal length.
    /// Undefined ratios (zero denominators) are reported as 0.0.
    pub fn compute(y_true: &[u8], y_pred: &[u8]) -> Self {
        debug_assert_eq!(y_true.len(), y_pred.len());

        let per_class = |class: u8| {
            let tp = y_true.iter().zip(y_pred).filter(|(t, p)| **t == class && **p == class).count();
            let predicted = y_pred.iter().filter(|p| **p == class).count();
            let support   = y_true.iter().filter(|t| **t == class).count();

            let precision = ratio(tp, predicted);
            let recall    = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                class: Outcome::from_label(class).as_str().to_string(),
                precision,
                recall,
                f1,
                support,
            }
        };

        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();

        Self {
            classes:  [per_class(0), per_class(1)],
            accuracy: ratio(correct, y_true.len()),
            total:    y_true.len(),
        }
    }

    /// Unweighted mean over both classes: (precision, recall, f1)
    pub fn macro_avg(&self) -> (f64, f64, f64) {
        let n = self.classes.len() as f64;
        (
            self.classes.iter().map(|c| c.precision).sum::<f64>() / n,
            self.classes.iter().map(|c| c.recall).sum::<f64>() / n,
            self.classes.iter().map(|c| c.f1).sum::<f64>() / n,
        )
    }

    /// Plain-text table for the terminal.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:>12} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support");
        let _ = writeln!(out);
        for c in &self.classes {
            let _ = writeln!(
                out,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                c.class, c.precision, c.recall, c.f1, c.support
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{:>12} {:>10} {:>10} {:>10.2} {:>10}", "accuracy", "", "", self.accuracy, self.total);
        let (p, r, f) = self.macro_avg();
        let _ = writeln!(out, "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}", "macro avg", p, r, f, self.total);
        out
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Appends evaluation reports to a CSV file for later comparison.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a new file, so runs accumulate
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "run,class,precision,recall,f1,support")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one row per class, tagged with `run`.
    pub fn log(&self, run: u64, report: &ClassificationReport) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        for c in &report.classes {
            writeln!(
                f,
                "{},{},{:.6},{:.6},{:.6},{}",
                run, c.class, c.precision, c.recall, c.f1, c.support,
            )?;
        }

        tracing::debug!("Logged run {} metrics: accuracy={:.4}", run, report.accuracy);
        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
