// ============================================================
// Layer 4 — Feature Deriver
// ============================================================
// Turns raw record fields into the three model inputs:
//
//   attendance       = clamp(100 - absences, 0, 100)
//   average_grade    = mean of the 3 period grades (no rounding)
//   performance_code = label → code under the active LabelScheme
//
// The SAME deriver runs at training time (on bootstrapped
// labels) and at inference time (on caller-supplied labels).
// The only failure is a label outside the active scheme.

use crate::domain::error::OutcomeError;
use crate::domain::policy::LabelScheme;
use crate::domain::record::{DerivedFeatures, PredictionRequest, StudentRecord};

pub fn attendance_from_absences(absences: u32) -> f64 {
    (100.0 - absences as f64).clamp(0.0, 100.0)
}

pub fn average_grade(grades: &[f64; 3]) -> f64 {
    grades.iter().sum::<f64>() / grades.len() as f64
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureDeriver {
    scheme: LabelScheme,
}

impl FeatureDeriver {
    pub fn new(scheme: LabelScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> LabelScheme {
        self.scheme
    }

    pub fn encode(&self, label: &str) -> Result<u32, OutcomeError> {
        self.scheme.code_of(label).ok_or_else(|| {
            OutcomeError::invalid(format!(
                "unknown previous_performance '{label}', expected one of {:?}",
                self.scheme.labels()
            ))
        })
    }

    /// Derive features from a raw record.
    pub fn derive(&self, record: &StudentRecord) -> Result<DerivedFeatures, OutcomeError> {
        Ok(DerivedFeatures {
            attendance:       attendance_from_absences(record.absences),
            average_grade:    average_grade(&record.grades),
            performance_code: self.encode(&record.prior_performance)?,
        })
    }

    /// Attendance and average grade arrive precomputed; only the label is encoded.
    pub fn from_request(&self, request: &PredictionRequest) -> Result<DerivedFeatures, OutcomeError> {
        Ok(DerivedFeatures {
            attendance:       request.attendance,
            average_grade:    request.average_grade,
            performance_code: self.encode(&request.previous_performance)?,
        })
    }
}
