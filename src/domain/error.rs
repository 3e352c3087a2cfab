// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the pipeline can report. A predicted "fail" is
// NOT an error; it is a normal PredictionResult. Callers can
// always tell "the student is predicted to fail" apart from
// "the prediction could not be computed".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutcomeError {
    /// Malformed request, unknown label, missing or out-of-range field
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Artifact absent, unreadable, corrupt, or of an unknown format
    #[error("model unavailable at '{path}': {reason}")]
    ModelUnavailable { path: String, reason: String },

    /// Training dataset is missing required columns or has unparsable cells
    #[error("dataset format error: {0}")]
    DataFormat(String),

    /// Only one outcome class is present, so a 2-class fit is undefined
    #[error("degenerate dataset: all {rows} rows are labelled '{present}'")]
    DegenerateDataset { present: String, rows: usize },
}

impl OutcomeError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unavailable(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ModelUnavailable { path: path.into(), reason: reason.to_string() }
    }
}
