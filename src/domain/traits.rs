// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between layers. The application layer talks to
// these traits; Layers 4–6 provide the implementations:
//
//   DatasetSource    ← CsvDatasetLoader   (data/loader.rs)
//   ModelStore       ← ArtifactStore      (infra/artifact_store.rs)
//   OutcomePredictor ← Predictor          (ml/predictor.rs)

use crate::domain::artifact::TrainedPipeline;
use crate::domain::error::OutcomeError;
use crate::domain::policy::PolicyConfig;
use crate::domain::record::{DerivedFeatures, HistoricalRecord, PredictionInput, PredictionResult};

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can supply historical rows for training.
pub trait DatasetSource {
    /// Load every row, or fail with DataFormat if the source is unusable.
    fn load_rows(&self) -> Result<Vec<HistoricalRecord>, OutcomeError>;
}

// ─── ModelStore ───────────────────────────────────────────────────────────────
/// Persists and restores the trained artifact as one unit.
pub trait ModelStore {
    /// Replace any existing artifact wholesale. Never leaves a partial file.
    fn save(&self, pipeline: &TrainedPipeline) -> anyhow::Result<()>;

    /// Fails with ModelUnavailable if absent or corrupt.
    fn load(&self) -> Result<TrainedPipeline, OutcomeError>;
}

// ─── OutcomePredictor ─────────────────────────────────────────────────────────
/// Stateless pass/fail prediction for a single student.
pub trait OutcomePredictor {
    /// The label scheme and decision rule in force
    fn policy(&self) -> PolicyConfig;

    /// Validate and derive features from either request shape, then
    /// predict. The derived features are returned for logging.
    fn predict(&self, input: &PredictionInput) -> Result<(DerivedFeatures, PredictionResult), OutcomeError>;
}
