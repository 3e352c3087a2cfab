// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the artifact once, then answers prediction requests:
//
//   1. ArtifactStore::load      (ModelUnavailable on failure)
//   2. Parse request JSON       (InvalidInput on failure)
//   3. OutcomePredictor         (Layer 5)
//   4. Optional audit log line  (Layer 6)
//
// Errors from steps 1–3 are OutcomeError values inside the
// anyhow chain (`downcast_ref` recovers them), kept distinct
// from a legitimate "fail" prediction.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::error::OutcomeError;
use crate::domain::policy::PolicyConfig;
use crate::domain::record::{PredictionInput, PredictionResult};
use crate::domain::traits::{ModelStore, OutcomePredictor};
use crate::infra::{artifact_store::ArtifactStore, prediction_log::PredictionLog};
use crate::ml::predictor::Predictor;

pub struct PredictUseCase {
    predictor: Box<dyn OutcomePredictor>,
    log:       Option<PredictionLog>,
}

impl PredictUseCase {
    /// Load the artifact at `artifact_path`.
    pub fn new(artifact_path: impl Into<PathBuf>) -> Result<Self, OutcomeError> {
        Self::from_store(&ArtifactStore::new(artifact_path))
    }

    pub fn from_store(store: &dyn ModelStore) -> Result<Self, OutcomeError> {
        let pipeline = store.load()?;
        let rows     = pipeline.provenance.train_rows;
        let use_case = Self { predictor: Box::new(Predictor::new(pipeline)), log: None };

        let policy = use_case.policy();
        tracing::info!(
            "Loaded pipeline: {:?} / {:?}, trained on {} rows",
            policy.label_scheme,
            policy.decision,
            rows,
        );
        Ok(use_case)
    }

    /// Append every successful prediction to `path` as a JSON line.
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = Some(PredictionLog::new(path));
        self
    }

    pub fn policy(&self) -> PolicyConfig {
        self.predictor.policy()
    }

    /// Predict one JSON request.
    pub fn predict_json(&self, json: &str) -> Result<PredictionResult> {
        let input              = PredictionInput::from_json(json)?;
        let (features, result) = self.predictor.predict(&input)?;

        if let Some(log) = &self.log {
            log.append(input.student_id(), &features, &result)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::{ClassifierParams, ScalerParams, TrainedPipeline, TrainingProvenance};
    use crate::domain::record::Outcome;

    fn save_pipeline(path: &std::path::Path) {
        let pipeline = TrainedPipeline::new(
            PolicyConfig::default(),
            ScalerParams { mean: [90.0, 11.0, 1.5], scale: [8.0, 3.0, 1.1] },
            ClassifierParams { coefficients: [0.3, 2.5, 1.8], intercept: 1.0 },
            TrainingProvenance { train_rows: 80, eval_rows: 20, split_seed: 42, epochs_run: 300 },
        );
        ArtifactStore::new(path).save(&pipeline).unwrap();
    }

    #[test]
    fn test_missing_artifact_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = PredictUseCase::new(dir.path().join("nope.json")).err().unwrap();
        assert!(matches!(err, OutcomeError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_fail_prediction_is_not_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_pipeline(&path);

        let uc = PredictUseCase::new(&path).unwrap();
        assert_eq!(uc.policy(), PolicyConfig::default());
        let r  = uc
            .predict_json(r#"{"attendance": 10, "average_grade": 18, "previous_performance": "excellent"}"#)
            .unwrap();
        assert_eq!(r.label, Outcome::Fail);
        assert_eq!(r.confidence_percent, 100.0);
    }

    #[test]
    fn test_invalid_input_survives_as_outcome_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_pipeline(&path);

        let uc  = PredictUseCase::new(&path).unwrap();
        let err = uc
            .predict_json(r#"{"attendance": 95, "average_grade": 15, "previous_performance": "terrible"}"#)
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<OutcomeError>(), Some(OutcomeError::InvalidInput(_))));

        let err = uc.predict_json("{").unwrap_err();
        assert!(matches!(err.downcast_ref::<OutcomeError>(), Some(OutcomeError::InvalidInput(_))));
    }

    #[test]
    fn test_log_records_only_successes_with_student_id() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let log  = dir.path().join("predictions.jsonl");
        save_pipeline(&path);

        let uc = PredictUseCase::new(&path).unwrap().with_log(&log);
        uc.predict_json(r#"{"attendance": 95, "average_grade": 15, "previous_performance": "good", "student_id": "s-9"}"#)
            .unwrap();
        assert!(uc.predict_json(r#"{"attendance": 95, "average_grade": 15}"#).is_err());

        let entries = PredictionLog::new(&log).read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].student_id.as_deref(), Some("s-9"));
        assert_eq!(entries[0].performance_code, 2);
    }

    #[test]
    fn test_same_answer_across_reloads() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        save_pipeline(&path);

        let json = r#"{"attendance": 91, "average_grade": 12.333, "previous_performance": "average"}"#;
        let a = PredictUseCase::new(&path).unwrap().predict_json(json).unwrap();
        let b = PredictUseCase::new(&path).unwrap().predict_json(json).unwrap();
        assert_eq!(a.confidence_percent.to_bits(), b.confidence_percent.to_bits());
        assert_eq!(a.label, b.label);
    }
}
