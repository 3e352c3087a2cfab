// ============================================================
// Layer 5 — Predictor
// ============================================================
// Applies a loaded TrainedPipeline to one student.
//
//   1. Derive features with the artifact's own LabelScheme
//      (unknown label → InvalidInput)
//   2. Strict policy only: attendance below the floor returns
//      {fail, 100.0} without touching the model
//   3. p = P(pass) from scaler + logistic weights
//   4. The artifact's DecisionPolicy turns p into a result
//
// Stateless: the pipeline is never mutated, so one Predictor
// can be shared freely between threads.

use crate::data::features::FeatureDeriver;
use crate::domain::artifact::TrainedPipeline;
use crate::domain::error::OutcomeError;
use crate::domain::policy::PolicyConfig;
use crate::domain::record::{
    DerivedFeatures, PredictionInput, PredictionRequest, PredictionResult, StudentRecord,
};
use crate::domain::traits::OutcomePredictor;

pub struct Predictor {
    pipeline: TrainedPipeline,
    deriver:  FeatureDeriver,
}

impl Predictor {
    pub fn new(pipeline: TrainedPipeline) -> Self {
        let deriver = FeatureDeriver::new(pipeline.policy.label_scheme);
        Self { pipeline, deriver }
    }

    fn predict_features(&self, features: &DerivedFeatures) -> PredictionResult {
        let decision = self.pipeline.policy.decision;

        if let Some(result) = decision.short_circuit(features.attendance) {
            tracing::debug!(
                "Attendance {} below floor, model not consulted",
                features.attendance
            );
            return result;
        }

        let proba_pass = self.pipeline.proba_pass(features);
        let result     = decision.decide(proba_pass);
        tracing::debug!(
            "p(pass)={:.6} threshold={} → {}",
            proba_pass,
            decision.threshold(),
            result.label.as_str()
        );
        result
    }

    fn request_features(&self, request: &PredictionRequest) -> Result<DerivedFeatures, OutcomeError> {
        request.validate()?;
        self.deriver.from_request(request)
    }

    fn record_features(&self, record: &StudentRecord) -> Result<DerivedFeatures, OutcomeError> {
        record.validate()?;
        self.deriver.derive(record)
    }
}

impl OutcomePredictor for Predictor {
    fn policy(&self) -> PolicyConfig {
        self.pipeline.policy
    }

    fn predict(&self, input: &PredictionInput) -> Result<(DerivedFeatures, PredictionResult), OutcomeError> {
        let features = match input {
            PredictionInput::Features(request) => self.request_features(request)?,
            PredictionInput::Record(record)    => self.record_features(record)?,
        };
        Ok((features, self.predict_features(&features)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::{ClassifierParams, ScalerParams, TrainingProvenance};
    use crate::domain::policy::{round2, DecisionPolicy, LabelScheme};
    use crate::domain::record::Outcome;

    fn pipeline(policy: PolicyConfig) -> TrainedPipeline {
        TrainedPipeline::new(
            policy,
            ScalerParams { mean: [85.0, 11.0, 1.5], scale: [12.0, 3.5, 1.1] },
            ClassifierParams { coefficients: [0.4, 3.1, 1.2], intercept: 1.3 },
            TrainingProvenance { train_rows: 100, eval_rows: 25, split_seed: 42, epochs_run: 500 },
        )
    }

    fn strict() -> Predictor {
        Predictor::new(pipeline(PolicyConfig::new(LabelScheme::FourLevel, DecisionPolicy::Strict)))
    }

    fn lenient() -> Predictor {
        Predictor::new(pipeline(PolicyConfig::new(LabelScheme::FiveLevel, DecisionPolicy::Lenient)))
    }

    fn request(attendance: f64, average_grade: f64, label: &str) -> PredictionRequest {
        PredictionRequest {
            attendance,
            average_grade,
            previous_performance: label.into(),
            student_id:           None,
        }
    }

    fn predict_req(p: &Predictor, req: &PredictionRequest) -> Result<PredictionResult, OutcomeError> {
        p.predict(&PredictionInput::Features(req.clone())).map(|(_, r)| r)
    }

    fn predict_json(p: &Predictor, json: &str) -> Result<PredictionResult, OutcomeError> {
        p.predict(&PredictionInput::from_json(json)?).map(|(_, r)| r)
    }

    #[test]
    fn test_policy_comes_from_pipeline() {
        assert_eq!(strict().policy(), PolicyConfig::new(LabelScheme::FourLevel, DecisionPolicy::Strict));
        assert_eq!(lenient().policy(), PolicyConfig::new(LabelScheme::FiveLevel, DecisionPolicy::Lenient));
    }

    #[test]
    fn test_short_circuit_example() {
        let r = predict_json(&strict(), r#"{"attendance": 10, "average_grade": 18, "previous_performance": "excellent"}"#)
            .unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"result":"fail","confidence":100.0}"#);
    }

    #[test]
    fn test_short_circuit_ignores_grades_and_label() {
        let p = strict();
        for label in ["poor", "average", "good", "excellent"] {
            for grade in [0.0, 10.0, 20.0] {
                let req = request(39.0, grade, label);
                let r = predict_req(&p, &req).unwrap();
                assert_eq!(r, PredictionResult { label: Outcome::Fail, confidence_percent: 100.0 });
            }
        }
    }

    #[test]
    fn test_strict_confidence_is_pass_probability() {
        let p   = strict();
        let req = request(95.0, 15.0, "good");
        let features = p.deriver.from_request(&req).unwrap();
        let proba    = p.pipeline.proba_pass(&features);

        let r = predict_req(&p, &req).unwrap();
        assert_eq!(r.confidence_percent, round2(proba * 100.0));
        assert_eq!(r.label == Outcome::Pass, proba >= 0.9);
    }

    #[test]
    fn test_strict_fail_still_reports_pass_probability() {
        let p   = strict();
        let req = request(60.0, 9.0, "poor");
        let features = p.deriver.from_request(&req).unwrap();
        let proba    = p.pipeline.proba_pass(&features);
        assert!(proba < 0.9);

        let r = predict_req(&p, &req).unwrap();
        assert_eq!(r.label, Outcome::Fail);
        assert_eq!(r.confidence_percent, round2(proba * 100.0));
    }

    #[test]
    fn test_lenient_never_short_circuits() {
        let req = request(5.0, 19.0, "excellent");
        let r = predict_req(&lenient(), &req).unwrap();
        assert_eq!(r.label, Outcome::Pass);
    }

    #[test]
    fn test_lenient_confidence_floor() {
        let p = lenient();
        for att in [0.0, 25.0, 50.0, 75.0, 100.0] {
            for grade in [0.0, 5.0, 10.0, 15.0, 20.0] {
                for label in LabelScheme::FiveLevel.labels() {
                    let req = request(att, grade, label);
                    let r = predict_req(&p, &req).unwrap();
                    assert!(r.confidence_percent >= 50.0, "{req:?} → {r:?}");
                }
            }
        }
    }

    #[test]
    fn test_label_scheme_comes_from_artifact() {
        // "below-average" exists only in the five-level scheme
        let json = r#"{"attendance": 80, "average_grade": 9, "previous_performance": "below-average"}"#;
        assert!(matches!(predict_json(&strict(), json), Err(OutcomeError::InvalidInput(_))));
        assert!(predict_json(&lenient(), json).is_ok());
    }

    #[test]
    fn test_unknown_label_is_invalid_input() {
        let json = r#"{"attendance": 95, "average_grade": 15, "previous_performance": "terrible"}"#;
        assert!(matches!(predict_json(&strict(), json), Err(OutcomeError::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_requests() {
        let p = strict();
        for bad in [
            "not json",
            "[1, 2, 3]",
            r#"{"attendance": 95, "average_grade": 15}"#,
            r#"{"attendance": "high", "average_grade": 15, "previous_performance": "good"}"#,
            r#"{"attendance": 95, "average_grade": 15, "previous_performance": "good", "extra": 1}"#,
            r#"{"attendance": -5, "average_grade": 15, "previous_performance": "good"}"#,
        ] {
            assert!(
                matches!(predict_json(&p, bad), Err(OutcomeError::InvalidInput(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_raw_record_goes_through_deriver() {
        let p = strict();
        let from_record = predict_json(&p, r#"{"grades": [14, 15, 16], "absences": 5, "previous_performance": "good"}"#)
            .unwrap();
        let from_request = predict_json(&p, r#"{"attendance": 95, "average_grade": 15, "previous_performance": "good"}"#)
            .unwrap();
        assert_eq!(from_record, from_request);
    }

    #[test]
    fn test_raw_record_with_heavy_absence_short_circuits() {
        let r = predict_json(&strict(), r#"{"grades": [18, 18, 18], "absences": 75, "previous_performance": "excellent"}"#)
            .unwrap();
        assert_eq!(r, PredictionResult { label: Outcome::Fail, confidence_percent: 100.0 });
    }
}
