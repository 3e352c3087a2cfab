// ============================================================
// Layer 3 — Student Record Types
// ============================================================
// The data that flows through the pipeline:
//
//   StudentRecord      raw fields: 3 period grades, absences,
//                      prior-performance label
//   PredictionRequest  features already computed by the caller:
//                      attendance, average grade, label
//   DerivedFeatures    the three numeric model inputs
//   PredictionResult   pass/fail + confidence percent
//
// Both request shapes may carry an optional `student_id`; it
// never affects the prediction, only the log entry.
//
// Request types reject unknown fields so a typo in a field
// name surfaces as InvalidInput instead of a silent default.

use serde::{Deserialize, Serialize};

use crate::domain::error::OutcomeError;

/// Number of model inputs: attendance, average grade, performance code
pub const FEATURE_COUNT: usize = 3;

/// Upper bound of the observed grade scale
pub const MAX_GRADE: f64 = 20.0;

/// A raw per-student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentRecord {
    /// Three period grades, in period order
    pub grades: [f64; 3],

    /// Count of absences
    pub absences: u32,

    /// Prior-performance category, e.g. "good"
    #[serde(rename = "previous_performance")]
    pub prior_performance: String,

    /// Caller's identifier, carried into the prediction log
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl StudentRecord {
    pub fn new(grades: [f64; 3], absences: u32, prior_performance: impl Into<String>) -> Self {
        Self { grades, absences, prior_performance: prior_performance.into(), student_id: None }
    }

    pub fn validate(&self) -> Result<(), OutcomeError> {
        for (i, g) in self.grades.iter().enumerate() {
            check_range(&format!("grades[{i}]"), *g, MAX_GRADE)?;
        }
        check_student_id(self.student_id.as_deref())
    }
}

/// One row of historical training data. The third period grade
/// doubles as the final grade that decides pass/fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalRecord {
    pub grades:   [f64; 3],
    pub absences: u32,
}

impl HistoricalRecord {
    pub fn final_grade(&self) -> f64 {
        self.grades[2]
    }
}

/// A prediction request whose numeric features were computed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRequest {
    pub attendance:           f64,
    pub average_grade:        f64,
    pub previous_performance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id:           Option<String>,
}

impl PredictionRequest {
    pub fn validate(&self) -> Result<(), OutcomeError> {
        check_range("attendance", self.attendance, 100.0)?;
        check_range("average_grade", self.average_grade, MAX_GRADE)?;
        check_student_id(self.student_id.as_deref())
    }
}

/// Either accepted request shape. A body carrying `grades` is a raw
/// StudentRecord; anything else must be a PredictionRequest.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionInput {
    Features(PredictionRequest),
    Record(StudentRecord),
}

impl PredictionInput {
    pub fn from_json(text: &str) -> Result<Self, OutcomeError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| OutcomeError::invalid(format!("malformed JSON: {e}")))?;

        let parsed = if value.get("grades").is_some() {
            serde_json::from_value(value).map(PredictionInput::Record)
        } else {
            serde_json::from_value(value).map(PredictionInput::Features)
        };
        parsed.map_err(|e| OutcomeError::invalid(e.to_string()))
    }

    pub fn student_id(&self) -> Option<&str> {
        match self {
            PredictionInput::Features(r) => r.student_id.as_deref(),
            PredictionInput::Record(r)   => r.student_id.as_deref(),
        }
    }
}

fn check_student_id(id: Option<&str>) -> Result<(), OutcomeError> {
    match id {
        Some(id) if id.trim().is_empty() => Err(OutcomeError::invalid("'student_id' must not be blank")),
        _ => Ok(()),
    }
}

fn check_range(field: &str, value: f64, max: f64) -> Result<(), OutcomeError> {
    if !value.is_finite() {
        return Err(OutcomeError::invalid(format!("'{field}' must be a finite number")));
    }
    if !(0.0..=max).contains(&value) {
        return Err(OutcomeError::invalid(format!(
            "'{field}' = {value} is outside [0, {max}]"
        )));
    }
    Ok(())
}

/// The three model inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedFeatures {
    /// Always in [0, 100]
    pub attendance:       f64,
    pub average_grade:    f64,
    pub performance_code: u32,
}

impl DerivedFeatures {
    /// Feature vector in the column order the model was fitted on
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [self.attendance, self.average_grade, self.performance_code as f64]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn from_label(label: u8) -> Self {
        if label == 1 { Outcome::Pass } else { Outcome::Fail }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
        }
    }
}

/// Serialises as `{"result": "pass"|"fail", "confidence": <number>}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "result")]
    pub label: Outcome,

    /// In [0, 100], rounded to 2 decimals
    #[serde(rename = "confidence")]
    pub confidence_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_wire_shape() {
        let r: PredictionRequest = serde_json::from_str(
            r#"{"attendance": 95, "average_grade": 15, "previous_performance": "good"}"#,
        ).unwrap();
        assert_eq!(r.attendance, 95.0);
        assert_eq!(r.average_grade, 15.0);
        assert_eq!(r.previous_performance, "good");
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_unknown_field() {
        let r: Result<PredictionRequest, _> = serde_json::from_str(
            r#"{"attendance": 95, "average_grade": 15, "previous_performance": "good", "age": 17}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn test_request_rejects_missing_field() {
        let r: Result<PredictionRequest, _> =
            serde_json::from_str(r#"{"attendance": 95, "previous_performance": "good"}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_out_of_range_attendance() {
        let r = PredictionRequest {
            attendance:           120.0,
            average_grade:        10.0,
            previous_performance: "good".into(),
            student_id:           None,
        };
        assert!(matches!(r.validate(), Err(OutcomeError::InvalidInput(_))));
    }

    #[test]
    fn test_record_grade_range() {
        let ok = StudentRecord::new([10.0, 12.0, 14.0], 3, "good");
        assert!(ok.validate().is_ok());
        let bad = StudentRecord::new([10.0, 21.0, 14.0], 3, "good");
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_result_wire_shape() {
        let r = PredictionResult { label: Outcome::Fail, confidence_percent: 100.0 };
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"result":"fail","confidence":100.0}"#
        );
        let r = PredictionResult { label: Outcome::Pass, confidence_percent: 93.0 };
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"result":"pass","confidence":93.0}"#
        );
    }

    #[test]
    fn test_input_shape_dispatch() {
        let f = PredictionInput::from_json(
            r#"{"attendance": 80, "average_grade": 12, "previous_performance": "average"}"#,
        ).unwrap();
        assert!(matches!(f, PredictionInput::Features(_)));

        let r = PredictionInput::from_json(
            r#"{"grades": [10, 12, 14], "absences": 3, "previous_performance": "average"}"#,
        ).unwrap();
        assert_eq!(
            r,
            PredictionInput::Record(StudentRecord::new([10.0, 12.0, 14.0], 3, "average"))
        );
    }

    #[test]
    fn test_student_id_is_optional_on_both_shapes() {
        let f = PredictionInput::from_json(
            r#"{"attendance": 80, "average_grade": 12, "previous_performance": "average", "student_id": "s-17"}"#,
        ).unwrap();
        assert_eq!(f.student_id(), Some("s-17"));

        let r = PredictionInput::from_json(
            r#"{"grades": [10, 12, 14], "absences": 3, "previous_performance": "average", "student_id": "42"}"#,
        ).unwrap();
        assert_eq!(r.student_id(), Some("42"));

        let anon = PredictionInput::from_json(
            r#"{"attendance": 80, "average_grade": 12, "previous_performance": "average"}"#,
        ).unwrap();
        assert_eq!(anon.student_id(), None);
    }

    #[test]
    fn test_blank_student_id_rejected() {
        let r = PredictionRequest {
            attendance:           80.0,
            average_grade:        12.0,
            previous_performance: "good".into(),
            student_id:           Some("  ".into()),
        };
        assert!(matches!(r.validate(), Err(OutcomeError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_absences_rejected() {
        let r = PredictionInput::from_json(
            r#"{"grades": [10, 12, 14], "absences": -3, "previous_performance": "average"}"#,
        );
        assert!(matches!(r, Err(OutcomeError::InvalidInput(_))));
    }

    #[test]
    fn test_feature_order() {
        let f = DerivedFeatures { attendance: 90.0, average_grade: 12.5, performance_code: 2 };
        assert_eq!(f.to_array(), [90.0, 12.5, 2.0]);
    }
}
