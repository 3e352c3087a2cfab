// ============================================================
// Layer 3 — Label Schemes and Decision Policies
// ============================================================
// Two label sets and two decision rules exist side by side.
// They are mutually exclusive configurations, not versions of
// one evolving rule, so each is an explicit named variant.
//
// PolicyConfig bundles the pair. The Trainer writes it into the
// artifact and the Predictor reads it back from there, so the
// label encoding used at training time is always the one used
// at inference time.
//
//   LabelScheme::FourLevel  poor=0 average=1 good=2 excellent=3
//   LabelScheme::FiveLevel  poor=0 below-average=1 average=2
//                           good=3 excellent=4
//
//   DecisionPolicy::Strict   attendance < 40 → fail @ 100
//                            pass iff p >= 0.9
//                            confidence = p(pass)
//   DecisionPolicy::Lenient  no floor
//                            pass iff p >= 0.5
//                            confidence = p(chosen label)

use serde::{Deserialize, Serialize};

use crate::domain::record::{Outcome, PredictionResult};

const FOUR_LEVEL: [&str; 4] = ["poor", "average", "good", "excellent"];
const FIVE_LEVEL: [&str; 5] = ["poor", "below-average", "average", "good", "excellent"];

/// Final grade at or above which a student passes (half of the 0–20 scale)
pub const PASS_MARK: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelScheme {
    #[default]
    FourLevel,
    FiveLevel,
}

impl LabelScheme {
    /// Labels in code order: index == performance code
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            LabelScheme::FourLevel => &FOUR_LEVEL,
            LabelScheme::FiveLevel => &FIVE_LEVEL,
        }
    }

    /// Encode a prior-performance label, or None if it is not in this scheme
    pub fn code_of(self, label: &str) -> Option<u32> {
        self.labels()
            .iter()
            .position(|l| *l == label)
            .map(|i| i as u32)
    }

    /// Bootstrap a prior-performance label from a historical final grade.
    ///
    /// Only used at training time, where the genuine prior category is
    /// unknown and the final-grade band stands in for it.
    pub fn band_for_grade(self, final_grade: f64) -> &'static str {
        if final_grade >= 16.0 {
            "excellent"
        } else if final_grade >= 13.0 {
            "good"
        } else if final_grade >= PASS_MARK {
            "average"
        } else if self == LabelScheme::FiveLevel && final_grade >= 8.0 {
            "below-average"
        } else {
            "poor"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecisionPolicy {
    /// Attendance floor, conservative 0.9 bar, confidence = belief in pass
    #[default]
    Strict,
    /// Symmetric 0.5 bar, confidence = belief in the returned label
    Lenient,
}

impl DecisionPolicy {
    const STRICT_THRESHOLD: f64 = 0.9;
    const LENIENT_THRESHOLD: f64 = 0.5;
    const ATTENDANCE_FLOOR: f64 = 40.0;

    pub fn threshold(self) -> f64 {
        match self {
            DecisionPolicy::Strict => Self::STRICT_THRESHOLD,
            DecisionPolicy::Lenient => Self::LENIENT_THRESHOLD,
        }
    }

    /// Attendance below which the model is never consulted
    pub fn attendance_floor(self) -> Option<f64> {
        match self {
            DecisionPolicy::Strict => Some(Self::ATTENDANCE_FLOOR),
            DecisionPolicy::Lenient => None,
        }
    }

    /// The fixed result returned when attendance is below the floor,
    /// or None if this policy has no floor or attendance clears it.
    pub fn short_circuit(self, attendance: f64) -> Option<PredictionResult> {
        match self.attendance_floor() {
            Some(floor) if attendance < floor => Some(PredictionResult {
                label:              Outcome::Fail,
                confidence_percent: 100.0,
            }),
            _ => None,
        }
    }

    /// Turn the model's pass probability into a labelled result.
    pub fn decide(self, proba_pass: f64) -> PredictionResult {
        let label = if proba_pass >= self.threshold() {
            Outcome::Pass
        } else {
            Outcome::Fail
        };

        let backing = match (self, label) {
            (DecisionPolicy::Strict, _)              => proba_pass,
            (DecisionPolicy::Lenient, Outcome::Pass) => proba_pass,
            (DecisionPolicy::Lenient, Outcome::Fail) => 1.0 - proba_pass,
        };

        PredictionResult {
            label,
            confidence_percent: round2(backing * 100.0),
        }
    }
}

/// Label encoding + decision rule, persisted inside the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub label_scheme: LabelScheme,
    pub decision:     DecisionPolicy,
}

impl PolicyConfig {
    pub fn new(label_scheme: LabelScheme, decision: DecisionPolicy) -> Self {
        Self { label_scheme, decision }
    }
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
