// ============================================================
// Layer 3 — Trained Pipeline Artifact
// ============================================================
// The fitted (scaler, classifier) pair plus the PolicyConfig it
// was trained under. Created once by the Trainer, read-only
// afterwards; retraining produces a whole new artifact.
//
// Inference here is plain f64 arithmetic so a loaded artifact
// produces bit-identical probabilities to the one that was saved:
//
//   z = Σ coef[i] * (x[i] - mean[i]) / scale[i] + intercept
//   p = 1 / (1 + e^-z)

use serde::{Deserialize, Serialize};

use crate::domain::policy::PolicyConfig;
use crate::domain::record::{DerivedFeatures, FEATURE_COUNT};

/// Bumped whenever the persisted layout changes incompatibly
pub const FORMAT_VERSION: u32 = 1;

/// Per-feature standardisation fitted on the training partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean:  [f64; FEATURE_COUNT],
    /// Standard deviation; 1.0 for constant features
    pub scale: [f64; FEATURE_COUNT],
}

impl ScalerParams {
    pub fn transform(&self, x: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (x[i] - self.mean[i]) / self.scale[i];
        }
        out
    }
}

/// Logistic-regression weights over scaled features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept:    f64,
}

impl ClassifierParams {
    pub fn decision_function(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    pub fn proba_pass(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        sigmoid(self.decision_function(scaled))
    }
}

/// Where the artifact came from. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProvenance {
    pub train_rows: usize,
    pub eval_rows:  usize,
    pub split_seed: u64,
    pub epochs_run: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedPipeline {
    pub format_version: u32,
    pub policy:         PolicyConfig,
    pub scaler:         ScalerParams,
    pub classifier:     ClassifierParams,
    pub provenance:     TrainingProvenance,
}

impl TrainedPipeline {
    pub fn new(
        policy:     PolicyConfig,
        scaler:     ScalerParams,
        classifier: ClassifierParams,
        provenance: TrainingProvenance,
    ) -> Self {
        Self { format_version: FORMAT_VERSION, policy, scaler, classifier, provenance }
    }

    /// The classifier's probability of the positive ("pass") class
    pub fn proba_pass(&self, features: &DerivedFeatures) -> f64 {
        let scaled = self.scaler.transform(&features.to_array());
        self.classifier.proba_pass(&scaled)
    }
}

/// Logistic function, split by sign so neither branch overflows
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
