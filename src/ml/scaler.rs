// ============================================================
// Layer 5 — Standard Scaler
// ============================================================
// Zero-mean, unit-variance scaling fitted on the TRAINING
// partition only. Uses the population standard deviation;
// a constant column keeps scale 1.0 so it passes through
// centred rather than dividing by zero.

use crate::data::dataset::LabelledSample;
use crate::domain::artifact::ScalerParams;
use crate::domain::error::OutcomeError;
use crate::domain::record::FEATURE_COUNT;

pub fn fit_scaler(samples: &[LabelledSample]) -> Result<ScalerParams, OutcomeError> {
    if samples.is_empty() {
        return Err(OutcomeError::DataFormat("cannot fit scaler on zero rows".into()));
    }
    let n = samples.len() as f64;

    let mut mean = [0.0; FEATURE_COUNT];
    for s in samples {
        for (m, x) in mean.iter_mut().zip(s.features) {
            *m += x;
        }
    }
    mean.iter_mut().for_each(|m| *m /= n);

    let mut var = [0.0; FEATURE_COUNT];
    for s in samples {
        for i in 0..FEATURE_COUNT {
            let d = s.features[i] - mean[i];
            var[i] += d * d;
        }
    }

    let mut scale = [1.0; FEATURE_COUNT];
    for i in 0..FEATURE_COUNT {
        let std = (var[i] / n).sqrt();
        if std > f64::EPSILON {
            scale[i] = std;
        }
    }

    Ok(ScalerParams { mean, scale })
}

/// Apply a fitted scaler to every sample, keeping labels.
pub fn scale_samples(params: &ScalerParams, samples: &[LabelledSample]) -> Vec<LabelledSample> {
    samples
        .iter()
        .map(|s| LabelledSample { features: params.transform(&s.features), label: s.label })
        .collect()
}
