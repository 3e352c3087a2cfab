// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full-batch fit of the logistic model with Burn's Adam.
//
//   - Training uses TrainBackend (Autodiff<NdArray<f64>>) for gradients
//   - model.valid() drops autodiff before the weights are read out
//   - Stops at max_epochs, or once the loss moves by less than
//     `tolerance` between two epochs
//
// The returned ClassifierParams are plain f64 and carry no Burn types.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::data::{batcher::FeatureBatcher, dataset::LabelledSample};
use crate::domain::artifact::ClassifierParams;
use crate::ml::model::{LogisticModel, LogisticModelConfig};

type TrainBackend = Autodiff<NdArray<f64>>;

/// Optimiser settings for one fit.
#[derive(Debug, Clone, Copy)]
pub struct FitSettings {
    pub max_epochs: usize,
    pub lr:         f64,
    pub l2:         f64,
    pub tolerance:  f64,
}

#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub classifier: ClassifierParams,
    pub epochs_run: usize,
    pub final_loss: f64,
}

/// Fit on already-scaled samples.
pub fn fit_classifier(train: &[LabelledSample], settings: &FitSettings) -> Result<FitOutcome> {
    if train.is_empty() {
        bail!("Cannot fit a classifier on zero rows");
    }

    let device = NdArrayDevice::default();
    let batch  = FeatureBatcher::<TrainBackend>::new().batch(train.to_vec(), &device);

    let mut model: LogisticModel<TrainBackend> = LogisticModelConfig::new().init(&device);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().with_epsilon(1e-8).init();

    let mut prev_loss  = f64::INFINITY;
    let mut final_loss = f64::NAN;
    let mut epochs_run = 0usize;

    for epoch in 1..=settings.max_epochs {
        let loss = model.forward_loss(&batch, settings.l2);
        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

        if !loss_val.is_finite() {
            bail!("Loss diverged at epoch {epoch} (lr={})", settings.lr);
        }

        // Backward pass + Adam update
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(settings.lr, model, grads);

        epochs_run = epoch;
        final_loss = loss_val;

        if epoch % 100 == 0 {
            tracing::debug!("Epoch {:>5} | loss={:.8}", epoch, loss_val);
        }

        if (prev_loss - loss_val).abs() < settings.tolerance {
            tracing::debug!("Converged after {} epochs", epoch);
            break;
        }
        prev_loss = loss_val;
    }

    let classifier = model.valid().to_params()?;
    tracing::info!(
        "Fit finished: {} epochs, loss={:.6}, coefficients={:?}, intercept={:.6}",
        epochs_run, final_loss, classifier.coefficients, classifier.intercept,
    );

    Ok(FitOutcome { classifier, epochs_run, final_loss })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::sigmoid;

    fn settings() -> FitSettings {
        FitSettings { max_epochs: 2000, lr: 0.05, l2: 1.0, tolerance: 1e-10 }
    }

    /// Scaled-looking data where the second feature decides the class.
    fn separable() -> Vec<LabelledSample> {
        (0..40)
            .map(|i| {
                let x = (i as f64 - 19.5) / 10.0;
                LabelledSample { features: [0.1 * x, x, 0.5 * x], label: u8::from(x > 0.0) }
            })
            .collect()
    }

    #[test]
    fn test_fit_learns_direction() {
        let out = fit_classifier(&separable(), &settings()).unwrap();
        let c = &out.classifier;
        assert!(c.coefficients[1] > 0.0, "{c:?}");

        let hi = c.decision_function(&[0.2, 2.0, 1.0]);
        let lo = c.decision_function(&[-0.2, -2.0, -1.0]);
        assert!(sigmoid(hi) > 0.9, "p(hi) = {}", sigmoid(hi));
        assert!(sigmoid(lo) < 0.1, "p(lo) = {}", sigmoid(lo));
        assert!(out.epochs_run >= 1);
        assert!(out.final_loss < std::f64::consts::LN_2);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let a = fit_classifier(&separable(), &settings()).unwrap();
        let b = fit_classifier(&separable(), &settings()).unwrap();
        assert_eq!(a.classifier, b.classifier);
        assert_eq!(a.epochs_run, b.epochs_run);
    }

    #[test]
    fn test_empty_training_set() {
        assert!(fit_classifier(&[], &settings()).is_err());
    }
}
