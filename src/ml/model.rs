use anyhow::{anyhow, Result};
use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::log_sigmoid,
};

use crate::data::batcher::FeatureBatch;
use crate::domain::artifact::ClassifierParams;
use crate::domain::record::FEATURE_COUNT;

// Config derive supplies Clone + serde impls itself; deriving them
// again here would conflict.
#[derive(Config, Debug)]
pub struct LogisticModelConfig {
    #[config(default = 3)]
    pub n_features: usize,
}

impl LogisticModelConfig {
    /// Weights start at zero, so repeated fits on the same data agree.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticModel<B> {
        let linear = LinearConfig::new(self.n_features, 1)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LogisticModel { linear }
    }
}

/// Binary logistic regression: one linear unit, sigmoid applied in the loss.
#[derive(Module, Debug)]
pub struct LogisticModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticModel<B> {
    /// features: [batch, 3] → logits: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Mean log-loss plus an L2 penalty on the weights (the bias is
    /// not penalised). `l2 = 1.0` matches the usual C = 1 objective
    /// divided through by the row count.
    pub fn forward_loss(&self, batch: &FeatureBatch<B>, l2: f64) -> Tensor<B, 1> {
        let logits  = self.forward(batch.features.clone());
        let targets = batch.targets.clone();
        let n       = batch.batch_size() as f64;

        // -[y·log σ(z) + (1 - y)·log σ(-z)]
        let log_loss = (targets.clone() * log_sigmoid(logits.clone())
            + targets.neg().add_scalar(1.0) * log_sigmoid(logits.neg()))
            .neg()
            .mean();

        let penalty = self.linear.weight
            .val()
            .powf_scalar(2.0)
            .sum()
            .mul_scalar(l2 / (2.0 * n));

        log_loss + penalty
    }

    /// Copy the fitted weights out of Burn into plain f64 parameters.
    pub fn to_params(&self) -> Result<ClassifierParams> {
        let weights: Vec<f64> = self.linear.weight
            .val()
            .into_data()
            .convert::<f64>()
            .to_vec::<f64>()
            .map_err(|e| anyhow!("Cannot read model weights: {e:?}"))?;

        let coefficients: [f64; FEATURE_COUNT] = weights
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("Expected {FEATURE_COUNT} weights, found {}", weights.len()))?;

        let intercept = match &self.linear.bias {
            Some(bias) => bias
                .val()
                .into_data()
                .convert::<f64>()
                .to_vec::<f64>()
                .map_err(|e| anyhow!("Cannot read model bias: {e:?}"))?
                .into_iter()
                .next()
                .unwrap_or(0.0),
            None => 0.0,
        };

        Ok(ClassifierParams { coefficients, intercept })
    }
}
