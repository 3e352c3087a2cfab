// ============================================================
// Layer 4 — Feature Batcher
// ============================================================
// Implements Burn's Batcher trait to stack scaled
// LabelledSamples into tensors for the fit.
//
//   Input:  Vec of N samples, each [f64; 3] + label
//   Output: features [N, 3], targets [N, 1] (1.0 = pass)
//
// The whole training partition fits in one batch, so the
// trainer builds a single FeatureBatch and reuses it every epoch.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};
use std::marker::PhantomData;

use crate::data::dataset::LabelledSample;
use crate::domain::record::FEATURE_COUNT;

#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    /// Scaled features — shape: [batch_size, 3]
    pub features: Tensor<B, 2>,

    /// Binary targets as floats — shape: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> FeatureBatch<B> {
    pub fn batch_size(&self) -> usize {
        self.targets.dims()[0]
    }
}

/// Stateless; the target device is supplied per call.
#[derive(Clone, Debug)]
pub struct FeatureBatcher<B: Backend> {
    _backend: PhantomData<B>,
}

impl<B: Backend> FeatureBatcher<B> {
    pub fn new() -> Self {
        Self { _backend: PhantomData }
    }
}

impl<B: Backend> Default for FeatureBatcher<B> {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
impl<B: Backend> Batcher<B, LabelledSample, FeatureBatch<B>> for FeatureBatcher<B> {
    fn batch(&self, items: Vec<LabelledSample>, device: &B::Device) -> FeatureBatch<B> {
        let batch_size = items.len();

        let flat: Vec<f64> = items
            .iter()
            .flat_map(|s| s.features)
            .collect();
        let labels: Vec<f64> = items
            .iter()
            .map(|s| f64::from(s.label))
            .collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, FEATURE_COUNT]),
            device,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(labels, [batch_size, 1]),
            device,
        );

        FeatureBatch { features, targets }
    }
}
