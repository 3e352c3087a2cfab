// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load historical rows            (Layer 4 - data)
//   Step 2: Label + derive features         (Layer 4 - data)
//   Step 3: Reject single-class data        (Layer 4 - data)
//   Step 4: Seeded train/eval split         (Layer 4 - data)
//   Step 5: Fit scaler on train only        (Layer 5 - ml)
//   Step 6: Fit logistic regression         (Layer 5 - ml)
//   Step 7: Evaluate on the held-out rows   (Layer 6 - infra)
//   Step 8: Persist the artifact atomically (Layer 6 - infra)
//   Step 9: Append metrics.csv              (Layer 6 - infra)
//
// Any failure before Step 8 aborts the run, so a half-fitted
// or unvalidated pipeline is never written; metrics are only
// recorded for runs that actually produced an artifact.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::{LabelledSample, OutcomeDataset},
    features::FeatureDeriver,
    loader::CsvDatasetLoader,
    splitter::{split_train_eval, DEFAULT_SEED},
};
use crate::domain::{
    artifact::{TrainedPipeline, TrainingProvenance},
    policy::PolicyConfig,
    traits::{DatasetSource, ModelStore},
};
use crate::infra::{
    artifact_store::ArtifactStore,
    clock::unix_now,
    metrics::{ClassificationReport, MetricsLogger},
};
use crate::ml::{
    scaler::{fit_scaler, scale_samples},
    trainer::{fit_classifier, FitSettings},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything one training run needs. Serialisable so a run can be
// described in JSON; the policy part is also stored in the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:   PathBuf,
    pub artifact_path:  PathBuf,
    /// Where metrics.csv is appended; None disables the CSV log
    pub metrics_dir:    Option<PathBuf>,
    pub policy:         PolicyConfig,
    pub train_fraction: f64,
    pub seed:           u64,
    pub max_epochs:     usize,
    pub lr:             f64,
    pub l2:             f64,
    pub tolerance:      f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:   PathBuf::from("student-por.csv"),
            artifact_path:  PathBuf::from("student_model.json"),
            metrics_dir:    None,
            policy:         PolicyConfig::default(),
            train_fraction: 0.8,
            seed:           DEFAULT_SEED,
            max_epochs:     3000,
            lr:             0.05,
            l2:             1.0,
            tolerance:      1e-10,
        }
    }
}

impl TrainConfig {
    fn fit_settings(&self) -> FitSettings {
        FitSettings {
            max_epochs: self.max_epochs,
            lr:         self.lr,
            l2:         self.l2,
            tolerance:  self.tolerance,
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub pipeline:      TrainedPipeline,
    pub report:        ClassificationReport,
    /// Training objective at the last epoch
    pub final_loss:    f64,
    pub metrics_csv:   Option<PathBuf>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Train from the configured dataset file into the configured artifact path.
    pub fn execute(&self) -> Result<TrainingSummary> {
        let source = CsvDatasetLoader::new(&self.config.dataset_path);
        let store  = ArtifactStore::new(&self.config.artifact_path);
        self.run(&source, &store)
    }

    /// Train from any source into any store.
    pub fn run(&self, source: &dyn DatasetSource, store: &dyn ModelStore) -> Result<TrainingSummary> {
        let cfg = &self.config;
        if !(cfg.train_fraction > 0.0 && cfg.train_fraction <= 1.0) {
            bail!("train_fraction must be in (0, 1], got {}", cfg.train_fraction);
        }

        // ── Step 1: Load rows ────────────────────────────────────────────────
        let rows = source.load_rows()?;

        // ── Step 2: Label and derive features ────────────────────────────────
        // Same deriver the Predictor builds from the artifact's policy
        let deriver = FeatureDeriver::new(cfg.policy.label_scheme);
        let dataset = OutcomeDataset::from_history(&rows, &deriver)?;

        // ── Step 3: Both classes must be present ─────────────────────────────
        dataset.ensure_two_classes()?;
        let (fail, pass) = dataset.class_counts();
        tracing::info!("Labelled {} rows: {} pass, {} fail", dataset.len(), pass, fail);

        // ── Step 4: Seeded split ─────────────────────────────────────────────
        let (train, eval) = split_train_eval(dataset.into_samples(), cfg.train_fraction, cfg.seed);
        tracing::info!("Split: {} train, {} evaluation", train.len(), eval.len());

        let train_set = OutcomeDataset::new(train);
        train_set.ensure_two_classes()?;

        // ── Step 5: Scaler on the training partition only ────────────────────
        let scaler = fit_scaler(train_set.samples())?;
        let scaled = scale_samples(&scaler, train_set.samples());

        // ── Step 6: Logistic regression ──────────────────────────────────────
        let fit = fit_classifier(&scaled, &cfg.fit_settings())?;

        let eval_set = OutcomeDataset::new(eval);
        let pipeline = TrainedPipeline::new(
            cfg.policy,
            scaler,
            fit.classifier,
            TrainingProvenance {
                train_rows: train_set.len(),
                eval_rows:  eval_set.len(),
                split_seed: cfg.seed,
                epochs_run: fit.epochs_run,
            },
        );

        // ── Step 7: Advisory evaluation ──────────────────────────────────────
        if eval_set.is_empty() {
            tracing::warn!("Evaluation partition is empty; report will be all zeros");
        }
        let report = evaluate(&pipeline, eval_set.samples());

        // ── Step 8: Persist ──────────────────────────────────────────────────
        store.save(&pipeline)?;

        // ── Step 9: Metrics CSV ──────────────────────────────────────────────
        let metrics_csv = match &cfg.metrics_dir {
            Some(dir) => {
                let logger = MetricsLogger::new(dir)?;
                logger.log(unix_now(), &report)?;
                Some(logger.csv_path().clone())
            }
            None => None,
        };

        Ok(TrainingSummary {
            pipeline,
            report,
            final_loss: fit.final_loss,
            metrics_csv,
        })
    }
}

/// Score held-out samples with the classifier's own 0.5 cut.
fn evaluate(pipeline: &TrainedPipeline, eval: &[LabelledSample]) -> ClassificationReport {
    let y_true: Vec<u8> = eval.iter().map(|s| s.label).collect();
    let y_pred: Vec<u8> = eval
        .iter()
        .map(|s| {
            let p = pipeline.classifier.proba_pass(&pipeline.scaler.transform(&s.features));
            u8::from(p >= 0.5)
        })
        .collect();
    ClassificationReport::compute(&y_true, &y_pred)
}
