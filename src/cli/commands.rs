// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands, `train`, `predict` and `stats`, and
// all their flags. clap's derive macros generate --help, error
// messages for missing args, and string → number conversion.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::data::splitter::DEFAULT_SEED;
use crate::domain::policy::{DecisionPolicy, LabelScheme, PolicyConfig};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the scaler + logistic-regression pipeline on a historical dataset
    Train(TrainArgs),

    /// Predict pass/fail for one student from a JSON request
    Predict(PredictArgs),

    /// Summarise a prediction log, or show one student's latest prediction
    Stats(StatsArgs),
}

/// Prior-performance label set the model is trained with
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LabelSchemeArg {
    /// poor, average, good, excellent
    FourLevel,
    /// poor, below-average, average, good, excellent
    FiveLevel,
}

/// Decision rule stored in the artifact
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PolicyArg {
    /// Attendance < 40 always fails; pass iff p >= 0.9; confidence = p(pass)
    Strict,
    /// Pass iff p >= 0.5; confidence = p(returned label)
    Lenient,
}

impl From<LabelSchemeArg> for LabelScheme {
    fn from(a: LabelSchemeArg) -> Self {
        match a {
            LabelSchemeArg::FourLevel => LabelScheme::FourLevel,
            LabelSchemeArg::FiveLevel => LabelScheme::FiveLevel,
        }
    }
}

impl From<PolicyArg> for DecisionPolicy {
    fn from(a: PolicyArg) -> Self {
        match a {
            PolicyArg::Strict  => DecisionPolicy::Strict,
            PolicyArg::Lenient => DecisionPolicy::Lenient,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Delimited dataset with G1, G2, G3 and absences columns
    #[arg(long, default_value = "student-por.csv")]
    pub dataset: PathBuf,

    /// Where to write the trained artifact
    #[arg(long, default_value = "student_model.json")]
    pub artifact: PathBuf,

    /// Directory for metrics.csv (omit to skip the CSV log)
    #[arg(long)]
    pub metrics_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LabelSchemeArg::FourLevel)]
    pub label_scheme: LabelSchemeArg,

    #[arg(long, value_enum, default_value_t = PolicyArg::Strict)]
    pub policy: PolicyArg,

    /// Share of rows used for fitting; the rest is held out for the report
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    /// Shuffle seed for the train/evaluation split
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Upper bound on full-batch optimiser steps
    #[arg(long, default_value_t = 3000)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 0.05)]
    pub lr: f64,

    /// L2 penalty strength on the weights
    #[arg(long, default_value_t = 1.0)]
    pub l2: f64,

    /// Stop once the loss changes by less than this between epochs
    #[arg(long, default_value_t = 1e-10)]
    pub tolerance: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path:   a.dataset,
            artifact_path:  a.artifact,
            metrics_dir:    a.metrics_dir,
            policy:         PolicyConfig::new(a.label_scheme.into(), a.policy.into()),
            train_fraction: a.train_fraction,
            seed:           a.seed,
            max_epochs:     a.epochs,
            lr:             a.lr,
            l2:             a.l2,
            tolerance:      a.tolerance,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Trained artifact produced by `train`
    #[arg(long, default_value = "student_model.json")]
    pub artifact: PathBuf,

    /// JSON request file; reads stdin when omitted or "-"
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Append each successful prediction to this JSON-lines file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// All arguments for the `stats` command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Prediction log written by `predict --log-file`
    #[arg(long, default_value = "predictions.jsonl")]
    pub log_file: PathBuf,

    /// Show this student's latest prediction instead of the totals
    #[arg(long)]
    pub student: Option<String>,
}
