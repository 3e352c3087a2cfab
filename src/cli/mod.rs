// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and hands everything else to Layer 2 (application).
//
//   1. `train`   — fits a pipeline on a dataset, prints the report
//   2. `predict` — reads one JSON request, prints
//                  {"result": "pass"|"fail", "confidence": n}
//   3. `stats`   — pass / at-risk counts from the prediction log,
//                  or one student's latest logged prediction
//
// stdout carries only the report / response; logs go to stderr.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;

use commands::{Commands, PredictArgs, StatsArgs, TrainArgs};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "student-outcome",
    version,
    about = "Train a pass/fail model on student grade data, then predict outcomes for new students."
)]
pub struct Cli {
    /// The subcommand to run (train, predict or stats)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case. Never computes anything itself.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
            Commands::Stats(args)   => run_stats(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on dataset: {}", args.dataset.display());

    let config   = args.into();
    let use_case = TrainUseCase::new(config);
    let summary  = use_case.execute()?;

    println!("{}", summary.report.render());
    if let Some(csv) = &summary.metrics_csv {
        println!("Metrics appended to {}", csv.display());
    }
    println!(
        "Training complete. Artifact saved ({} train rows, {} epochs, final loss {:.6}).",
        summary.pipeline.provenance.train_rows,
        summary.pipeline.provenance.epochs_run,
        summary.final_loss,
    );
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let request = read_request(args.input.as_deref())?;

    let mut use_case = PredictUseCase::new(&args.artifact)?;
    if let Some(log) = args.log_file {
        use_case = use_case.with_log(log);
    }

    let result = use_case.predict_json(&request)?;
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
    use crate::application::stats_use_case::StatsUseCase;

    let use_case = StatsUseCase::new(&args.log_file);
    let json = match args.student {
        Some(id) => serde_json::to_string(&use_case.latest_for(&id)?)?,
        None     => serde_json::to_string(&use_case.summary()?)?,
    };
    println!("{json}");
    Ok(())
}

fn read_request(input: Option<&std::path::Path>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read request file '{}'", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read request from stdin")?;
            Ok(buf)
        }
    }
}
