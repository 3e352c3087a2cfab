// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   artifact_store.rs — Atomic save / validated load of the
//                       TrainedPipeline (implements ModelStore)
//
//   metrics.rs        — Classification report for the evaluation
//                       partition, printed and appended to CSV
//
//   prediction_log.rs — Optional JSON-lines audit trail of
//                       successful predictions, read back for
//                       per-student history and stats
//
//   clock.rs          — Unix timestamps for log entries and runs
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Trained pipeline persistence
pub mod artifact_store;

/// Precision / recall report and CSV logger
pub mod metrics;

/// Per-prediction JSON-lines log
pub mod prediction_log;

/// Unix-seconds timestamps
pub mod clock;
