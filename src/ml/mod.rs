// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn framework code lives in this layer. Nothing else
// imports burn apart from the data batcher.
//
//   scaler.rs    — zero-mean / unit-variance fit on the training
//                  partition
//   model.rs     — one-unit logistic regression module + loss
//   trainer.rs   — full-batch Adam fit, returns plain f64 weights
//   predictor.rs — applies a TrainedPipeline and its decision
//                  policy to a single student (no Burn needed)
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Standardisation fitted on training features
pub mod scaler;

/// Logistic regression architecture and loss
pub mod model;

/// Training loop
pub mod trainer;

/// Inference engine — pipeline + decision policy
pub mod predictor;
