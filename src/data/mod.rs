// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw dataset row and a Burn tensor batch.
//
//   dataset file
//       │
//       ▼
//   CsvDatasetLoader  → reads rows (G1, G2, G3, absences)
//       │
//       ▼
//   OutcomeDataset    → bootstraps labels, derives features
//       │               through the FeatureDeriver
//       ▼
//   split_train_eval  → seeded 80/20 shuffle split
//       │
//       ▼
//   FeatureBatcher    → [N, 3] features + [N, 1] targets
//
// FeatureDeriver is also used on its own at prediction time.

/// Loads the delimited historical dataset
pub mod loader;

/// Raw fields → attendance, average grade, performance code
pub mod features;

/// Labelled samples and class-balance checks
pub mod dataset;

/// Stacks samples into tensors for the fit
pub mod batcher;

/// Seeded train/evaluation split
pub mod splitter;
