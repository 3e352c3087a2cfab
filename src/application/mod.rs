// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layer 4 and 6)
//   - Only workflow coordination

// The offline training workflow
pub mod train_use_case;

// The per-request prediction workflow
pub mod predict_use_case;

// Pass / at-risk counts and per-student history from the prediction log
pub mod stats_use_case;
