// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// system IS: student records, derived features, the decision
// policy, the persisted artifact and the error taxonomy.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - NO CLI types (clap stays in Layer 1)
//
// The artifact's inference math (scaling + sigmoid) lives here
// because it is plain f64 arithmetic; only FITTING needs Burn.

/// Raw and derived student data, request/response shapes
pub mod record;

/// Label schemes and decision policies
pub mod policy;

/// The persisted scaler + classifier bundle
pub mod artifact;

/// Error taxonomy shared by every layer
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
