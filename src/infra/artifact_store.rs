// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores the TrainedPipeline as a single JSON file.
//
// What gets saved:
//   format_version, PolicyConfig (label scheme + decision rule),
//   scaler means/scales, classifier coefficients/intercept,
//   training provenance
//
// Writes go to a temporary file in the same directory which is
// then renamed over the target, so readers only ever see the
// old artifact or the complete new one.
//
// serde_json is built with `float_roundtrip`, so every f64
// weight reads back bit-for-bit.

use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::domain::artifact::{TrainedPipeline, FORMAT_VERSION};
use crate::domain::error::OutcomeError;
use crate::domain::traits::ModelStore;

/// File-backed ModelStore for one artifact path.
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> OutcomeError {
        OutcomeError::unavailable(self.path.display().to_string(), reason)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl ModelStore for ArtifactStore {
    fn save(&self, pipeline: &TrainedPipeline) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;

        let json = serde_json::to_string_pretty(pipeline)?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Cannot create temporary file in '{}'", dir.display()))?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Cannot write artifact to '{}'", self.path.display()))?;

        tracing::info!("Saved artifact to '{}'", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<TrainedPipeline, OutcomeError> {
        let json = fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;

        // Check the version before the full decode so an incompatible
        // layout reports the version, not a missing-field error.
        let value: serde_json::Value = serde_json::from_str(&json)
            .map_err(|e| self.unavailable(format!("corrupt artifact: {e}")))?;
        match value.get("format_version").and_then(|v| v.as_u64()) {
            Some(v) if v == u64::from(FORMAT_VERSION) => {}
            Some(v) => return Err(self.unavailable(format!(
                "unsupported format_version {v} (expected {FORMAT_VERSION})"
            ))),
            None => return Err(self.unavailable("corrupt artifact: no format_version")),
        }

        let pipeline: TrainedPipeline = serde_json::from_value(value)
            .map_err(|e| self.unavailable(format!("corrupt artifact: {e}")))?;

        let finite = pipeline.scaler.mean.iter()
            .chain(pipeline.scaler.scale.iter())
            .chain(pipeline.classifier.coefficients.iter())
            .chain(std::iter::once(&pipeline.classifier.intercept))
            .all(|x| x.is_finite());
        if !finite || pipeline.scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(self.unavailable("corrupt artifact: non-finite or zero parameters"));
        }

        tracing::debug!(
            "Loaded artifact from '{}' ({:?})",
            self.path.display(),
            pipeline.policy
        );
        Ok(pipeline)
    }
}
