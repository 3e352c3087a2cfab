use crate::data::features::FeatureDeriver;
use crate::domain::error::OutcomeError;
use crate::domain::policy::PASS_MARK;
use crate::domain::record::{HistoricalRecord, StudentRecord, FEATURE_COUNT};

/// One derived feature vector with its pass (1) / fail (0) target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelledSample {
    pub features: [f64; FEATURE_COUNT],
    pub label:    u8,
}

pub struct OutcomeDataset {
    samples: Vec<LabelledSample>,
}

impl OutcomeDataset {
    pub fn new(samples: Vec<LabelledSample>) -> Self { Self { samples } }

    /// Label historical rows and derive their features.
    ///
    /// The prior-performance category is bootstrapped from the final
    /// grade's band, then fed through the same deriver used at
    /// prediction time.
    pub fn from_history(
        rows:    &[HistoricalRecord],
        deriver: &FeatureDeriver,
    ) -> Result<Self, OutcomeError> {
        let scheme = deriver.scheme();
        let samples = rows
            .iter()
            .map(|row| {
                let record = StudentRecord::new(
                    row.grades,
                    row.absences,
                    scheme.band_for_grade(row.final_grade()),
                );
                let features = deriver.derive(&record)?;
                Ok(LabelledSample {
                    features: features.to_array(),
                    label:    u8::from(row.final_grade() >= PASS_MARK),
                })
            })
            .collect::<Result<Vec<_>, OutcomeError>>()?;
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[LabelledSample] { &self.samples }

    pub fn into_samples(self) -> Vec<LabelledSample> { self.samples }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    /// (fail count, pass count)
    pub fn class_counts(&self) -> (usize, usize) {
        let pass = self.samples.iter().filter(|s| s.label == 1).count();
        (self.samples.len() - pass, pass)
    }

    /// A two-class fit needs both classes present.
    pub fn ensure_two_classes(&self) -> Result<(), OutcomeError> {
        match self.class_counts() {
            (0, 0) => Err(OutcomeError::DataFormat("dataset has no rows".into())),
            (0, pass) => Err(OutcomeError::DegenerateDataset { present: "pass".into(), rows: pass }),
            (fail, 0) => Err(OutcomeError::DegenerateDataset { present: "fail".into(), rows: fail }),
            _ => Ok(()),
        }
    }
}
