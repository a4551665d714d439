//! Anonymization request.

use serde::{Deserialize, Serialize};

use crate::error::{AnonymizerError, Result};

/// Input to a single anonymization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationRequest {
    /// Document to anonymize
    pub text: String,

    /// Label vocabulary passed to the detector
    pub labels: Vec<String>,

    /// Detection score threshold, `0 < threshold <= 1`
    pub threshold: f32,

    /// Words whose entities must be left in place.
    ///
    /// Compared against the normalized entity text; case-folded when the
    /// exclusion set is built.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl AnonymizationRequest {
    /// Create a request with no exclusions.
    pub fn new(
        text: impl Into<String>,
        labels: impl IntoIterator<Item = impl Into<String>>,
        threshold: f32,
    ) -> Self {
        Self {
            text: text.into(),
            labels: labels.into_iter().map(|l| l.into()).collect(),
            threshold,
            exclude: vec![],
        }
    }

    /// Set the exclusion words.
    pub fn with_exclude(mut self, words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude = words.into_iter().map(|w| w.into()).collect();
        self
    }

    /// Reject inputs the pipeline must never see.
    pub fn validate(&self) -> Result<()> {
        // NaN fails both comparisons
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(AnonymizerError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}
