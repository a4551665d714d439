//! Configuration types for chunking and detection.

use serde::{Deserialize, Serialize};

use crate::error::{AnonymizerError, Result};

/// Default token budget per fragment.
pub const DEFAULT_MAX_TOKENS: usize = 768;

/// Default number of detector calls allowed in flight.
pub const DEFAULT_DETECTION_CONCURRENCY: usize = 1;

/// Default capacity of each memoization cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// One level of the hierarchical splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// Blocks separated by two or more line breaks
    Paragraphs,
    /// Sentence boundaries (`.`, `!`, `?` before a capital or opening mark)
    Sentences,
    /// After each `,` or `;`
    Delimiters,
    /// Greedy word packing, with forced character windows as last resort
    Words,
}

impl SplitStrategy {
    /// Coarsest to finest.
    pub const DEFAULT_ORDER: [SplitStrategy; 4] = [
        SplitStrategy::Paragraphs,
        SplitStrategy::Sentences,
        SplitStrategy::Delimiters,
        SplitStrategy::Words,
    ];
}

/// Configuration for the anonymization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizerConfig {
    /// Maximum tokens per fragment sent to the detector.
    ///
    /// Default: 768.
    pub max_tokens: usize,

    /// Width of the detection gate.
    ///
    /// Keep at 1 unless the detector is safe for concurrent inference.
    pub detection_concurrency: usize,

    /// Entries kept by the token-count cache.
    pub token_cache_capacity: usize,

    /// Entries kept by the normalization cache.
    pub normalizer_cache_capacity: usize,

    /// Split levels applied to fragments still over budget, in order.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<SplitStrategy>,
}

fn default_strategies() -> Vec<SplitStrategy> {
    SplitStrategy::DEFAULT_ORDER.to_vec()
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            detection_concurrency: DEFAULT_DETECTION_CONCURRENCY,
            token_cache_capacity: DEFAULT_CACHE_CAPACITY,
            normalizer_cache_capacity: DEFAULT_CACHE_CAPACITY,
            strategies: default_strategies(),
        }
    }
}

impl AnonymizerConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token budget.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the detection gate width.
    pub fn with_detection_concurrency(mut self, concurrency: usize) -> Self {
        self.detection_concurrency = concurrency;
        self
    }

    /// Set the token-count cache capacity.
    pub fn with_token_cache_capacity(mut self, capacity: usize) -> Self {
        self.token_cache_capacity = capacity;
        self
    }

    /// Set the normalization cache capacity.
    pub fn with_normalizer_cache_capacity(mut self, capacity: usize) -> Self {
        self.normalizer_cache_capacity = capacity;
        self
    }

    /// Replace the split levels.
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = SplitStrategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(AnonymizerError::config("max_tokens must be at least 1"));
        }
        if self.detection_concurrency == 0 {
            return Err(AnonymizerError::config(
                "detection_concurrency must be at least 1",
            ));
        }
        if self.token_cache_capacity == 0 || self.normalizer_cache_capacity == 0 {
            return Err(AnonymizerError::config(
                "cache capacities must be at least 1",
            ));
        }
        Ok(())
    }
}
