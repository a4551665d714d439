use anonymizer::AnonymizerConfig;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Pipeline settings loaded from environment variables.
///
/// Unset variables keep the library defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub anonymizer: AnonymizerConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = AnonymizerConfig::default();
        let number = |key: &str, default: usize| -> Result<usize> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a positive number", key)),
                None => Ok(default),
            }
        };

        let anonymizer = AnonymizerConfig {
            max_tokens: number("ANONYMIZER_MAX_TOKENS", defaults.max_tokens)?,
            detection_concurrency: number(
                "ANONYMIZER_DETECTION_CONCURRENCY",
                defaults.detection_concurrency,
            )?,
            token_cache_capacity: number(
                "ANONYMIZER_TOKEN_CACHE_SIZE",
                defaults.token_cache_capacity,
            )?,
            normalizer_cache_capacity: number(
                "ANONYMIZER_NORMALIZER_CACHE_SIZE",
                defaults.normalizer_cache_capacity,
            )?,
            strategies: defaults.strategies,
        };

        Ok(Self { anonymizer })
    }
}
