use std::sync::Arc;

use crate::cache::MemoCache;
use crate::traits::normalizer::Normalizer;

/// Case-folds and trims; the simplest comparison form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseNormalizer;

impl Normalizer for LowercaseNormalizer {
    fn normalize(&self, word: &str) -> String {
        word.trim().to_lowercase()
    }
}

/// Memoizes another normalizer by exact input string.
pub struct CachedNormalizer<N> {
    inner: N,
    cache: Arc<MemoCache<String>>,
}

impl<N: Normalizer> CachedNormalizer<N> {
    pub fn new(inner: N, cache: Arc<MemoCache<String>>) -> Self {
        Self { inner, cache }
    }
}

impl<N: Normalizer> Normalizer for CachedNormalizer<N> {
    fn normalize(&self, word: &str) -> String {
        self.cache.get_or_insert_with(word, || self.inner.normalize(word))
    }
}
