//! Normalization of entity text for exclusion matching.

use std::sync::Arc;

/// Maps a word to its comparison form (lemma, case-folded form, ...).
///
/// Must be a pure function of its input; results may be memoized.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, word: &str) -> String;
}

impl<T: Normalizer + ?Sized> Normalizer for Arc<T> {
    fn normalize(&self, word: &str) -> String {
        (**self).normalize(word)
    }
}
