use std::sync::Arc;

use crate::cache::MemoCache;
use crate::text::splitter::RegexSpanSplitter;
use crate::traits::text::{SpanSplitter, TokenCounter};

/// Counts one token per word, plus a fixed special-token overhead.
///
/// Blank text counts as zero tokens, overhead included. Useful when the
/// model's own tokenizer is not available, and for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct WordTokenCounter<S = RegexSpanSplitter> {
    splitter: S,
    special_tokens: usize,
}

impl WordTokenCounter<RegexSpanSplitter> {
    pub fn new() -> Self {
        Self::with_splitter(RegexSpanSplitter)
    }
}

impl<S: SpanSplitter> WordTokenCounter<S> {
    pub fn with_splitter(splitter: S) -> Self {
        Self {
            splitter,
            special_tokens: 0,
        }
    }

    /// Add `count` tokens to every non-blank text (e.g. start/end markers).
    pub fn with_special_tokens(mut self, count: usize) -> Self {
        self.special_tokens = count;
        self
    }
}

impl<S: SpanSplitter> TokenCounter for WordTokenCounter<S> {
    fn count_tokens(&self, text: &str) -> usize {
        let words = self.splitter.split_words(text).len();
        if words == 0 {
            return 0;
        }
        words + self.special_tokens
    }
}

/// Memoizes another counter by exact input string.
pub struct CachedTokenCounter<C> {
    inner: C,
    cache: Arc<MemoCache<usize>>,
}

impl<C: TokenCounter> CachedTokenCounter<C> {
    pub fn new(inner: C, cache: Arc<MemoCache<usize>>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<MemoCache<usize>> {
        &self.cache
    }
}

impl<C: TokenCounter> TokenCounter for CachedTokenCounter<C> {
    fn count_tokens(&self, text: &str) -> usize {
        self.cache
            .get_or_insert_with(text, || self.inner.count_tokens(text))
    }
}
