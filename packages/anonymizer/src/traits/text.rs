//! Token counting and word splitting.
//!
//! The chunker only needs two facts about the model's tokenizer: how many
//! tokens a string occupies, and where the words of a string are.

use std::sync::Arc;

/// A word and its byte offsets within the text it was split from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan<'a> {
    pub word: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Counts the model tokens a string would occupy.
///
/// Must be a pure function of its input; results may be memoized.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

/// Splits text into words with offsets.
pub trait SpanSplitter: Send + Sync {
    /// Words of `text` in order, with offsets relative to `text`.
    fn split_words<'a>(&self, text: &'a str) -> Vec<WordSpan<'a>>;
}

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn count_tokens(&self, text: &str) -> usize {
        (**self).count_tokens(text)
    }
}

impl<T: SpanSplitter + ?Sized> SpanSplitter for Arc<T> {
    fn split_words<'a>(&self, text: &'a str) -> Vec<WordSpan<'a>> {
        (**self).split_words(text)
    }
}
