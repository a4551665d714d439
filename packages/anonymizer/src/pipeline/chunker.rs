//! Hierarchical token-budget chunker.
//!
//! Splits a document into fragments the detector can take in one call:
//!
//! 1. A document within budget is returned whole.
//! 2. Each split level (paragraphs, sentences, delimiters, words) is applied
//!    only to fragments still over budget.
//! 3. After every level, adjacent pieces of the same parent are greedily
//!    re-merged while the combined text (with the document's own separator)
//!    fits.
//! 4. A final pass merges each short fragment (under a third of the budget)
//!    with its successor when the pair fits.
//!
//! A single word over budget is cut into windows of `max_tokens * 4`
//! characters. Those windows are the only fragments allowed to exceed the
//! budget, and they guarantee termination on adversarial input.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::strategy::{split_delimited, split_paragraphs, split_sentences};
use crate::traits::text::{SpanSplitter, TokenCounter};
use crate::types::config::SplitStrategy;
use crate::types::fragment::Fragment;

/// Characters per forced-split window, per budget token.
const CHARS_PER_TOKEN: usize = 4;

/// Splits documents into budget-sized fragments with absolute offsets.
#[derive(Clone)]
pub struct TextChunker {
    counter: Arc<dyn TokenCounter>,
    splitter: Arc<dyn SpanSplitter>,
    max_tokens: usize,
    strategies: Vec<SplitStrategy>,
}

impl TextChunker {
    /// Create a chunker with the default split levels.
    pub fn new(
        counter: Arc<dyn TokenCounter>,
        splitter: Arc<dyn SpanSplitter>,
        max_tokens: usize,
    ) -> Self {
        Self {
            counter,
            splitter,
            max_tokens,
            strategies: SplitStrategy::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Replace the split levels (applied in the given order).
    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = SplitStrategy>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn strategies(&self) -> &[SplitStrategy] {
        &self.strategies
    }

    /// Character length of a forced-split window.
    pub fn char_window(&self) -> usize {
        self.max_tokens.saturating_mul(CHARS_PER_TOKEN).max(1)
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count_tokens(text)
    }

    fn fits(&self, text: &str) -> bool {
        self.count_tokens(text) <= self.max_tokens
    }

    /// Split `document` into ordered fragments.
    ///
    /// Blank documents yield no fragments.
    pub fn chunk(&self, document: &str) -> Vec<Fragment> {
        if document.trim().is_empty() {
            return vec![];
        }
        if self.fits(document) {
            return vec![Fragment::exact(document, 0)];
        }

        let mut fragments = vec![Fragment::exact(document, 0)];
        for &strategy in &self.strategies {
            fragments = self.split_level(fragments, strategy);
        }
        let fragments = self.merge_short(document, fragments);

        debug!(
            document_len = document.len(),
            fragment_count = fragments.len(),
            max_tokens = self.max_tokens,
            "Chunked document"
        );
        fragments
    }

    /// Run [`chunk`](Self::chunk) on the blocking pool.
    ///
    /// Token counting is CPU-bound; this keeps it off the scheduler threads.
    pub async fn chunk_blocking(&self, document: &str) -> Result<Vec<Fragment>> {
        let chunker = self.clone();
        let document = document.to_string();
        let fragments = tokio::task::spawn_blocking(move || chunker.chunk(&document)).await?;
        Ok(fragments)
    }

    /// Apply one split level to `text`, which starts at absolute `offset`.
    pub fn apply_strategy(&self, strategy: SplitStrategy, text: &str, offset: usize) -> Vec<Fragment> {
        match strategy {
            SplitStrategy::Paragraphs => split_paragraphs(text, offset),
            SplitStrategy::Sentences => split_sentences(text, offset),
            SplitStrategy::Delimiters => split_delimited(text, offset),
            SplitStrategy::Words => self.split_words(text, offset),
        }
    }

    fn split_level(&self, fragments: Vec<Fragment>, strategy: SplitStrategy) -> Vec<Fragment> {
        let mut result = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            if self.fits(&fragment.text) {
                result.push(Fragment::exact(fragment.text, fragment.start));
                continue;
            }

            let pieces = self.apply_strategy(strategy, &fragment.text, fragment.start);
            result.extend(self.merge_adjacent(&fragment.text, fragment.start, pieces));
        }

        result
    }

    /// Greedily merge consecutive `pieces` of one parent while they fit.
    ///
    /// The merged text is the parent's own slice, so separators are exactly
    /// what the document had between the pieces.
    fn merge_adjacent(&self, parent: &str, parent_start: usize, pieces: Vec<Fragment>) -> Vec<Fragment> {
        let mut merged = Vec::with_capacity(pieces.len());
        let mut pieces = pieces.into_iter();
        let Some(mut current) = pieces.next() else {
            return merged;
        };

        for next in pieces {
            let candidate = &parent[current.start - parent_start..next.text_end() - parent_start];
            if self.fits(candidate) {
                current = Fragment::new(candidate, current.start, next.end);
            } else {
                merged.push(current);
                current = next;
            }
        }
        merged.push(current);

        merged
    }

    /// Pack consecutive words into the largest prefixes that fit.
    ///
    /// A word that does not fit on its own is force-split and packing resumes
    /// after it. Text in which the splitter finds no words is force-split
    /// whole.
    pub fn split_words(&self, text: &str, offset: usize) -> Vec<Fragment> {
        let words = self.splitter.split_words(text);
        if words.is_empty() {
            return self.force_split(text, offset);
        }

        let mut fragments = Vec::new();
        let mut w = 0;
        while w < words.len() {
            let first = words[w].start;
            let mut x = w;
            while x < words.len() && self.fits(&text[first..words[x].end]) {
                x += 1;
            }

            if x > w {
                let last = words[x - 1].end;
                fragments.push(Fragment::new(&text[first..last], offset + first, offset + last));
                w = x;
            } else {
                let word = words[w];
                warn!(
                    word_prefix = %word.word.chars().take(50).collect::<String>(),
                    word_chars = word.word.chars().count(),
                    "Word too long for the model, splitting it"
                );
                fragments.extend(self.force_split(word.word, offset + word.start));
                w += 1;
            }
        }

        fragments
    }

    /// Cut `text` into windows of [`char_window`](Self::char_window) characters.
    pub fn force_split(&self, text: &str, offset: usize) -> Vec<Fragment> {
        let window = self.char_window();
        let mut fragments = Vec::new();
        let mut start = 0;
        let mut chars = 0;

        for (idx, _) in text.char_indices() {
            if chars == window {
                fragments.push(Fragment::exact(&text[start..idx], offset + start));
                start = idx;
                chars = 0;
            }
            chars += 1;
        }
        if start < text.len() {
            fragments.push(Fragment::exact(&text[start..], offset + start));
        }

        fragments
    }

    /// Merge each fragment under a third of the budget with its successor.
    ///
    /// A merged pair is not considered again in the same pass.
    pub fn merge_short(&self, document: &str, fragments: Vec<Fragment>) -> Vec<Fragment> {
        if fragments.len() <= 1 {
            return fragments;
        }

        let threshold = self.max_tokens / 3;
        let mut merged = Vec::with_capacity(fragments.len());
        let mut i = 0;

        while i < fragments.len() {
            let current = &fragments[i];
            if let Some(next) = fragments.get(i + 1) {
                if self.count_tokens(&current.text) < threshold {
                    let combined = &document[current.start..next.text_end()];
                    if self.fits(combined) {
                        merged.push(Fragment::new(combined, current.start, next.end));
                        i += 2;
                        continue;
                    }
                }
            }

            merged.push(current.clone());
            i += 1;
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{RegexSpanSplitter, WordTokenCounter};

    /// One token per character.
    struct CharCounter;

    impl TokenCounter for CharCounter {
        fn count_tokens(&self, text: &str) -> usize {
            text.chars().count()
        }
    }

    fn word_chunker(max_tokens: usize) -> TextChunker {
        TextChunker::new(
            Arc::new(WordTokenCounter::new()),
            Arc::new(RegexSpanSplitter),
            max_tokens,
        )
    }

    fn texts(fragments: &[Fragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    fn assert_verbatim(document: &str, fragments: &[Fragment]) {
        for fragment in fragments {
            assert_eq!(&document[fragment.start..fragment.text_end()], fragment.text);
        }
    }

    #[test]
    fn test_blank_document_yields_nothing() {
        let chunker = word_chunker(4);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk(" \n\n\t ").is_empty());
    }

    #[test]
    fn test_document_within_budget_is_returned_whole() {
        let document = "  John lives here.  ";
        let fragments = word_chunker(10).chunk(document);

        assert_eq!(fragments, vec![Fragment::new(document, 0, document.len())]);
    }

    #[test]
    fn test_paragraph_split() {
        let document = "Alpha beta gamma.\n\nDelta epsilon zeta.";
        let fragments = word_chunker(5).chunk(document);

        assert_eq!(texts(&fragments), vec!["Alpha beta gamma.", "Delta epsilon zeta."]);
        assert_eq!(fragments[1].start, 19);
        assert_verbatim(document, &fragments);
    }

    #[test]
    fn test_sentence_split() {
        let document = "One two. Three four. Five six.";
        let fragments = word_chunker(4).chunk(document);

        assert_eq!(texts(&fragments), vec!["One two.", "Three four.", "Five six."]);
        assert_eq!(
            fragments.iter().map(|f| f.start).collect::<Vec<_>>(),
            vec![0, 9, 21]
        );
    }

    #[test]
    fn test_level_merge_uses_document_separator() {
        let document = "A b.\n\nC d.\n\nE f g h i j k l.";
        let fragments = word_chunker(8).chunk(document);

        assert_eq!(texts(&fragments), vec!["A b.\n\nC d.", "E f g h i j k l", "."]);
        assert_verbatim(document, &fragments);
    }

    #[test]
    fn test_word_packing_is_verbatim() {
        let document = "alpha  beta gamma delta epsilon";
        let fragments = word_chunker(2).chunk(document);

        assert_eq!(texts(&fragments), vec!["alpha  beta", "gamma delta", "epsilon"]);
        assert_verbatim(document, &fragments);
    }

    #[test]
    fn test_oversized_word_is_force_split() {
        let chunker = TextChunker::new(Arc::new(CharCounter), Arc::new(RegexSpanSplitter), 2);
        let document = "abcdefghijklmnopqrst";
        let fragments = chunker.chunk(document);

        assert_eq!(chunker.char_window(), 8);
        assert_eq!(texts(&fragments), vec!["abcdefgh", "ijklmnop", "qrst"]);
        assert_eq!(
            fragments.iter().map(|f| f.start).collect::<Vec<_>>(),
            vec![0, 8, 16]
        );
    }

    #[test]
    fn test_force_split_respects_char_boundaries() {
        let chunker = word_chunker(1);
        let word = "ééééé";
        let fragments = chunker.force_split(word, 3);

        assert_eq!(texts(&fragments), vec!["éééé", "é"]);
        assert_eq!(fragments[1].start, 3 + "éééé".len());
    }

    #[test]
    fn test_merge_short_merges_pairs_once() {
        let chunker = word_chunker(6);
        let document = "one two three four five six";
        let fragments = vec![
            Fragment::exact("one", 0),
            Fragment::exact("two three four five", 4),
            Fragment::exact("six", 24),
        ];

        let merged = chunker.merge_short(document, fragments);

        assert_eq!(texts(&merged), vec!["one two three four five", "six"]);
    }

    #[test]
    fn test_custom_strategy_order() {
        let chunker = word_chunker(3).with_strategies([SplitStrategy::Delimiters]);
        let fragments = chunker.chunk("a b, c d, e f");

        assert_eq!(texts(&fragments), vec!["a b,", "c d,", "e f"]);
    }

    #[tokio::test]
    async fn test_chunk_blocking_matches_chunk() {
        let chunker = word_chunker(4);
        let document = "One two. Three four. Five six.";

        let fragments = chunker.chunk_blocking(document).await.unwrap();

        assert_eq!(fragments, chunker.chunk(document));
    }

    #[test]
    fn test_char_window_saturates_on_huge_budget() {
        assert_eq!(word_chunker(usize::MAX).char_window(), usize::MAX);
        assert_eq!(word_chunker(3).char_window(), 12);
    }
}
