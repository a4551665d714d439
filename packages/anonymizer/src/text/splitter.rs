use lazy_static::lazy_static;
use regex::Regex;

use crate::traits::text::{SpanSplitter, WordSpan};

lazy_static! {
    // Runs of word characters joined by '-' or '_', otherwise any single
    // non-space character (punctuation becomes its own word)
    static ref WORD_REGEX: Regex = Regex::new(r"\w+(?:[-_]\w+)*|\S").unwrap();
}

/// Whitespace and punctuation aware word splitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSpanSplitter;

impl RegexSpanSplitter {
    pub fn new() -> Self {
        Self
    }
}

impl SpanSplitter for RegexSpanSplitter {
    fn split_words<'a>(&self, text: &'a str) -> Vec<WordSpan<'a>> {
        WORD_REGEX
            .find_iter(text)
            .map(|m| WordSpan {
                word: m.as_str(),
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        RegexSpanSplitter.split_words(text).iter().map(|w| w.word).collect()
    }

    #[test]
    fn test_splits_words_and_punctuation() {
        assert_eq!(
            words("Hello, world! It's state-of-the-art."),
            vec!["Hello", ",", "world", "!", "It", "'", "s", "state-of-the-art", "."]
        );
    }

    #[test]
    fn test_offsets_point_into_input() {
        let text = "  Jean-Luc   Picard\n";
        for span in RegexSpanSplitter.split_words(text) {
            assert_eq!(&text[span.start..span.end], span.word);
        }
        assert_eq!(words(text), vec!["Jean-Luc", "Picard"]);
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(words("Иван живёт в Москве"), vec!["Иван", "живёт", "в", "Москве"]);
    }

    #[test]
    fn test_blank_text() {
        assert!(words(" \n\t").is_empty());
    }
}
