//! Pure split functions for the hierarchical chunker.
//!
//! Each function takes a piece of text and the absolute offset of its first
//! byte, and returns trimmed fragments with absolute offsets. Nothing here
//! looks at the full document; offsets are computed from `offset` alone.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::fragment::Fragment;

lazy_static! {
    // Two or more consecutive line breaks
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"(?:\r?\n){2,}").unwrap();

    // Candidate sentence end; the following character is checked separately
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// Split into paragraphs separated by blank lines.
pub fn split_paragraphs(text: &str, offset: usize) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for separator in PARAGRAPH_BREAK.find_iter(text) {
        push_trimmed(&mut fragments, &text[last..separator.start()], offset + last);
        last = separator.end();
    }
    push_trimmed(&mut fragments, &text[last..], offset + last);

    fragments
}

/// Split into sentences.
///
/// A boundary is `.`, `!` or `?`, then whitespace, then an uppercase letter
/// or an opening `"`, `«` or `(`. Text without a boundary is one sentence.
pub fn split_sentences(text: &str, offset: usize) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for candidate in SENTENCE_END.find_iter(text) {
        let opens_next = text[candidate.end()..]
            .chars()
            .next()
            .is_some_and(opens_sentence);
        if !opens_next {
            continue;
        }
        push_trimmed(&mut fragments, &text[last..candidate.end()], offset + last);
        last = candidate.end();
    }
    if last < text.len() {
        push_trimmed(&mut fragments, &text[last..], offset + last);
    }

    fragments
}

/// Split after every `,` and `;`, keeping the delimiter with the left part.
pub fn split_delimited(text: &str, offset: usize) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for (idx, c) in text.char_indices() {
        if c == ',' || c == ';' {
            let end = idx + c.len_utf8();
            push_trimmed(&mut fragments, &text[last..end], offset + last);
            last = end;
        }
    }
    if last < text.len() {
        push_trimmed(&mut fragments, &text[last..], offset + last);
    }

    fragments
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || matches!(c, '"' | '«' | '(')
}

fn push_trimmed(fragments: &mut Vec<Fragment>, raw: &str, offset: usize) {
    if let Some(fragment) = Fragment::trimmed(raw, offset) {
        fragments.push(fragment);
    }
}
