//! Document fragments produced by the chunker.

use serde::{Deserialize, Serialize};

/// A slice of the original document sized for one detector call.
///
/// Offsets are byte offsets into the original document and always fall on
/// `char` boundaries. `text` is the verbatim slice
/// `document[start..start + text.len()]`; `end` may extend past it over
/// trailing whitespace that was trimmed away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Fragment content
    pub text: String,

    /// Absolute offset of the first byte of `text`
    pub start: usize,

    /// Absolute end of the raw segment, trailing whitespace included
    pub end: usize,
}

impl Fragment {
    /// Create a fragment.
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Create a fragment covering `text` exactly.
    pub fn exact(text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self { text, start, end }
    }

    /// Trim a raw segment that begins at `offset`.
    ///
    /// Leading whitespace moves `start` forward; trailing whitespace stays
    /// inside `end`. Returns `None` for blank segments.
    pub fn trimmed(raw: &str, offset: usize) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        let leading = raw.len() - raw.trim_start().len();
        Some(Self {
            text: text.to_string(),
            start: offset + leading,
            end: offset + raw.len(),
        })
    }

    /// Absolute offset one past the last byte of `text`.
    pub fn text_end(&self) -> usize {
        self.start + self.text.len()
    }
}
