//! Detected spans and document-level entities.

use serde::{Deserialize, Serialize};

/// A span reported by a detector, local to the text it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSpan {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub score: f32,
}

impl DetectedSpan {
    pub fn new(start: usize, end: usize, label: impl Into<String>, score: f32) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            score,
        }
    }
}

/// An entity positioned in the original document.
///
/// `text` always equals `document[start..end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
    pub score: f32,
}

impl Entity {
    /// Build an entity from a document slice.
    ///
    /// Returns `None` when the range is empty, out of bounds or not on
    /// `char` boundaries.
    pub fn from_document(
        document: &str,
        start: usize,
        end: usize,
        label: impl Into<String>,
        score: f32,
    ) -> Option<Self> {
        if start >= end {
            return None;
        }
        let text = document.get(start..end)?;
        Some(Self {
            start,
            end,
            label: label.into(),
            text: text.to_string(),
            score,
        })
    }

    /// Span length in bytes.
    pub fn byte_len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the two half-open ranges share at least one byte.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_document_slices_text() {
        let entity = Entity::from_document("John lives in Paris", 14, 19, "LOCATION", 0.9).unwrap();
        assert_eq!(entity.text, "Paris");
        assert_eq!(entity.byte_len(), 5);
    }

    #[test]
    fn test_from_document_rejects_bad_ranges() {
        assert!(Entity::from_document("abc", 2, 2, "X", 1.0).is_none());
        assert!(Entity::from_document("abc", 1, 9, "X", 1.0).is_none());
        // Splits a two-byte character
        assert!(Entity::from_document("é", 0, 1, "X", 1.0).is_none());
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let a = Entity::from_document("abcdef", 0, 3, "X", 1.0).unwrap();
        let b = Entity::from_document("abcdef", 3, 6, "X", 1.0).unwrap();
        let c = Entity::from_document("abcdef", 2, 4, "X", 1.0).unwrap();

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
