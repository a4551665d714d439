//! Anonymization output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Flat map from placeholder to the original text it replaced.
///
/// Entries are kept in the order placeholders were created, which is
/// right-to-left through the document.
pub type AnonymizationMap = IndexMap<String, String>;

/// Anonymized text plus the map needed to reverse it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizationResult {
    pub text: String,
    pub map: AnonymizationMap,
}

impl AnonymizationResult {
    /// A result that leaves `text` untouched.
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            map: AnonymizationMap::new(),
        }
    }

    /// Number of distinct placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.map.len()
    }

    /// Substitute every placeholder back with its original text.
    ///
    /// Plain text substitution: the round trip is exact only when the source
    /// document contained none of the map's placeholders verbatim. A document
    /// that already reads `[PERSON_1]` restores that text as the original too.
    pub fn restore(&self) -> String {
        self.map
            .iter()
            .fold(self.text.clone(), |text, (placeholder, original)| {
                text.replace(placeholder.as_str(), original)
            })
    }
}
