use std::collections::HashSet;
use tracing::debug;

use crate::traits::normalizer::Normalizer;
use crate::types::entity::Entity;

/// Caller-supplied words that must never be anonymized.
///
/// Words are trimmed and lowercased on construction; entity text goes
/// through the configured [`Normalizer`] before lookup.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.words.contains(normalized)
    }

    /// Drop entities whose normalized text is excluded.
    pub fn filter(&self, entities: Vec<Entity>, normalizer: &dyn Normalizer) -> Vec<Entity> {
        if self.is_empty() {
            return entities;
        }

        let before = entities.len();
        let kept: Vec<Entity> = entities
            .into_iter()
            .filter(|entity| !self.contains(&normalizer.normalize(&entity.text)))
            .collect();

        debug!(dropped = before - kept.len(), "Applied exclusion list");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::LowercaseNormalizer;

    fn entity(text: &str) -> Entity {
        Entity {
            start: 0,
            end: text.len(),
            label: "ORG".to_string(),
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_words_are_case_folded() {
        let set = ExclusionSet::new(["  ACME ", "", "Globex"]);

        assert_eq!(set.len(), 2);
        assert!(set.contains("acme"));
        assert!(set.contains("globex"));
    }

    #[test]
    fn test_filter_uses_normalizer() {
        let set = ExclusionSet::new(["acme"]);
        let kept = set.filter(vec![entity("Acme"), entity("Initech")], &LowercaseNormalizer);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Initech");
    }

    #[test]
    fn test_empty_set_keeps_everything() {
        let set = ExclusionSet::default();
        let kept = set.filter(vec![entity("Acme")], &LowercaseNormalizer);

        assert_eq!(kept.len(), 1);
    }
}
