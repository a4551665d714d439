//! Placeholder assignment and text substitution.

use std::collections::HashMap;
use tracing::warn;

use crate::types::entity::Entity;
use crate::types::result::{AnonymizationMap, AnonymizationResult};

/// Assigns `[LABEL_N]` placeholders.
///
/// The same `(label, text)` pair always maps to the same placeholder within
/// one mapper. Counters are per label and start at 1.
#[derive(Debug, Default)]
pub struct PlaceholderMapper {
    assigned: HashMap<(String, String), String>,
    counters: HashMap<String, usize>,
    map: AnonymizationMap,
}

impl PlaceholderMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder for `text` under `label`, allocating one on first sight.
    pub fn placeholder_for(&mut self, label: &str, text: &str) -> String {
        let key = (label.to_string(), text.to_string());
        if let Some(placeholder) = self.assigned.get(&key) {
            return placeholder.clone();
        }

        let counter = self.counters.entry(label.to_string()).or_insert(0);
        *counter += 1;
        let placeholder = format!("[{}_{}]", label, counter);

        self.map.insert(placeholder.clone(), text.to_string());
        self.assigned.insert(key, placeholder.clone());
        placeholder
    }

    pub fn into_map(self) -> AnonymizationMap {
        self.map
    }
}

/// Replace every entity in `document` with its placeholder.
///
/// Entities are spliced right to left so earlier offsets stay valid, which
/// also means numbering follows that order: the last occurrence in the
/// document receives `_1`. An entity overlapping one already spliced is
/// skipped.
pub fn rewrite(document: &str, entities: &[Entity]) -> AnonymizationResult {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|entity| entity.start);

    let mut text = document.to_string();
    let mut mapper = PlaceholderMapper::new();
    let mut boundary = document.len();

    for entity in ordered.into_iter().rev() {
        if entity.end > boundary || document.get(entity.start..entity.end).is_none() {
            warn!(start = entity.start, end = entity.end, "Skipping entity that cannot be spliced");
            continue;
        }
        let placeholder = mapper.placeholder_for(&entity.label, &entity.text);
        text.replace_range(entity.start..entity.end, &placeholder);
        boundary = entity.start;
    }

    let map = mapper.into_map();
    for placeholder in map.keys().filter(|placeholder| document.contains(placeholder.as_str())) {
        warn!(%placeholder, "Document already contains a placeholder; restore will not be exact");
    }

    AnonymizationResult { text, map }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(document: &str, needle: &str, nth: usize, label: &str) -> Entity {
        let (start, _) = document.match_indices(needle).nth(nth).unwrap();
        Entity::from_document(document, start, start + needle.len(), label, 0.9).unwrap()
    }

    #[test]
    fn test_numbering_follows_reverse_order() {
        let document = "Ann met Bob";
        let entities = vec![entity(document, "Ann", 0, "PERSON"), entity(document, "Bob", 0, "PERSON")];

        let result = rewrite(document, &entities);

        assert_eq!(result.text, "[PERSON_2] met [PERSON_1]");
        assert_eq!(result.map["[PERSON_1]"], "Bob");
        assert_eq!(result.map["[PERSON_2]"], "Ann");
    }

    #[test]
    fn test_repeated_text_shares_placeholder() {
        let document = "John lives in Paris. John works at Acme.";
        let entities = vec![
            entity(document, "John", 0, "PERSON"),
            entity(document, "Paris", 0, "LOCATION"),
            entity(document, "John", 1, "PERSON"),
            entity(document, "Acme", 0, "ORG"),
        ];

        let result = rewrite(document, &entities);

        assert_eq!(
            result.text,
            "[PERSON_1] lives in [LOCATION_1]. [PERSON_1] works at [ORG_1]."
        );
        assert_eq!(result.map.len(), 3);
        assert_eq!(result.restore(), document);
    }

    #[test]
    fn test_same_text_different_label_gets_two_placeholders() {
        let document = "Jordan visited Jordan";
        let entities = vec![
            entity(document, "Jordan", 0, "PERSON"),
            entity(document, "Jordan", 1, "LOCATION"),
        ];

        let result = rewrite(document, &entities);

        assert_eq!(result.text, "[PERSON_1] visited [LOCATION_1]");
        assert_eq!(result.map.len(), 2);
    }

    #[test]
    fn test_multibyte_neighbours() {
        let document = "Привет, Иван! Как дела?";
        let entities = vec![entity(document, "Иван", 0, "PERSON")];

        let result = rewrite(document, &entities);

        assert_eq!(result.text, "Привет, [PERSON_1]! Как дела?");
    }

    #[test]
    fn test_overlapping_entity_is_skipped() {
        let document = "New York City";
        let entities = vec![
            Entity::from_document(document, 0, 8, "LOCATION", 0.9).unwrap(),
            Entity::from_document(document, 4, 13, "LOCATION", 0.9).unwrap(),
        ];

        let result = rewrite(document, &entities);

        assert_eq!(result.text, "New [LOCATION_1]");
        assert_eq!(result.map["[LOCATION_1]"], "York City");
    }

    #[test]
    fn test_no_entities() {
        let result = rewrite("nothing here", &[]);

        assert_eq!(result.text, "nothing here");
        assert!(result.map.is_empty());
    }
}
