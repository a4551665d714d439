//! Conflict resolution between detected entities.
//!
//! Two passes: identical spans collapse to the best-scoring one, then
//! overlapping spans are swept left to right with longer spans winning ties
//! on start. Scores only matter in the first pass.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::types::entity::Entity;

/// Keep one entity per `(start, end)`, the one with the strictly highest
/// score. On equal scores the first seen wins. First-seen order is kept.
pub fn dedup_by_position(entities: Vec<Entity>) -> Vec<Entity> {
    let mut best: IndexMap<(usize, usize), Entity> = IndexMap::with_capacity(entities.len());

    for entity in entities {
        match best.entry((entity.start, entity.end)) {
            Entry::Occupied(mut slot) => {
                if entity.score > slot.get().score {
                    slot.insert(entity);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(entity);
            }
        }
    }

    best.into_values().collect()
}

/// Drop every entity that overlaps one accepted before it.
///
/// Candidates are ordered by start ascending, then length descending, and
/// accepted greedily while they start at or after the last accepted end.
/// Output is sorted by start.
pub fn resolve_overlaps(mut entities: Vec<Entity>) -> Vec<Entity> {
    entities.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.byte_len().cmp(&a.byte_len())));

    let mut accepted = Vec::with_capacity(entities.len());
    let mut last_end = 0;
    for entity in entities {
        if entity.start >= last_end {
            last_end = entity.end;
            accepted.push(entity);
        }
    }

    accepted
}

/// Full conflict resolution: position dedup, then overlap sweep.
pub fn resolve_conflicts(entities: Vec<Entity>) -> Vec<Entity> {
    let mut resolved = resolve_overlaps(dedup_by_position(entities));
    resolved.sort_by_key(|entity| entity.start);
    resolved
}
