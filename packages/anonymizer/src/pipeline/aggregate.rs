//! Per-fragment detection and translation to document offsets.

use futures::future::try_join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

use crate::error::{AnonymizerError, Result};
use crate::pipeline::gate::DetectionGate;
use crate::traits::detector::EntityDetector;
use crate::types::entity::{DetectedSpan, Entity};
use crate::types::fragment::Fragment;

/// Runs the detector over every fragment and collects global entities.
pub struct EntityAggregator<D> {
    detector: Arc<D>,
    gate: DetectionGate,
}

impl<D: EntityDetector + 'static> EntityAggregator<D> {
    pub fn new(detector: Arc<D>, gate: DetectionGate) -> Self {
        Self { detector, gate }
    }

    pub fn detector(&self) -> &Arc<D> {
        &self.detector
    }

    pub fn gate(&self) -> &DetectionGate {
        &self.gate
    }

    /// Detect entities in every fragment of `document`.
    ///
    /// One task per fragment, each admitted through the gate. Results are
    /// collected in fragment order regardless of completion order. The first
    /// failing fragment fails the whole call; no partial entity list is ever
    /// returned.
    ///
    /// When this call is dropped or fails, detections still waiting for a
    /// permit give up. A detection already admitted runs to completion in
    /// its task and keeps its permit until the detector returns.
    pub async fn aggregate(
        &self,
        document: &str,
        fragments: &[Fragment],
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<Entity>> {
        let abandoned = CancellationToken::new();
        let _abandon_on_drop = abandoned.clone().drop_guard();

        let labels: Arc<[String]> = Arc::from(labels);
        let handles: Vec<_> = fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| {
                let labels = Arc::clone(&labels);
                self.spawn_detection(index, fragment, labels, threshold, abandoned.clone())
            })
            .collect();
        let per_fragment =
            try_join_all(handles.into_iter().map(|handle| async move { handle.await? })).await?;

        let mut entities = Vec::new();
        for (fragment, spans) in fragments.iter().zip(per_fragment) {
            for span in spans {
                entities.push(translate(document, fragment, span)?);
            }
        }

        debug!(
            fragment_count = fragments.len(),
            entity_count = entities.len(),
            "Aggregated detections"
        );
        Ok(entities)
    }

    fn spawn_detection(
        &self,
        index: usize,
        fragment: &Fragment,
        labels: Arc<[String]>,
        threshold: f32,
        abandoned: CancellationToken,
    ) -> JoinHandle<Result<Vec<DetectedSpan>>> {
        let detector = Arc::clone(&self.detector);
        let gate = self.gate.clone();
        let text = fragment.text.clone();
        let start = fragment.start;

        tokio::spawn(
            async move {
                let permit = tokio::select! {
                    permit = gate.acquire_owned() => permit?,
                    _ = abandoned.cancelled() => return Err(AnonymizerError::Cancelled),
                };
                debug!(fragment = index, start, len = text.len(), "Detecting entities");
                let spans = detector.detect(&text, &labels, threshold).await;
                drop(permit);
                spans
            }
            .in_current_span(),
        )
    }
}

/// Move a fragment-local span to document offsets.
///
/// The entity text is re-read from the document; the detector's view of the
/// fragment is never trusted for it.
pub fn translate(document: &str, fragment: &Fragment, span: DetectedSpan) -> Result<Entity> {
    let invalid = AnonymizerError::InvalidSpan {
        start: span.start,
        end: span.end,
        len: fragment.text.len(),
    };
    if span.end > fragment.text.len() {
        return Err(invalid);
    }

    Entity::from_document(
        document,
        fragment.start + span.start,
        fragment.start + span.end,
        span.label,
        span.score,
    )
    .ok_or(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDetector;
    use std::time::Duration;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_translate_adds_fragment_start() {
        let document = "Intro.\n\nJohn lives in Paris.";
        let fragment = Fragment::exact("John lives in Paris.", 8);

        let entity = translate(document, &fragment, DetectedSpan::new(14, 19, "LOCATION", 0.8)).unwrap();

        assert_eq!((entity.start, entity.end), (22, 27));
        assert_eq!(entity.text, "Paris");
    }

    #[test]
    fn test_translate_rejects_out_of_fragment_span() {
        let document = "abc def";
        let fragment = Fragment::exact("abc", 0);

        let err = translate(document, &fragment, DetectedSpan::new(1, 5, "X", 1.0)).unwrap_err();
        assert!(matches!(err, AnonymizerError::InvalidSpan { len: 3, .. }));

        let err = translate(document, &fragment, DetectedSpan::new(2, 2, "X", 1.0)).unwrap_err();
        assert!(matches!(err, AnonymizerError::InvalidSpan { .. }));
    }

    #[tokio::test]
    async fn test_aggregate_keeps_fragment_order() {
        let document = "Ann here.\n\nBob there.";
        let fragments = vec![Fragment::exact("Ann here.", 0), Fragment::exact("Bob there.", 11)];
        let detector = MockDetector::new()
            .with_entity("PERSON", "Ann", 0.9)
            .with_entity("PERSON", "Bob", 0.9);
        let aggregator = EntityAggregator::new(Arc::new(detector), DetectionGate::exclusive());

        let entities = aggregator
            .aggregate(document, &fragments, &labels(&["PERSON"]), 0.5)
            .await
            .unwrap();

        let found: Vec<_> = entities.iter().map(|e| (e.text.as_str(), e.start)).collect();
        assert_eq!(found, vec![("Ann", 0), ("Bob", 11)]);
    }

    #[tokio::test]
    async fn test_one_failing_fragment_fails_all() {
        let document = "fine text\n\nbroken text";
        let fragments = vec![Fragment::exact("fine text", 0), Fragment::exact("broken text", 11)];
        let detector = MockDetector::new()
            .with_entity("X", "text", 0.9)
            .with_failure_on("broken");
        let aggregator = EntityAggregator::new(Arc::new(detector), DetectionGate::exclusive());

        let result = aggregator
            .aggregate(document, &fragments, &labels(&["X"]), 0.5)
            .await;

        assert!(matches!(result, Err(AnonymizerError::Detection(_))));
    }

    #[tokio::test]
    async fn test_failed_aggregate_hands_every_permit_back() {
        let document = "broken one\n\nfine two\n\nfine three";
        let fragments = vec![
            Fragment::exact("broken one", 0),
            Fragment::exact("fine two", 12),
            Fragment::exact("fine three", 22),
        ];
        let detector = MockDetector::new()
            .with_latency(Duration::from_millis(20))
            .with_failure_on("broken");
        let gate = DetectionGate::exclusive();
        let aggregator = EntityAggregator::new(Arc::new(detector), gate.clone());

        let result = aggregator
            .aggregate(document, &fragments, &labels(&["X"]), 0.5)
            .await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(gate.available(), 1);
        assert_eq!(aggregator.detector().max_in_flight(), 1);
    }
}
