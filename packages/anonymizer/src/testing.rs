//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the anonymizer
//! without loading a real detection model.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{AnonymizerError, Result};
use crate::traits::detector::EntityDetector;
use crate::types::entity::DetectedSpan;

/// A mock entity detector for testing.
///
/// Finds every occurrence of configured substrings, or returns fixed spans
/// for an exact fragment text. Tracks calls and the highest number of
/// detections that were in flight at the same moment.
#[derive(Default)]
pub struct MockDetector {
    /// Substring rules: (label, needle, score)
    rules: Arc<RwLock<Vec<(String, String, f32)>>>,

    /// Fixed spans keyed by exact fragment text
    spans: Arc<RwLock<HashMap<String, Vec<DetectedSpan>>>>,

    /// Fail any fragment containing this text
    failure_on: Option<String>,

    /// Simulated inference time
    latency: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockDetectorCall>>>,

    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

/// Record of a call made to the mock detector.
#[derive(Debug, Clone)]
pub struct MockDetectorCall {
    pub text: String,
    pub labels: Vec<String>,
    pub threshold: f32,
}

impl MockDetector {
    /// Create a mock that detects nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect every occurrence of `needle` as `label` with `score`.
    pub fn with_entity(self, label: impl Into<String>, needle: impl Into<String>, score: f32) -> Self {
        self.rules
            .write()
            .unwrap()
            .push((label.into(), needle.into(), score));
        self
    }

    /// Return `spans` when called with exactly `text`.
    pub fn with_spans(self, text: impl Into<String>, spans: Vec<DetectedSpan>) -> Self {
        self.spans.write().unwrap().insert(text.into(), spans);
        self
    }

    /// Fail every call whose text contains `needle`.
    pub fn with_failure_on(mut self, needle: impl Into<String>) -> Self {
        self.failure_on = Some(needle.into());
        self
    }

    /// Fail every call.
    pub fn failing(self) -> Self {
        self.with_failure_on("")
    }

    /// Sleep this long inside every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockDetectorCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn find_spans(&self, text: &str, labels: &[String], threshold: f32) -> Vec<DetectedSpan> {
        let wanted = |label: &str, score: f32| {
            score >= threshold && labels.iter().any(|l| l == label)
        };

        let mut found: Vec<DetectedSpan> = self
            .spans
            .read()
            .unwrap()
            .get(text)
            .map(|spans| {
                spans
                    .iter()
                    .filter(|s| wanted(s.label.as_str(), s.score))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for (label, needle, score) in self.rules.read().unwrap().iter() {
            if needle.is_empty() || !wanted(label.as_str(), *score) {
                continue;
            }
            for (start, matched) in text.match_indices(needle.as_str()) {
                found.push(DetectedSpan::new(start, start + matched.len(), label.clone(), *score));
            }
        }

        found
    }
}

/// Decrements the in-flight counter even when the call is dropped early.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntityDetector for MockDetector {
    async fn detect(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>> {
        self.calls.write().unwrap().push(MockDetectorCall {
            text: text.to_string(),
            labels: labels.to_vec(),
            threshold,
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(needle) = &self.failure_on {
            if text.contains(needle.as_str()) {
                return Err(AnonymizerError::detection(format!(
                    "mock detector failure on {} byte fragment",
                    text.len()
                )));
            }
        }

        Ok(self.find_spans(text, labels, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_finds_all_occurrences() {
        let mock = MockDetector::new().with_entity("PERSON", "John", 0.9);

        let spans = mock
            .detect("John and John", &labels(&["PERSON"]), 0.5)
            .await
            .unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!((spans[1].start, spans[1].end), (9, 13));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_respects_threshold_and_labels() {
        let mock = MockDetector::new()
            .with_entity("PERSON", "John", 0.3)
            .with_entity("ORG", "Acme", 0.9);

        let spans = mock
            .detect("John at Acme", &labels(&["PERSON"]), 0.5)
            .await
            .unwrap();

        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn test_failing() {
        let mock = MockDetector::new().failing();

        let result = mock.detect("anything", &labels(&["X"]), 0.5).await;

        assert!(matches!(result, Err(AnonymizerError::Detection(_))));
        assert_eq!(mock.max_in_flight(), 1);
    }
}
