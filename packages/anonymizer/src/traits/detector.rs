//! Entity detection traits.
//!
//! The detection model is an opaque scorer: given text, a label vocabulary
//! and a score threshold, it returns labelled spans local to that text.
//!
//! - [`EntityDetector`] is what the pipeline calls. It is async so that a
//!   slow model never blocks the scheduler.
//! - [`EntityModel`] is the synchronous shape most models have. Wrap one in
//!   [`BlockingDetector`](crate::detectors::BlockingDetector) to run it on
//!   the blocking pool.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{BoxError, Result};
use crate::types::entity::DetectedSpan;

/// Async entity detector used by the aggregator.
///
/// Implementations report spans with byte offsets relative to `text`.
/// Spans scoring below `threshold` should not be returned.
#[async_trait]
pub trait EntityDetector: Send + Sync {
    async fn detect(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>>;
}

#[async_trait]
impl<T: EntityDetector + ?Sized> EntityDetector for Arc<T> {
    async fn detect(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>> {
        (**self).detect(text, labels, threshold).await
    }
}

/// A synchronous, CPU or GPU bound entity model.
pub trait EntityModel: Send + Sync + 'static {
    fn predict_entities(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> std::result::Result<Vec<DetectedSpan>, BoxError>;
}
