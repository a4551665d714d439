use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{AnonymizerError, Result};
use crate::traits::detector::{EntityDetector, EntityModel};
use crate::types::entity::DetectedSpan;

/// Runs a synchronous [`EntityModel`] on tokio's blocking pool.
///
/// Inference never occupies a scheduler thread, so other requests keep
/// making progress while the model works.
pub struct BlockingDetector<M> {
    model: Arc<M>,
}

impl<M: EntityModel> BlockingDetector<M> {
    pub fn new(model: M) -> Self {
        Self::from_arc(Arc::new(model))
    }

    pub fn from_arc(model: Arc<M>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<M> {
        &self.model
    }
}

impl<M> Clone for BlockingDetector<M> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
        }
    }
}

#[async_trait]
impl<M: EntityModel> EntityDetector for BlockingDetector<M> {
    async fn detect(
        &self,
        text: &str,
        labels: &[String],
        threshold: f32,
    ) -> Result<Vec<DetectedSpan>> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();
        let labels = labels.to_vec();

        tokio::task::spawn_blocking(move || model.predict_entities(&text, &labels, threshold))
            .await?
            .map_err(AnonymizerError::Detection)
    }
}
