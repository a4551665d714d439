//! End-to-end anonymization.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::cache::MemoCache;
use crate::error::{AnonymizerError, Result};
use crate::pipeline::aggregate::EntityAggregator;
use crate::pipeline::chunker::TextChunker;
use crate::pipeline::exclude::ExclusionSet;
use crate::pipeline::gate::DetectionGate;
use crate::pipeline::resolve::resolve_conflicts;
use crate::pipeline::rewrite::rewrite;
use crate::text::{CachedNormalizer, CachedTokenCounter, LowercaseNormalizer, RegexSpanSplitter, WordTokenCounter};
use crate::traits::detector::EntityDetector;
use crate::traits::normalizer::Normalizer;
use crate::traits::text::{SpanSplitter, TokenCounter};
use crate::types::config::AnonymizerConfig;
use crate::types::request::AnonymizationRequest;
use crate::types::result::AnonymizationResult;

/// Chunk, detect, resolve and rewrite in one call.
///
/// Cheap to share behind an `Arc`; every request made through the same
/// anonymizer (or through anonymizers built with the same gate) competes for
/// the same detection permits.
pub struct Anonymizer<D> {
    chunker: TextChunker,
    aggregator: EntityAggregator<D>,
    normalizer: Arc<dyn Normalizer>,
}

impl<D: EntityDetector + 'static> Anonymizer<D> {
    /// Build with default collaborators for `config`.
    pub fn new(detector: D, config: AnonymizerConfig) -> Result<Self> {
        Self::builder(detector).with_config(config).build()
    }

    pub fn builder(detector: D) -> AnonymizerBuilder<D> {
        AnonymizerBuilder::new(Arc::new(detector))
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    pub fn gate(&self) -> &DetectionGate {
        self.aggregator.gate()
    }

    pub fn detector(&self) -> &Arc<D> {
        self.aggregator.detector()
    }

    /// Anonymize one document.
    ///
    /// Fails as a whole if any fragment's detection fails; no partially
    /// anonymized text is ever returned.
    pub async fn anonymize(&self, request: &AnonymizationRequest) -> Result<AnonymizationResult> {
        request.validate()?;

        let request_id = Uuid::new_v4();
        let span = info_span!(
            "anonymize",
            %request_id,
            text_len = request.text.len(),
            label_count = request.labels.len()
        );
        self.run(request).instrument(span).await
    }

    /// [`anonymize`](Self::anonymize), abandoned when `cancel` fires.
    ///
    /// Detections still queued at the gate are dropped. One already admitted
    /// finishes in its own task and holds its permit until the detector
    /// returns, so the next request never overlaps it.
    pub async fn anonymize_with_cancel(
        &self,
        request: &AnonymizationRequest,
        cancel: CancellationToken,
    ) -> Result<AnonymizationResult> {
        tokio::select! {
            result = self.anonymize(request) => result,
            _ = cancel.cancelled() => {
                info!("Anonymization cancelled");
                Err(AnonymizerError::Cancelled)
            }
        }
    }

    async fn run(&self, request: &AnonymizationRequest) -> Result<AnonymizationResult> {
        if request.labels.is_empty() {
            debug!("No labels requested, returning text unchanged");
            return Ok(AnonymizationResult::unchanged(&request.text));
        }

        let fragments = self.chunker.chunk_blocking(&request.text).await?;
        if fragments.is_empty() {
            debug!("Blank document, nothing to detect");
            return Ok(AnonymizationResult::unchanged(&request.text));
        }

        let entities = self
            .aggregator
            .aggregate(&request.text, &fragments, &request.labels, request.threshold)
            .await?;
        let detected = entities.len();

        let exclusions = ExclusionSet::new(&request.exclude);
        let entities = exclusions.filter(entities, self.normalizer.as_ref());
        let entities = resolve_conflicts(entities);
        debug!(detected, kept = entities.len(), "Resolved entities");

        let result = rewrite(&request.text, &entities);
        info!(
            fragment_count = fragments.len(),
            entity_count = entities.len(),
            placeholder_count = result.placeholder_count(),
            "Anonymization complete"
        );
        Ok(result)
    }
}

/// Builder for [`Anonymizer`] with injectable collaborators.
pub struct AnonymizerBuilder<D> {
    detector: Arc<D>,
    config: AnonymizerConfig,
    counter: Option<Arc<dyn TokenCounter>>,
    splitter: Option<Arc<dyn SpanSplitter>>,
    normalizer: Option<Arc<dyn Normalizer>>,
    gate: Option<DetectionGate>,
}

impl<D: EntityDetector + 'static> AnonymizerBuilder<D> {
    pub fn new(detector: Arc<D>) -> Self {
        Self {
            detector,
            config: AnonymizerConfig::default(),
            counter: None,
            splitter: None,
            normalizer: None,
            gate: None,
        }
    }

    pub fn with_config(mut self, config: AnonymizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this counter as-is; no cache is added around it.
    pub fn with_token_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn with_splitter(mut self, splitter: Arc<dyn SpanSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Use this normalizer as-is; no cache is added around it.
    pub fn with_normalizer(mut self, normalizer: Arc<dyn Normalizer>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Share an existing gate instead of creating one from the config.
    pub fn with_gate(mut self, gate: DetectionGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn build(self) -> Result<Anonymizer<D>> {
        self.config.validate()?;
        let config = self.config;

        let splitter: Arc<dyn SpanSplitter> = self
            .splitter
            .unwrap_or_else(|| Arc::new(RegexSpanSplitter::new()));

        let counter: Arc<dyn TokenCounter> = match self.counter {
            Some(counter) => counter,
            None => Arc::new(CachedTokenCounter::new(
                WordTokenCounter::with_splitter(splitter.clone()),
                Arc::new(MemoCache::bounded(config.token_cache_capacity)),
            )),
        };

        let normalizer: Arc<dyn Normalizer> = match self.normalizer {
            Some(normalizer) => normalizer,
            None => Arc::new(CachedNormalizer::new(
                LowercaseNormalizer,
                Arc::new(MemoCache::bounded(config.normalizer_cache_capacity)),
            )),
        };

        let gate = self
            .gate
            .unwrap_or_else(|| DetectionGate::new(config.detection_concurrency));

        let chunker = TextChunker::new(counter, splitter, config.max_tokens)
            .with_strategies(config.strategies.iter().copied());

        Ok(Anonymizer {
            chunker,
            aggregator: EntityAggregator::new(self.detector, gate),
            normalizer,
        })
    }
}
