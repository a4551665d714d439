//! Entity Anonymization Library
//!
//! Replaces named entities in free text with stable placeholders such as
//! `[PERSON_1]`, and returns the map needed to restore the original.
//!
//! # Design
//!
//! - The detection model is injected; the library never loads one
//! - Long documents are chunked to the model's token budget, detected
//!   fragment by fragment, and stitched back with document offsets
//! - One failing fragment fails the whole call; nothing half-anonymized
//!   is ever returned
//! - Offsets are UTF-8 byte offsets into the original document
//!
//! # Usage
//!
//! ```rust,ignore
//! use anonymizer::{Anonymizer, AnonymizerConfig, AnonymizationRequest};
//! use anonymizer::detectors::{BlockingDetector, PatternDetector};
//!
//! let detector = BlockingDetector::new(PatternDetector::new());
//! let anonymizer = Anonymizer::new(detector, AnonymizerConfig::default())?;
//!
//! let request = AnonymizationRequest::new("Mail john@acme.io", ["email"], 0.5);
//! let result = anonymizer.anonymize(&request).await?;
//! assert_eq!(result.text, "Mail [email_1]");
//! assert_eq!(result.restore(), "Mail john@acme.io");
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Injected collaborators (detector, token counter, splitter, normalizer)
//! - [`types`] - Requests, results, fragments, entities and config
//! - [`pipeline`] - Chunking, aggregation, conflict resolution and rewriting
//! - [`text`] - Reference token counter, splitter and normalizer
//! - [`detectors`] - Detector implementations (blocking adapter, regex patterns)
//! - [`cache`] - Bounded memoization shared by the text collaborators
//! - [`testing`] - Mock implementations for testing

pub mod cache;
pub mod detectors;
pub mod error;
pub mod pipeline;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AnonymizerError, BoxError, Result};
pub use traits::{
    detector::{EntityDetector, EntityModel},
    normalizer::Normalizer,
    text::{SpanSplitter, TokenCounter, WordSpan},
};
pub use types::{
    config::{AnonymizerConfig, SplitStrategy},
    entity::{DetectedSpan, Entity},
    fragment::Fragment,
    request::AnonymizationRequest,
    result::{AnonymizationMap, AnonymizationResult},
};

// Re-export pipeline components
pub use pipeline::{
    Anonymizer, AnonymizerBuilder, DetectionGate, EntityAggregator, ExclusionSet,
    PlaceholderMapper, TextChunker,
};

pub use cache::MemoCache;
