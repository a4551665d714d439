//! Anonymization pipeline.
//!
//! The stages run in order for every request:
//!
//! 1. [`TextChunker`] - split the document into budget-sized fragments
//! 2. [`EntityAggregator`] - detect per fragment behind the [`DetectionGate`]
//! 3. [`ExclusionSet`] - drop entities the caller wants kept
//! 4. [`resolve_conflicts`] - one entity per position, no overlaps
//! 5. [`rewrite`] - splice placeholders and build the reverse map
//!
//! [`Anonymizer`] wires them together.

pub mod aggregate;
pub mod anonymizer;
pub mod chunker;
pub mod exclude;
pub mod gate;
pub mod resolve;
pub mod rewrite;
pub mod strategy;

pub use aggregate::{translate, EntityAggregator};
pub use anonymizer::{Anonymizer, AnonymizerBuilder};
pub use chunker::TextChunker;
pub use exclude::ExclusionSet;
pub use gate::DetectionGate;
pub use resolve::{dedup_by_position, resolve_conflicts, resolve_overlaps};
pub use rewrite::{rewrite, PlaceholderMapper};
