//! Entity detector implementations.
//!
//! # Available Detectors
//!
//! - `BlockingDetector` - Adapts any synchronous `EntityModel` (e.g. a NER
//!   model binding) to the async `EntityDetector` trait
//! - `PatternDetector` - Regex detection of structured PII, no model needed
//! - `MockDetector` (in [`crate::testing`]) - For testing
//!
//! # Example
//!
//! ```rust,ignore
//! use anonymizer::detectors::{BlockingDetector, PatternDetector};
//!
//! let detector = BlockingDetector::new(PatternDetector::new());
//! let spans = detector.detect("mail me at a@b.org", &["email".into()], 0.5).await?;
//! ```

mod blocking;
mod pattern;

pub use blocking::BlockingDetector;
pub use pattern::{PatternDetector, PatternKind, PATTERN_SCORE};
