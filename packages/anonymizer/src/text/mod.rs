//! Reference implementations of the text collaborators.
//!
//! - `RegexSpanSplitter` - word splitting with byte offsets
//! - `WordTokenCounter` / `CachedTokenCounter` - token counting
//! - `LowercaseNormalizer` / `CachedNormalizer` - exclusion normalization

mod counter;
mod normalizer;
mod splitter;

pub use counter::{CachedTokenCounter, WordTokenCounter};
pub use normalizer::{CachedNormalizer, LowercaseNormalizer};
pub use splitter::RegexSpanSplitter;
