//! Core trait abstractions for the anonymizer.
//!
//! These traits define the collaborators applications inject: the
//! detection model, the tokenizer's counting and word splitting, and the
//! normalizer used for exclusions.

pub mod detector;
pub mod normalizer;
pub mod text;
