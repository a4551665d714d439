//! Data types shared across the anonymization pipeline.

pub mod config;
pub mod entity;
pub mod fragment;
pub mod request;
pub mod result;
