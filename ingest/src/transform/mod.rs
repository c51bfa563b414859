//! Transformation module.
//!
//! This module turns parsed rows into storage-ready records:
//! - Normalizer: dotted paths to nested records, numeric coercion
//! - Extractor: nested records to the storage shape
//! - Pipeline: the end-to-end entry points

pub mod extractor;
pub mod normalizer;
pub mod pipeline;

pub use extractor::extract;
pub use normalizer::{coerce, normalize, parse_number};
pub use pipeline::*;
