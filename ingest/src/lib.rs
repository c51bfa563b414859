//! # csvnest - CSV to nested JSON ingestion
//!
//! csvnest reads delimited user records whose headers are dotted paths
//! (`name.firstName`, `address.city`), validates them, expands them into
//! nested records and maps them to the shape a storage layer expects.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌───────────┐
//! │ CSV text │──▶│  Parser  │──▶│ Validator │──▶│ Normalizer │──▶│ Extractor │
//! │ (bytes)  │   │(tokenize)│   │ (required)│   │  (nested)  │   │ (storage) │
//! └──────────┘   └──────────┘   └───────────┘   └────────────┘   └───────────┘
//!                      │              │                                │
//!                      └──────────────┴──────── diagnostics ───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use csvnest::Ingestor;
//!
//! let report = Ingestor::default().ingest_file("users.csv")?;
//! println!("{} records, {} rows skipped", report.records.len(), report.diagnostics.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Row, document and entry point error types
//! - [`models`] - Flat, nested and storage records; diagnostics
//! - [`parser`] - Tokenizer, document parser, encoding detection
//! - [`validation`] - Required field checks
//! - [`transform`] - Normalizer, extractor and pipeline
//! - [`config`] - Runtime settings
//! - [`logs`] - Broadcast log channel

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Transformation
pub mod transform;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ConfigError, DocumentError, DocumentResult, IngestError, IngestResult, RowError, RowResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Diagnostic, FlatRecord, Leaf, NestedRecord, Node, StorageRecord};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_auto, decode_content, detect_encoding, parse, tokenize, ParsedDocument, ParsedRow,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, validate, RequiredFieldSet, DEFAULT_REQUIRED_FIELDS};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    extract, normalize, parse_number, IngestReport, Ingestor, NormalizedBatch, NormalizedRow,
};

// =============================================================================
// Re-exports - Config & Logs
// =============================================================================

pub use config::IngestConfig;
pub use logs::{LogEntry, LogLevel, LOG_BROADCASTER};
