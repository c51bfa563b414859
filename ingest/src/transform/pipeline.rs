//! High-level pipeline API for CSV ingestion.
//!
//! Combines every stage: decoding, parsing, validation, normalization and
//! storage extraction. Row-level problems become [`Diagnostic`]s and the
//! batch continues; document-level problems abort with an error and no
//! partial result.
//!
//! # Example
//!
//! ```rust,ignore
//! use csvnest::{IngestConfig, Ingestor};
//!
//! let ingestor = Ingestor::new(IngestConfig::default());
//! let report = ingestor.ingest_text("name.firstName,name.lastName,age\nJohn,Doe,25\n")?;
//!
//! assert_eq!(report.records[0].name, "John Doe");
//! for diag in &report.diagnostics {
//!     eprintln!("{}", diag);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use super::extractor::extract;
use super::normalizer::normalize;
use crate::config::IngestConfig;
use crate::error::{DocumentError, IngestResult};
use crate::logs::{log_info, log_success, log_warning, log_warning_indent};
use crate::models::{Diagnostic, NestedRecord, StorageRecord};
use crate::parser::{decode_auto, parse, ParsedDocument, ParsedRow};
use crate::validation::validate;

/// Encoding reported for text supplied directly.
const TEXT_ENCODING: &str = "utf-8";

/// Diagnostics echoed individually to the log before summarizing.
const MAX_LOGGED_DIAGNOSTICS: usize = 5;

/// A normalized record and the source line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub line: usize,
    pub record: NestedRecord,
}

/// Output of the pipeline up to normalization.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub headers: Vec<String>,
    pub rows: Vec<NormalizedRow>,
    /// Skipped rows from parsing and validation, in line order.
    pub diagnostics: Vec<Diagnostic>,
    /// Non-blank data lines in the document.
    pub rows_seen: usize,
}

impl NormalizedBatch {
    pub fn records(&self) -> impl Iterator<Item = &NestedRecord> {
        self.rows.iter().map(|r| &r.record)
    }
}

/// Result of a complete ingestion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    /// Unique identifier for this batch
    pub batch_id: Uuid,
    pub processed_at: DateTime<Utc>,
    /// Detected or assumed text encoding
    pub encoding: String,
    pub headers: Vec<String>,
    /// Non-blank data lines in the document
    pub rows_seen: usize,
    /// Records ready for storage, in source order
    pub records: Vec<StorageRecord>,
    /// First few normalized records, for previews
    pub sample: Vec<NestedRecord>,
    /// Skipped rows from every stage, in line order
    pub diagnostics: Vec<Diagnostic>,
}

impl IngestReport {
    pub fn records_processed(&self) -> usize {
        self.records.len()
    }

    pub fn rows_skipped(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Runs documents through the pipeline with a fixed configuration.
///
/// Holds no per-batch state; one instance can serve any number of calls.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Parse, validate and normalize, stopping before storage extraction.
    ///
    /// # Errors
    /// `EmptyDocument`, `NoHeaders`, or `NoValidRows` if no row survives
    /// validation.
    pub fn normalize_text(&self, text: &str) -> IngestResult<NormalizedBatch> {
        log_info("📖 Parsing CSV...");
        let doc = parse(text)?;
        log_success(format!(
            "Read {} columns, {} rows",
            doc.headers.len(),
            doc.rows_seen()
        ));

        let batch = self.validate_and_normalize(doc);
        report_diagnostics(&batch.diagnostics);

        if batch.rows.is_empty() {
            return Err(DocumentError::NoValidRows {
                skipped: batch.diagnostics.len(),
            }
            .into());
        }
        log_success(format!("Successfully parsed {} records", batch.rows.len()));
        Ok(batch)
    }

    /// Run the full pipeline on text.
    ///
    /// # Errors
    /// As [`Ingestor::normalize_text`]; `NoValidRows` also when every
    /// normalized record fails storage extraction.
    pub fn ingest_text(&self, text: &str) -> IngestResult<IngestReport> {
        self.ingest_decoded(text, TEXT_ENCODING.to_string())
    }

    /// Run the full pipeline on raw bytes, detecting the encoding.
    ///
    /// # Errors
    /// `InputTooLarge` above the configured limit, `Encoding` if the bytes
    /// cannot be decoded, then as [`Ingestor::ingest_text`].
    pub fn ingest_bytes(&self, bytes: &[u8]) -> IngestResult<IngestReport> {
        let (text, encoding) = self.decode(bytes)?;
        self.ingest_decoded(&text, encoding)
    }

    /// Check the size limit and decode bytes, returning `(text, encoding)`.
    pub fn decode(&self, bytes: &[u8]) -> IngestResult<(String, String)> {
        if bytes.len() > self.config.max_input_bytes {
            return Err(DocumentError::InputTooLarge {
                size: bytes.len(),
                limit: self.config.max_input_bytes,
            }
            .into());
        }

        let (text, encoding) = decode_auto(bytes)?;
        log_success(format!("Detected encoding: {}", encoding));
        Ok((text, encoding))
    }

    /// Read a file and run the full pipeline on it.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> IngestResult<IngestReport> {
        let path = path.as_ref();
        log_info(format!("Reading {}", path.display()));
        let bytes = std::fs::read(path)?;
        self.ingest_bytes(&bytes)
    }

    fn ingest_decoded(&self, text: &str, encoding: String) -> IngestResult<IngestReport> {
        let batch = self.normalize_text(text)?;

        log_info("🗄️  Extracting storage fields...");
        let mut diagnostics = batch.diagnostics;
        let mut records = Vec::with_capacity(batch.rows.len());
        let mut extraction_failures = Vec::new();
        for row in &batch.rows {
            match extract(&row.record) {
                Ok(record) => records.push(record),
                Err(reason) => extraction_failures.push(Diagnostic::new(row.line, reason)),
            }
        }
        report_diagnostics(&extraction_failures);
        diagnostics.extend(extraction_failures);
        diagnostics.sort_by_key(|d| d.line);

        if records.is_empty() {
            return Err(DocumentError::NoValidRows {
                skipped: diagnostics.len(),
            }
            .into());
        }
        log_success(format!("{} records ready for storage", records.len()));

        let sample = batch
            .rows
            .iter()
            .take(self.config.sample_size)
            .map(|r| r.record.clone())
            .collect();

        Ok(IngestReport {
            batch_id: Uuid::new_v4(),
            processed_at: Utc::now(),
            encoding,
            headers: batch.headers,
            rows_seen: batch.rows_seen,
            records,
            sample,
            diagnostics,
        })
    }

    fn validate_and_normalize(&self, doc: ParsedDocument) -> NormalizedBatch {
        let rows_seen = doc.rows_seen();
        let mut diagnostics = doc.diagnostics;
        let mut rows = Vec::with_capacity(doc.rows.len());

        for ParsedRow { line, record } in doc.rows {
            match validate(record, &self.config.required_fields) {
                Ok(valid) => rows.push(NormalizedRow {
                    line,
                    record: normalize(&valid),
                }),
                Err(reason) => diagnostics.push(Diagnostic::new(line, reason)),
            }
        }
        diagnostics.sort_by_key(|d| d.line);

        NormalizedBatch {
            headers: doc.headers,
            rows,
            diagnostics,
            rows_seen,
        }
    }
}

/// Log skipped rows, a few individually and then a count.
fn report_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    log_warning(format!("{} rows skipped", diagnostics.len()));
    for diag in diagnostics.iter().take(MAX_LOGGED_DIAGNOSTICS) {
        log_warning_indent(format!("{}. Skipping row.", diag), 1);
    }
    if diagnostics.len() > MAX_LOGGED_DIAGNOSTICS {
        log_warning_indent(
            format!("... +{} more", diagnostics.len() - MAX_LOGGED_DIAGNOSTICS),
            1,
        );
    }
}
