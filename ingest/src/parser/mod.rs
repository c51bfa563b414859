//! CSV document parsing.
//!
//! Turns raw text into [`FlatRecord`]s keyed by header name. Rows whose width
//! does not match the header are skipped and reported as [`Diagnostic`]s;
//! only document-level problems are errors.
//!
//! - [`tokenizer`] - quote-aware line splitting
//! - [`decode`] - encoding detection for raw bytes

pub mod decode;
pub mod tokenizer;

pub use decode::{decode_auto, decode_content, detect_encoding};
pub use tokenizer::tokenize;

use crate::error::{DocumentError, DocumentResult, RowError};
use crate::models::{Diagnostic, FlatRecord};

/// A data row that matched the header width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// 1-based line number in the source text (header is line 1).
    pub line: usize,
    pub record: FlatRecord,
}

/// Result of parsing one document.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// Column headers, in order.
    pub headers: Vec<String>,
    /// Rows that matched the header width, in source order.
    pub rows: Vec<ParsedRow>,
    /// Rows that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedDocument {
    /// Flat records without line numbers.
    pub fn records(&self) -> impl Iterator<Item = &FlatRecord> {
        self.rows.iter().map(|r| &r.record)
    }

    /// Number of non-blank data lines seen, kept or not.
    pub fn rows_seen(&self) -> usize {
        self.rows.len() + self.diagnostics.len()
    }
}

/// Parse CSV text into flat records.
///
/// Lines end with `\n` or `\r\n`. Blank data lines are skipped without a
/// diagnostic.
///
/// # Errors
/// - [`DocumentError::EmptyDocument`] if the text has no lines
/// - [`DocumentError::NoHeaders`] if the header line is blank
///
/// # Example
/// ```ignore
/// use csvnest::parse;
///
/// let doc = parse("name.firstName,age\nAlice,30\nBob\n").unwrap();
/// assert_eq!(doc.rows.len(), 1);
/// assert_eq!(doc.diagnostics.len(), 1);
/// ```
pub fn parse(text: &str) -> DocumentResult<ParsedDocument> {
    let mut lines = text.lines();

    let header_line = lines.next().ok_or(DocumentError::EmptyDocument)?;
    if header_line.trim().is_empty() {
        return Err(DocumentError::NoHeaders);
    }
    let headers = tokenize(header_line);

    let mut doc = ParsedDocument {
        headers,
        ..Default::default()
    };

    for (idx, raw) in lines.enumerate() {
        let line_num = idx + 2; // +1 for 0-index, +1 for header
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let values = tokenize(line);
        if values.len() != doc.headers.len() {
            doc.diagnostics.push(Diagnostic::new(
                line_num,
                RowError::ColumnCountMismatch {
                    expected: doc.headers.len(),
                    actual: values.len(),
                },
            ));
            continue;
        }

        let record: FlatRecord = doc.headers.iter().cloned().zip(values).collect();
        doc.rows.push(ParsedRow {
            line: line_num,
            record,
        });
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name.firstName,name.lastName,age";

    #[test]
    fn test_simple_document() {
        let doc = parse(&format!("{}\nJohn,Doe,25\nJane,Smith,31\n", HEADER)).unwrap();

        assert_eq!(doc.headers, vec!["name.firstName", "name.lastName", "age"]);
        assert_eq!(doc.rows.len(), 2);
        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.rows[0].line, 2);
        assert_eq!(doc.rows[0].record.get("name.firstName"), Some("John"));
        assert_eq!(doc.rows[1].record.get("age"), Some("31"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = parse("a,b\r\n1,2\r\n3,4\r\n").unwrap();
        assert_eq!(doc.headers, vec!["a", "b"]);
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[1].record.get("b"), Some("4"));
    }

    #[test]
    fn test_blank_lines_skipped_silently() {
        let doc = parse("a,b\n1,2\n\n   \n3,4").unwrap();
        assert_eq!(doc.rows.len(), 2);
        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.rows[1].line, 5);
    }

    #[test]
    fn test_column_mismatch_skipped_with_diagnostic() {
        let text = format!("{}\nJohn,Doe,25\nJane,Smith\nBob,Stone,40,extra", HEADER);
        let doc = parse(&text).unwrap();

        assert_eq!(doc.rows.len(), 1);
        assert_eq!(
            doc.diagnostics,
            vec![
                Diagnostic::new(3, RowError::ColumnCountMismatch { expected: 3, actual: 2 }),
                Diagnostic::new(4, RowError::ColumnCountMismatch { expected: 3, actual: 4 }),
            ]
        );
        assert_eq!(doc.rows_seen(), 3);
    }

    #[test]
    fn test_quoted_commas_keep_row_width() {
        let doc = parse(&format!("{}\n\"Alice, the Great\",Brown,35", HEADER)).unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].record.get("name.firstName"), Some("Alice, the Great"));
    }

    #[test]
    fn test_duplicate_headers_collide() {
        let doc = parse("a,a,b\n1,2,3").unwrap();
        let record = &doc.rows[0].record;
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some("2"));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let doc = parse(&format!("{}\n", HEADER)).unwrap();
        assert!(doc.rows.is_empty());
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_document_error() {
        assert_eq!(parse("").unwrap_err(), DocumentError::EmptyDocument);
    }

    #[test]
    fn test_blank_header_error() {
        assert_eq!(parse("\nJohn,Doe,25").unwrap_err(), DocumentError::NoHeaders);
        assert_eq!(parse("   \n").unwrap_err(), DocumentError::NoHeaders);
    }

    #[test]
    fn test_quoted_header_names() {
        let doc = parse("\"name.firstName\", \"age\"\nAnn,22").unwrap();
        assert_eq!(doc.headers, vec!["name.firstName", "age"]);
        assert_eq!(doc.rows[0].record.get("age"), Some("22"));
    }
}
