//! Required-field validation for flat records.
//!
//! Runs before normalization, so required paths are matched against header
//! names exactly (`name.firstName`, not a nested lookup).
//!
//! # Example
//!
//! ```rust,ignore
//! use csvnest::{validate, FlatRecord, RequiredFieldSet};
//!
//! let record: FlatRecord = [("name.firstName", "John"), ("age", "")].into_iter().collect();
//! let err = validate(record, &RequiredFieldSet::default()).unwrap_err();
//! // Missing required fields: name.lastName, age
//! println!("{}", err);
//! ```

use crate::error::{RowError, RowResult};
use crate::models::FlatRecord;

/// Paths every accepted record must carry with a non-empty value.
pub const DEFAULT_REQUIRED_FIELDS: [&str; 3] = ["name.firstName", "name.lastName", "age"];

/// Ordered set of required dotted paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFieldSet {
    paths: Vec<String>,
}

impl RequiredFieldSet {
    /// Build from paths, dropping blanks and repeats but keeping order.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<String> = Vec::new();
        for path in paths {
            let path = path.as_ref().trim();
            if !path.is_empty() && !set.iter().any(|p| p == path) {
                set.push(path.to_string());
            }
        }
        Self { paths: set }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Required paths absent from `record` or bound to `""`, in set order.
    pub fn missing_from(&self, record: &FlatRecord) -> Vec<String> {
        self.paths
            .iter()
            .filter(|path| record.get(path).map_or(true, str::is_empty))
            .cloned()
            .collect()
    }
}

impl Default for RequiredFieldSet {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_FIELDS)
    }
}

/// Accept `record` if every required path is present and non-empty.
///
/// # Errors
/// [`RowError::MissingRequiredFields`] listing every failing path.
pub fn validate(record: FlatRecord, required: &RequiredFieldSet) -> RowResult<FlatRecord> {
    let missing = required.missing_from(&record);
    if missing.is_empty() {
        Ok(record)
    } else {
        Err(RowError::MissingRequiredFields { fields: missing })
    }
}

/// Quick check without consuming the record.
pub fn is_valid(record: &FlatRecord, required: &RequiredFieldSet) -> bool {
    required.missing_from(record).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(pairs: &[(&str, &str)]) -> FlatRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_valid_record_passes_through() {
        let row = record(&[("name.firstName", "John"), ("name.lastName", "Doe"), ("age", "25")]);
        let out = validate(row.clone(), &RequiredFieldSet::default()).unwrap();
        assert_eq!(out, row);
    }

    #[test]
    fn test_lists_every_missing_field() {
        let row = record(&[("name.firstName", "John"), ("age", "")]);
        let err = validate(row, &RequiredFieldSet::default()).unwrap_err();
        assert_eq!(
            err,
            RowError::MissingRequiredFields {
                fields: vec!["name.lastName".into(), "age".into()]
            }
        );
    }

    #[test]
    fn test_nested_lookup_is_not_used() {
        // "name" alone does not satisfy "name.firstName".
        let row = record(&[("name", "John Doe"), ("age", "25")]);
        assert!(!is_valid(&row, &RequiredFieldSet::default()));
    }

    #[test]
    fn test_whitespace_value_counts_as_present() {
        // The parser trims values, so this only arises for hand-built records.
        let row = record(&[("name.firstName", " "), ("name.lastName", "Doe"), ("age", "1")]);
        assert!(is_valid(&row, &RequiredFieldSet::default()));
    }

    #[test]
    fn test_custom_set_dedups_and_keeps_order() {
        let set = RequiredFieldSet::new(["email", " age ", "email", ""]);
        assert_eq!(set.paths(), &["email".to_string(), "age".to_string()]);
    }

    #[test]
    fn test_empty_set_accepts_anything() {
        let set = RequiredFieldSet::new(Vec::<String>::new());
        assert!(set.is_empty());
        assert!(is_valid(&FlatRecord::new(), &set));
    }

    proptest! {
        #[test]
        fn prop_reports_exactly_missing_in_set_order(
            mask in proptest::collection::vec(any::<(bool, bool)>(), 3)
        ) {
            // For each required path: (present?, non-empty?)
            let mut row = FlatRecord::new();
            let mut expected = Vec::new();
            for (path, (present, filled)) in DEFAULT_REQUIRED_FIELDS.iter().zip(&mask) {
                if *present {
                    row.insert(*path, if *filled { "x" } else { "" });
                }
                if !(*present && *filled) {
                    expected.push(path.to_string());
                }
            }
            row.insert("address.city", "Paris");

            match validate(row, &RequiredFieldSet::default()) {
                Ok(_) => prop_assert!(expected.is_empty()),
                Err(RowError::MissingRequiredFields { fields }) => {
                    prop_assert_eq!(fields, expected)
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
    }
}
