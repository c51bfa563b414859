//! Flat-to-nested normalization.
//!
//! Each dotted header path becomes a branch in a [`NestedRecord`]:
//!
//! ```text
//! name.firstName = John        {
//! name.lastName  = Doe    →      "name": { "firstName": "John", "lastName": "Doe" },
//! age            = 25            "age": 25
//!                              }
//! ```
//!
//! Leaf values are tagged here and nowhere else: a value is a number when
//! its key is `age` or when it is a complete numeric literal, otherwise it
//! is trimmed text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Number;

use crate::models::{FlatRecord, Leaf, NestedRecord};

/// Key whose value is always coerced to a number when possible.
pub const AGE_KEY: &str = "age";

/// Path separator in header names.
pub const PATH_SEPARATOR: char = '.';

/// Largest integer an f64 holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid decimal regex")
});

static PREFIXED_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0(?:([xX])([0-9a-fA-F]+)|([oO])([0-7]+)|([bB])([01]+))$")
        .expect("valid prefixed regex")
});

/// Expand a flat record into a nested one.
///
/// Paths are applied in record order. When a path needs a container where
/// an earlier path left a scalar, the scalar is replaced (last write wins):
/// `{"a": "1", "a.b": "2"}` becomes `{"a": {"b": 2}}`.
pub fn normalize(record: &FlatRecord) -> NestedRecord {
    let mut nested = NestedRecord::new();
    for (path, raw) in record.iter() {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let key = segments.last().copied().unwrap_or(path);
        nested.insert_path(&segments, coerce(key, raw));
    }
    nested
}

/// Tag a raw value according to its key.
///
/// A blank `age` counts as zero. Any other `age` that is not a numeric
/// literal stays text; the storage extractor rejects it later.
pub fn coerce(key: &str, raw: &str) -> Leaf {
    let trimmed = raw.trim();
    match parse_number(trimmed) {
        Some(n) => Leaf::Number(n),
        None if key == AGE_KEY && trimmed.is_empty() => Leaf::Number(Number::from(0)),
        None => Leaf::Text(trimmed.to_string()),
    }
}

/// Parse a complete numeric literal.
///
/// Accepts decimal forms with optional sign, fraction and exponent
/// (`12`, `-3.5`, `.5`, `1e3`, `007`) and `0x`/`0o`/`0b` integers.
/// Integral values within ±2^53 become integers.
pub fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = PREFIXED_LITERAL.captures(s) {
        let (radix, digits) = if let Some(d) = caps.get(2) {
            (16, d.as_str())
        } else if let Some(d) = caps.get(4) {
            (8, d.as_str())
        } else {
            (2, caps.get(6)?.as_str())
        };
        return match u64::from_str_radix(digits, radix) {
            Ok(v) if (v as f64) <= MAX_SAFE_INTEGER => Some(Number::from(v)),
            Ok(v) => Number::from_f64(v as f64),
            Err(_) => None,
        };
    }

    if !DECIMAL_LITERAL.is_match(s) {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    from_f64(value)
}

fn from_f64(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}
