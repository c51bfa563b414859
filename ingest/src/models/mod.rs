//! Domain models for the csvnest ingestion pipeline.
//!
//! This module contains the data structures passed between stages:
//!
//! - [`FlatRecord`] - one CSV row keyed by dotted header path
//! - [`NestedRecord`] - the same row expanded into a tree
//! - [`Node`] / [`Leaf`] - tree nodes; leaves are text or number
//! - [`StorageRecord`] - fixed four-field shape for persistence
//! - [`Diagnostic`] - why a row was skipped, and where
//!
//! Records are ordered: keys keep the order in which they were first
//! inserted, and replacing a key keeps its original position.

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::RowError;

// =============================================================================
// Flat Record
// =============================================================================

/// Mapping from dotted field path to raw string value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    fields: Vec<(String, String)>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `path` to `value`.
    ///
    /// A repeated path overwrites the earlier value in place, so duplicate
    /// header names collide and the last column wins.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) {
        let path = path.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((path, value)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = FlatRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for FlatRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (path, value) in &self.fields {
            map.serialize_entry(path, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Leaf Values
// =============================================================================

/// A scalar value in a nested record.
///
/// Tagging is decided once, by the normalizer's coercion rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Text(String),
    Number(Number),
}

impl Leaf {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Leaf::Text(s) => Some(s),
            Leaf::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Leaf::Number(n) => Some(n),
            Leaf::Text(_) => None,
        }
    }

    /// Empty text and zero count as "no value" for storage checks.
    pub fn is_truthy(&self) -> bool {
        match self {
            Leaf::Text(s) => !s.is_empty(),
            Leaf::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Leaf::Text(s) => Value::String(s.clone()),
            Leaf::Number(n) => Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leaf::Text(s) => f.write_str(s),
            Leaf::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Leaf {
    fn from(s: &str) -> Self {
        Leaf::Text(s.to_string())
    }
}

impl From<i64> for Leaf {
    fn from(n: i64) -> Self {
        Leaf::Number(Number::from(n))
    }
}

// =============================================================================
// Nested Record
// =============================================================================

/// A node in a nested record: a leaf or a sub-record.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    Record(NestedRecord),
}

impl Node {
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Leaf(l) => Some(l),
            Node::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&NestedRecord> {
        match self {
            Node::Record(r) => Some(r),
            Node::Leaf(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Node::Leaf(l) => l.to_json(),
            Node::Record(r) => r.to_json(),
        }
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<NestedRecord> for Node {
    fn from(record: NestedRecord) -> Self {
        Node::Record(record)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(Leaf::Text(s)) => serializer.serialize_str(s),
            Node::Leaf(Leaf::Number(n)) => n.serialize(serializer),
            Node::Record(r) => r.serialize(serializer),
        }
    }
}

/// Ordered tree produced from one [`FlatRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRecord {
    entries: Vec<(String, Node)>,
}

impl NestedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `node`, returning the previous node if any.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let node = node.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, node)),
            None => {
                self.entries.push((key, node));
                None
            }
        }
    }

    /// Bind `node` at a path of segments, creating sub-records on the way.
    ///
    /// A leaf standing where a sub-record is needed is replaced (last write
    /// wins). An empty path is ignored.
    pub fn insert_path(&mut self, path: &[&str], node: impl Into<Node>) {
        if let Some((last, parents)) = path.split_last() {
            self.insert_under(parents, last, node.into());
        }
    }

    fn insert_under(&mut self, parents: &[&str], key: &str, node: Node) {
        let Some((head, rest)) = parents.split_first() else {
            self.insert(key, node);
            return;
        };
        match self.entries.iter_mut().find(|(k, _)| k.as_str() == *head) {
            Some((_, Node::Record(child))) => child.insert_under(rest, key, node),
            Some((_, slot)) => {
                let mut child = NestedRecord::new();
                child.insert_under(rest, key, node);
                *slot = Node::Record(child);
            }
            None => {
                let mut child = NestedRecord::new();
                child.insert_under(rest, key, node);
                self.entries.push((head.to_string(), Node::Record(child)));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    /// Look up a dotted path such as `name.firstName`.
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('.');
        let mut node = self.get(segments.next()?)?;
        for segment in segments {
            node = node.as_record()?.get(segment)?;
        }
        Some(node)
    }

    /// Leaf at a dotted path, if the path ends on a leaf.
    pub fn leaf_at(&self, path: &str) -> Option<&Leaf> {
        self.get_path(path).and_then(Node::as_leaf)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, n)| (k.clone(), n.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl IntoIterator for NestedRecord {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for NestedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

// =============================================================================
// Storage Record
// =============================================================================

/// The row shape handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StorageRecord {
    /// `firstName lastName`
    pub name: String,
    pub age: Number,
    pub address: Option<Node>,
    /// Every other top-level key; `None` when there are none.
    pub additional_info: Option<NestedRecord>,
}

impl StorageRecord {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "age": Value::Number(self.age.clone()),
            "address": self.address.as_ref().map_or(Value::Null, Node::to_json),
            "additional_info": self
                .additional_info
                .as_ref()
                .map_or(Value::Null, NestedRecord::to_json),
        })
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// A skipped row: 1-based source line (header is line 1) and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub reason: RowError,
}

impl Diagnostic {
    pub fn new(line: usize, reason: RowError) -> Self {
        Self { line, reason }
    }

    /// Stable machine-readable kind of the reason.
    pub fn kind(&self) -> &'static str {
        match self.reason {
            RowError::ColumnCountMismatch { .. } => "columnCountMismatch",
            RowError::MissingRequiredFields { .. } => "missingRequiredFields",
            RowError::MissingStorageFields { .. } => "missingStorageFields",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.reason)
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Diagnostic", 3)?;
        s.serialize_field("line", &self.line)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("message", &self.reason.to_string())?;
        s.end()
    }
}
