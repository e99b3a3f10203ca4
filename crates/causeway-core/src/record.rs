//! Transport-safe record shapes.
//!
//! [`ErrorRecord`] is what serializers produce. Deserializers read input
//! through [`RecordNode`] instead, so they can tolerate anything JSON can hold
//! and also cause graphs with cycles ([`RecordGraph`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::taxonomy::SubtypeTag;
use crate::types::Details;

// ─── ErrorRecord ──────────────────────────────────────────────────────────────

/// Serialized form of one error and, nested, its causes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Absent for generic (unclassified) errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype_tag: Option<SubtypeTag>,
    pub name: String,
    pub message: String,
    pub status_code: u16,
    pub code: String,
    #[serde(default)]
    pub details: Details,
    pub is_operational: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorRecord>>,
}

impl ErrorRecord {
    /// JSON value form. Infallible: details encode non-finite floats.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(tag) = self.subtype_tag {
            map.insert("subtypeTag".into(), Value::String(tag.name().to_string()));
        }
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("message".into(), Value::String(self.message.clone()));
        map.insert("statusCode".into(), Value::from(self.status_code));
        map.insert("code".into(), Value::String(self.code.clone()));
        map.insert("details".into(), self.details.to_json());
        map.insert("isOperational".into(), Value::Bool(self.is_operational));
        if let Some(stack) = &self.stack {
            map.insert("stack".into(), Value::String(stack.clone()));
        }
        if let Some(cause) = &self.cause {
            map.insert("cause".into(), cause.to_value());
        }
        Value::Object(map)
    }

    /// Number of records in this record's nested cause chain, itself included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Some(next) = current.cause.as_deref() {
            depth += 1;
            current = next;
        }
        depth
    }

    /// The records of the nested chain as a flat sequence, each with its
    /// `cause` removed.
    pub fn flatten(&self) -> Vec<ErrorRecord> {
        let mut out = Vec::with_capacity(self.depth());
        let mut current = Some(self);
        while let Some(record) = current {
            out.push(record.clone_without_cause());
            current = record.cause.as_deref();
        }
        out
    }

    fn clone_without_cause(&self) -> ErrorRecord {
        ErrorRecord {
            subtype_tag: self.subtype_tag,
            name: self.name.clone(),
            message: self.message.clone(),
            status_code: self.status_code,
            code: self.code.clone(),
            details: self.details.clone(),
            is_operational: self.is_operational,
            stack: self.stack.clone(),
            cause: None,
        }
    }
}

// ─── RecordNode ───────────────────────────────────────────────────────────────

/// Read-only view of one input record.
pub trait RecordNode: Sized {
    /// Raw value of a field other than `cause`.
    fn field(&self, name: &str) -> Option<&Value>;

    /// The record this one names as its cause, if record-shaped.
    fn cause(&self) -> Option<Self>;
}

impl<'a> RecordNode for &'a Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn cause(&self) -> Option<Self> {
        let value: &'a Value = *self;
        value.get("cause").filter(|c| c.is_object())
    }
}

// ─── RecordGraph ──────────────────────────────────────────────────────────────

/// Records whose cause links are assigned after the records exist, so they
/// may form cycles (a record can be its own cause).
#[derive(Debug, Clone, Default)]
pub struct RecordGraph {
    records: Vec<Value>,
    causes: Vec<Option<usize>>,
}

impl RecordGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record and return its index. Any embedded `cause` field is ignored.
    pub fn push(&mut self, record: Value) -> usize {
        self.records.push(record);
        self.causes.push(None);
        self.records.len() - 1
    }

    /// Point `from`'s cause at `to`. Returns `false` if either index is unknown.
    pub fn link(&mut self, from: usize, to: usize) -> bool {
        if to >= self.records.len() {
            return false;
        }
        match self.causes.get_mut(from) {
            Some(slot) => {
                *slot = Some(to);
                true
            }
            None => false,
        }
    }

    pub fn node(&self, index: usize) -> Option<LinkedRecord<'_>> {
        (index < self.records.len()).then_some(LinkedRecord { graph: self, index })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handle to one record in a [`RecordGraph`].
#[derive(Debug, Clone, Copy)]
pub struct LinkedRecord<'a> {
    graph: &'a RecordGraph,
    index: usize,
}

impl LinkedRecord<'_> {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<'a> RecordNode for LinkedRecord<'a> {
    fn field(&self, name: &str) -> Option<&Value> {
        if name == "cause" {
            return None;
        }
        self.graph.records.get(self.index)?.get(name)
    }

    fn cause(&self) -> Option<Self> {
        let next = (*self.graph.causes.get(self.index)?)?;
        self.graph.node(next)
    }
}
