//! Core types for the Causeway error model.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::chain;
use crate::stack::{self, StackFilter};
use crate::taxonomy::{Classification, SubtypeTag};

/// Code carried by errors that have no taxonomy classification.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Status code used when nothing better is known.
pub const DEFAULT_STATUS_CODE: u16 = 500;

/// Status codes a value may carry. Anything else falls back to the subtype
/// default at construction and on read.
pub const STATUS_CODE_RANGE: std::ops::RangeInclusive<u16> = 100..=999;

/// Key of the single-entry object that stands in for a non-finite float.
pub const NON_FINITE_KEY: &str = "$nonFinite";

/// Replacement for detail values that could not be converted.
pub const UNSERIALIZABLE: &str = "[Unserializable]";

/// Replacement for detail values nested deeper than [`MAX_DETAIL_DEPTH`].
pub const TRUNCATED: &str = "[Truncated]";

/// Nesting limit applied when reading details from untrusted input.
pub const MAX_DETAIL_DEPTH: usize = 32;

// ─── DetailValue ──────────────────────────────────────────────────────────────

/// A single value inside an error's structured details.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    /// May be NaN or infinite; encoded with [`NON_FINITE_KEY`] on the wire.
    Float(f64),
    Str(String),
    List(Vec<DetailValue>),
    Map(Details),
}

impl DetailValue {
    /// Read a detail value from JSON, capping nesting at [`MAX_DETAIL_DEPTH`].
    pub fn from_json(value: &Value) -> Self {
        Self::from_json_at(value, 0)
    }

    fn from_json_at(value: &Value, depth: usize) -> Self {
        if depth > MAX_DETAIL_DEPTH {
            return Self::Str(TRUNCATED.to_string());
        }
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(u)) => Self::UInt(u),
                (None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Str(s.clone()),
            Value::Array(items) => Self::List(
                items
                    .iter()
                    .map(|item| Self::from_json_at(item, depth + 1))
                    .collect(),
            ),
            Value::Object(map) => match decode_non_finite(map) {
                Some(f) => Self::Float(f),
                None => Self::Map(Details::from_json_map_at(map, depth + 1)),
            },
        }
    }

    /// Transport-safe JSON form. Never fails: non-finite floats become
    /// `{"$nonFinite": "NaN" | "Infinity" | "-Infinity"}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::UInt(u) => Value::from(*u),
            Self::Float(f) => match Number::from_f64(*f) {
                Some(n) => Value::Number(n),
                None => encode_non_finite(*f),
            },
            Self::Str(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(details) => details.to_json(),
        }
    }

    /// Numeric payload as a float (integers are widened).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Details> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

fn encode_non_finite(f: f64) -> Value {
    let tag = if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    };
    let mut map = Map::with_capacity(1);
    map.insert(NON_FINITE_KEY.to_string(), Value::String(tag.to_string()));
    Value::Object(map)
}

fn decode_non_finite(map: &Map<String, Value>) -> Option<f64> {
    if map.len() != 1 {
        return None;
    }
    match map.get(NON_FINITE_KEY)?.as_str()? {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Float(v) if !v.is_finite() => write!(f, "{v}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for DetailValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DetailValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

impl From<bool> for DetailValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for DetailValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for DetailValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for DetailValue {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u64> for DetailValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::UInt(v), Self::Int)
    }
}

impl From<f64> for DetailValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for DetailValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<DetailValue>> for DetailValue {
    fn from(v: Vec<DetailValue>) -> Self {
        Self::List(v)
    }
}

impl From<Details> for DetailValue {
    fn from(v: Details) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<DetailValue>> From<Option<T>> for DetailValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ─── Details ──────────────────────────────────────────────────────────────────

/// Structured, insertion-ordered details attached to an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Details(IndexMap<String, DetailValue>);

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DetailValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DetailValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert any serializable value. Values that fail to serialize (e.g. maps
    /// with non-string keys) are stored as `"[Unserializable]"` instead.
    ///
    /// Note that `serde_json` turns non-finite floats into `null` here; insert
    /// them with [`insert`](Self::insert) to keep them.
    pub fn insert_serialized<T: Serialize + ?Sized>(&mut self, key: impl Into<String>, value: &T) {
        let converted = match serde_json::to_value(value) {
            Ok(v) => DetailValue::from_json(&v),
            Err(_) => DetailValue::Str(UNSERIALIZABLE.to_string()),
        };
        self.0.insert(key.into(), converted);
    }

    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DetailValue)> {
        self.0.iter()
    }

    /// Read details from any JSON value. Anything other than an object
    /// yields empty details.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_json_map_at(map, 0),
            _ => Self::default(),
        }
    }

    fn from_json_map_at(map: &Map<String, Value>, depth: usize) -> Self {
        Self(
            map.iter()
                .map(|(k, v)| (k.clone(), DetailValue::from_json_at(v, depth)))
                .collect(),
        )
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, DetailValue)> for Details {
    fn from_iter<I: IntoIterator<Item = (String, DetailValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Details {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

// ─── ErrorParts ───────────────────────────────────────────────────────────────

/// Inputs accepted by a taxonomy factory. Unset fields take the subtype's
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct ErrorParts {
    pub message: String,
    /// Display name; only honoured for [`SubtypeTag::Base`], which is what
    /// unrecognised subtypes fall back to.
    pub name: Option<String>,
    pub status_code: Option<u16>,
    pub code: Option<String>,
    pub details: Details,
    pub is_operational: Option<bool>,
    /// Explicit display stack. When `None` one is captured at construction.
    pub stack: Option<String>,
    pub cause: Option<ErrorValue>,
}

impl ErrorParts {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

// ─── ErrorValue ───────────────────────────────────────────────────────────────

/// An immutable, classified error with an optional owned cause.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    subtype: Option<SubtypeTag>,
    name: String,
    message: String,
    status_code: u16,
    code: String,
    details: Details,
    is_operational: bool,
    stack: Option<String>,
    cause: Option<Box<ErrorValue>>,
}

impl ErrorValue {
    /// Start building an error of the given subtype.
    pub fn builder(subtype: SubtypeTag, message: impl Into<String>) -> ErrorValueBuilder {
        ErrorValueBuilder {
            subtype,
            parts: ErrorParts::new(message),
        }
    }

    /// Construct a value of `subtype`, filling unset parts from its taxonomy
    /// defaults.
    pub fn from_parts(subtype: SubtypeTag, parts: ErrorParts) -> Self {
        let defaults = subtype.classification();
        let name = match subtype {
            SubtypeTag::Base => parts
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| subtype.name().to_string()),
            _ => subtype.name().to_string(),
        };
        let stack = parts
            .stack
            .unwrap_or_else(|| capture_stack(&name, &parts.message));
        let value = Self {
            subtype: Some(subtype),
            name,
            message: parts.message,
            status_code: parts
                .status_code
                .filter(|s| STATUS_CODE_RANGE.contains(s))
                .unwrap_or(defaults.status_code),
            code: parts
                .code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| defaults.code.to_string()),
            details: parts.details,
            is_operational: parts.is_operational.unwrap_or(defaults.is_operational),
            stack: Some(stack),
            cause: None,
        };
        match parts.cause {
            Some(cause) => value.with_cause(cause),
            None => value,
        }
    }

    /// An unclassified error carrying only a name, message and stack.
    pub fn generic(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let message = message.into();
        let stack = capture_stack(&name, &message);
        Self {
            subtype: None,
            name,
            message,
            status_code: DEFAULT_STATUS_CODE,
            code: UNKNOWN_ERROR_CODE.to_string(),
            details: Details::new(),
            is_operational: false,
            stack: Some(stack),
            cause: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::builder(SubtypeTag::Validation, message).build()
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::builder(SubtypeTag::NotFound, message).build()
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::builder(SubtypeTag::Unauthorized, message).build()
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::builder(SubtypeTag::Forbidden, message).build()
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::builder(SubtypeTag::InternalServer, message).build()
    }

    /// Attach `cause`, consuming `self`. The cause's clean stack is appended to
    /// the display stack after a `Caused by:` line unless that exact segment is
    /// already present.
    pub fn with_cause(mut self, cause: ErrorValue) -> Self {
        let cause_stack = cause.clean_stack_with(&StackFilter::default());
        let own = self.stack.take().unwrap_or_else(|| self.header());
        self.stack = Some(if stack::has_caused_by(&own, &cause_stack) {
            own
        } else {
            stack::join_caused_by(&own, &cause_stack)
        });
        self.cause = Some(Box::new(cause));
        self
    }

    /// Replace the display stack, consuming `self`.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// `None` for generic errors.
    pub fn subtype(&self) -> Option<SubtypeTag> {
        self.subtype
    }

    pub fn is_classified(&self) -> bool {
        self.subtype.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn is_operational(&self) -> bool {
        self.is_operational
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn cause(&self) -> Option<&ErrorValue> {
        self.cause.as_deref()
    }

    /// The taxonomy defaults of this value's subtype, if classified.
    pub fn classification(&self) -> Option<Classification> {
        self.subtype.map(SubtypeTag::classification)
    }

    /// `"<Name>: <message>"`, or just the name when the message is empty.
    pub fn header(&self) -> String {
        stack::synthetic_header(&self.name, &self.message)
    }

    /// Bounded, cycle-safe cause chain starting at `self`.
    pub fn error_chain(&self) -> Vec<&ErrorValue> {
        chain::walk(self)
    }

    /// Last element of [`error_chain`](Self::error_chain).
    pub fn root_cause(&self) -> &ErrorValue {
        chain::root_cause(self)
    }

    /// Display stack with library and dependency frames removed.
    pub fn clean_stack(&self) -> String {
        self.clean_stack_with(&StackFilter::default())
    }

    pub fn clean_stack_with(&self, filter: &StackFilter) -> String {
        match &self.stack {
            Some(s) => filter.clean(s),
            None => self.header(),
        }
    }
}

fn capture_stack(name: &str, message: &str) -> String {
    let header = stack::synthetic_header(name, message);
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => format!("{header}\n{backtrace}"),
        _ => header,
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

impl std::error::Error for ErrorValue {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

// ─── ErrorValueBuilder ────────────────────────────────────────────────────────

/// Builder returned by [`ErrorValue::builder`].
#[derive(Debug, Clone)]
pub struct ErrorValueBuilder {
    subtype: SubtypeTag,
    parts: ErrorParts,
}

impl ErrorValueBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.parts.name = Some(name.into());
        self
    }

    /// Values outside [`STATUS_CODE_RANGE`] are ignored in favour of the
    /// subtype default.
    pub fn status_code(mut self, status_code: u16) -> Self {
        self.parts.status_code = Some(status_code);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.parts.code = Some(code.into());
        self
    }

    pub fn details(mut self, details: Details) -> Self {
        self.parts.details = details;
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<DetailValue>) -> Self {
        self.parts.details.insert(key, value);
        self
    }

    pub fn operational(mut self, is_operational: bool) -> Self {
        self.parts.is_operational = Some(is_operational);
        self
    }

    pub fn stack(mut self, stack: impl Into<String>) -> Self {
        self.parts.stack = Some(stack.into());
        self
    }

    pub fn cause(mut self, cause: ErrorValue) -> Self {
        self.parts.cause = Some(cause);
        self
    }

    pub fn build(self) -> ErrorValue {
        ErrorValue::from_parts(self.subtype, self.parts)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
