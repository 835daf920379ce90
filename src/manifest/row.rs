use std::borrow::Cow;
use std::fmt;

use super::error::ParseError;

/// A single field value: decoded text, or the untouched bytes in raw mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Raw(Vec<u8>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Text(s) => s.as_bytes(),
            Value::Raw(b) => b,
        }
    }

    /// Text view of the value; raw bytes are decoded lossily.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s),
            Value::Raw(b) => String::from_utf8_lossy(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// One data record keyed by header name, in column order.
///
/// Keys are the header names; columns beyond the header list get `_<index>`
/// and positional mode (`headers = false`) uses the bare index. A repeated
/// header keeps its first position and takes the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, Value)>,
    byte_offset: Option<u64>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text of a field, or `None` when the column is missing.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(Value::to_text)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Absolute offset of the record's first byte in the input stream.
    /// Only set when `output_byte_offset` is enabled.
    pub fn byte_offset(&self) -> Option<u64> {
        self.byte_offset
    }

    pub(crate) fn set_byte_offset(&mut self, offset: u64) {
        self.byte_offset = Some(offset);
    }
}

/// Something the tokenizer reports while consuming input.
#[derive(Debug)]
pub enum Event {
    /// Headers were established. Emitted at most once, and only when they
    /// were inferred from the input. `None` marks a column dropped by
    /// `map_headers`.
    Headers(Vec<Option<String>>),
    Row(Row),
    /// A recoverable per-record error; parsing continues.
    Error(ParseError),
}

impl Event {
    pub fn into_row(self) -> Option<Row> {
        match self {
            Event::Row(row) => Some(row),
            _ => None,
        }
    }
}
