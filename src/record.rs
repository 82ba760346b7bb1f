use crate::level::Level;
use chrono::{DateTime, FixedOffset, Local};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// Call-site metadata attached to a record when the host captures it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Caller {
            function: function.into(),
            file: file.into(),
            line,
        }
    }
}

/// A field value - a closed set of primitive shapes. Anything else is
/// captured in its default string form via `FieldValue::display`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    /// Capture any displayable value as text.
    pub fn display(value: impl fmt::Display) -> Self {
        FieldValue::Str(value.to_string())
    }

    /// Textual form used for quoting decisions and output.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Str(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Int(n) => Cow::Owned(n.to_string()),
            FieldValue::Uint(n) => Cow::Owned(n.to_string()),
            FieldValue::Float(n) => Cow::Owned(n.to_string()),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Uint(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// One structured log event handed to the formatter. The formatter reads it;
/// it never mutates `fields`.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<FixedOffset>,
    /// User fields in insertion order. Insertion order is what "unsorted"
    /// output falls back to when sorting is disabled.
    pub fields: IndexMap<String, FieldValue>,
    pub caller: Option<Caller>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Record {
            level,
            message: message.into(),
            timestamp: Local::now().fixed_offset(),
            fields: IndexMap::new(),
            caller: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_text_forms() {
        assert_eq!(FieldValue::from("plain").as_text(), "plain");
        assert_eq!(FieldValue::from(42i64).as_text(), "42");
        assert_eq!(FieldValue::from(8080u64).as_text(), "8080");
        assert_eq!(FieldValue::from(3.5).as_text(), "3.5");
        assert_eq!(FieldValue::from(true).as_text(), "true");
    }

    #[test]
    fn test_display_fallback_uses_default_string_form() {
        let addr: std::net::IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(FieldValue::display(addr).as_text(), "127.0.0.1");
    }

    #[test]
    fn test_with_field_preserves_insertion_order() {
        let record = Record::new(Level::Info, "test")
            .with_field("zebra", 1i64)
            .with_field("alpha", 2i64);

        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zebra", "alpha"]);
    }
}
