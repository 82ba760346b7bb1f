use crate::error::ProcessingError;
use crate::level::Level;
use crate::record::{FieldValue, Record};
use chrono::{DateTime, FixedOffset, Local};
use serde_json::Value;

/// Conventional key spellings recognized when lifting JSON objects into
/// records. First match wins and the matched key is consumed; any other
/// spelling stays a user field.
pub const TIMESTAMP_KEYS: &[&str] = &["ts", "timestamp", "time", "@t", "at", "datetime", "date"];
pub const LEVEL_KEYS: &[&str] = &[
    "level",
    "loglevel",
    "log_level",
    "lvl",
    "severity",
    "levelname",
    "@l",
];
pub const MESSAGE_KEYS: &[&str] = &["message", "msg", "@m", "@message", "text", "content"];

/// Parses JSON Lines input into records.
#[derive(Debug, Clone, Default)]
pub struct JsonlRecordParser {
    /// Only keep these user fields, in this order.
    pub keys: Option<Vec<String>>,
    /// Drop these user fields.
    pub remove_keys: Option<Vec<String>>,
}

impl JsonlRecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one input line into a record. `line_number` is 1-based and
    /// only used for error reporting.
    pub fn parse_line(&self, text: &str, line_number: usize) -> Result<Record, ProcessingError> {
        let value: Value = serde_json::from_str(text.trim()).map_err(|source| {
            ProcessingError::JsonError {
                line: line_number,
                source,
            }
        })?;

        let Value::Object(mut map) = value else {
            return Err(ProcessingError::NotAnObject { line: line_number });
        };

        let timestamp = extract_timestamp(&mut map);
        let level = extract_level(&mut map);
        let message = extract_message(&mut map);

        let mut record = Record::new(level, message).with_timestamp(timestamp);

        match &self.keys {
            Some(key_list) => {
                // --keys order wins over input order; missing keys are skipped
                for key in key_list {
                    if let Some(value) = map.get(key.as_str()) {
                        record.fields.insert(key.clone(), field_value(value));
                    }
                }
            }
            None => {
                for (key, value) in &map {
                    record.fields.insert(key.clone(), field_value(value));
                }
            }
        }

        if let Some(remove_keys) = &self.remove_keys {
            for key in remove_keys {
                record.fields.shift_remove(key.as_str());
            }
        }

        Ok(record)
    }
}

/// Map a JSON value onto the closed field value set.
fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::String(s) => FieldValue::Str(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                FieldValue::Uint(u)
            } else {
                FieldValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Null => FieldValue::Str(String::new()),
        other => {
            FieldValue::Str(serde_json::to_string(other).unwrap_or_else(|_| "null".to_string()))
        }
    }
}

fn extract_timestamp(map: &mut serde_json::Map<String, Value>) -> DateTime<FixedOffset> {
    for &key in TIMESTAMP_KEYS {
        if matches!(map.get(key), Some(Value::String(_))) {
            if let Some(Value::String(text)) = map.shift_remove(key) {
                if let Some(timestamp) = parse_timestamp(&text) {
                    return timestamp;
                }
                // Recognized key but unparseable value: consume it and stamp
                // the record with the conversion time.
                break;
            }
        }
    }
    Local::now().fixed_offset()
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp);
    }
    dateparser::parse(text).ok().map(|utc| utc.fixed_offset())
}

fn extract_level(map: &mut serde_json::Map<String, Value>) -> Level {
    for &key in LEVEL_KEYS {
        let text = match map.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        map.shift_remove(key);
        return Level::parse_or_info(&text);
    }
    Level::Info
}

fn extract_message(map: &mut serde_json::Map<String, Value>) -> String {
    for &key in MESSAGE_KEYS {
        if matches!(map.get(key), Some(Value::String(_))) {
            if let Some(Value::String(text)) = map.shift_remove(key) {
                return text;
            }
        }
    }
    String::new()
}
