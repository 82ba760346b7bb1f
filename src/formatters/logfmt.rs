use crate::colors;
use crate::formatters::RecordFormatter;
use crate::level::Level;
use crate::record::{Caller, Record};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt::Write as _;

/// Fixed field keys synthesized by the formatter. A user field with the same
/// name is overwritten for that line (last write wins).
pub const KEY_TIME: &str = "time";
pub const KEY_LEVEL: &str = "level";
pub const KEY_MSG: &str = "msg";
pub const KEY_FUNC: &str = "func";
pub const KEY_FILE: &str = "file";

/// Reorders the combined fixed + user key list in place. Unlike the default
/// sort, which only touches user keys, a custom function may move the fixed
/// keys as well.
pub type SortingFunc = Box<dyn Fn(&mut [&str]) + Send + Sync>;

/// Maps a call site to `(function label, file label)`. Either label may be
/// empty to suppress its field.
pub type CallerPrettifier = Box<dyn Fn(&Caller) -> (String, String) + Send + Sync>;

/// Rendering of the `time` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// RFC 3339 with millisecond precision, e.g. `2024-01-02T03:04:05.006Z`.
    #[default]
    Rfc3339Milli,
    /// RFC 3339 with microsecond precision.
    Rfc3339Micro,
    /// A chrono strftime format string.
    Custom(String),
}

impl TimestampFormat {
    fn render(&self, timestamp: &DateTime<FixedOffset>) -> String {
        match self {
            TimestampFormat::Rfc3339Milli => timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::Rfc3339Micro => timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            TimestampFormat::Custom(format) => timestamp.format(format).to_string(),
        }
    }
}

/// Renders a record as one `key=value` line with the fixed fields first:
/// time (unless disabled), level, msg (unless empty), func/file (when a
/// caller is present), then the user fields per the sorting policy. Keys are
/// ANSI-colorized by severity unless colors are disabled.
///
/// All toggles are plain public fields; the zero value (`Default`) is the
/// sorted, colored, millisecond-timestamp configuration.
#[derive(Default)]
pub struct LogfmtFormatter {
    pub disable_colors: bool,

    pub disable_sorting: bool,
    pub sorting_func: Option<SortingFunc>,

    pub force_quote: bool,
    pub disable_quote: bool,
    pub quote_empty_fields: bool,

    pub disable_timestamp: bool,
    pub timestamp_format: TimestampFormat,

    pub caller_prettifier: Option<CallerPrettifier>,
}

/// Working-copy value: borrowed user field or synthesized fixed-field text.
enum Slot<'a> {
    User(&'a crate::record::FieldValue),
    Fixed(Cow<'a, str>),
}

impl LogfmtFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn append_key(&self, out: &mut String, key: &str, level: Level) {
        if self.disable_colors {
            out.push_str(key);
        } else {
            out.push_str(colors::ANSI_START);
            out.push_str(colors::level_color(level));
            out.push('m');
            out.push_str(key);
            out.push_str(colors::ANSI_RESET);
        }
    }

    fn append_value(&self, out: &mut String, text: &str) {
        if self.needs_quoting(text) {
            append_quoted(out, text);
        } else {
            out.push_str(text);
        }
    }

    fn needs_quoting(&self, text: &str) -> bool {
        if self.force_quote {
            return true;
        }
        if self.quote_empty_fields && text.is_empty() {
            return true;
        }
        if self.disable_quote {
            return false;
        }
        !text.chars().all(|ch| {
            ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '/' | '@' | '^' | '+')
        })
    }
}

impl RecordFormatter for LogfmtFormatter {
    fn format_into(&self, record: &Record, out: &mut String) {
        let mut data: IndexMap<&str, Slot<'_>> =
            IndexMap::with_capacity(record.fields.len() + 5);
        for (key, value) in &record.fields {
            data.insert(key.as_str(), Slot::User(value));
        }
        let mut user_keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();

        let mut fixed_keys: Vec<&str> = Vec::with_capacity(5 + user_keys.len());

        if !self.disable_timestamp {
            fixed_keys.push(KEY_TIME);
            data.insert(
                KEY_TIME,
                Slot::Fixed(Cow::Owned(self.timestamp_format.render(&record.timestamp))),
            );
        }

        fixed_keys.push(KEY_LEVEL);
        data.insert(KEY_LEVEL, Slot::Fixed(Cow::Borrowed(record.level.as_str())));

        if !record.message.is_empty() {
            fixed_keys.push(KEY_MSG);
            data.insert(KEY_MSG, Slot::Fixed(Cow::Borrowed(record.message.as_str())));
        }

        if let Some(caller) = &record.caller {
            let (func_label, file_label) = match &self.caller_prettifier {
                Some(prettify) => prettify(caller),
                None => (
                    format!("{}()", caller.function),
                    format!("{}:{}", caller.file, caller.line),
                ),
            };
            if !func_label.is_empty() {
                fixed_keys.push(KEY_FUNC);
                data.insert(KEY_FUNC, Slot::Fixed(Cow::Owned(func_label)));
            }
            if !file_label.is_empty() {
                fixed_keys.push(KEY_FILE);
                data.insert(KEY_FILE, Slot::Fixed(Cow::Owned(file_label)));
            }
        }

        if !self.disable_sorting {
            match &self.sorting_func {
                None => {
                    // Default sort touches user keys only; fixed keys keep
                    // their positions.
                    user_keys.sort_unstable();
                    fixed_keys.extend(user_keys);
                }
                Some(sort) => {
                    fixed_keys.extend(user_keys);
                    sort(&mut fixed_keys);
                }
            }
        } else {
            fixed_keys.extend(user_keys);
        }

        for key in fixed_keys {
            let Some(slot) = data.get(key) else { continue };
            if !out.is_empty() {
                out.push(' ');
            }
            self.append_key(out, key, record.level);
            out.push('=');
            match slot {
                Slot::User(value) => self.append_value(out, &value.as_text()),
                Slot::Fixed(text) => self.append_value(out, text),
            }
        }

        out.push('\n');
    }
}

/// Render `text` as a double-quoted literal, escaping embedded quotes,
/// backslashes, and non-printable characters.
fn append_quoted(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            ch if (ch as u32) < 0x20 || ch == '\x7f' => {
                let _ = write!(out, "\\x{:02x}", ch as u32);
            }
            ch if ch.is_control() => {
                // C1 controls and other non-ASCII control characters
                let _ = write!(out, "\\u{:04x}", ch as u32);
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}
