// src/lib.rs
pub mod colors;
pub mod error;
pub mod formatters;
pub mod input_format;
pub mod level;
pub mod record;

pub use error::*;

pub use formatters::logfmt::{LogfmtFormatter, TimestampFormat};
pub use formatters::RecordFormatter;
pub use input_format::JsonlRecordParser;
pub use level::Level;
pub use record::{Caller, FieldValue, Record};
