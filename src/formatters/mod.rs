use crate::record::Record;

/// Trait for formatting records into output lines
pub trait RecordFormatter {
    /// Append one formatted line, including the trailing newline, to `out`.
    /// The buffer is borrowed for this call only; passing a reused buffer
    /// between calls is the caller's way of avoiding per-line allocations.
    fn format_into(&self, record: &Record, out: &mut String);

    /// Format into a fresh buffer.
    fn format(&self, record: &Record) -> String {
        let mut out = String::new();
        self.format_into(record, &mut out);
        out
    }
}

pub mod logfmt;
