use crate::level::Level;

/// ANSI SGR color codes used for key highlighting in logfmt output
pub const ANSI_RED: &str = "31"; // error, fatal, panic
pub const ANSI_YELLOW: &str = "33"; // warn
pub const ANSI_BLUE: &str = "36"; // info
pub const ANSI_GRAY: &str = "37"; // trace, debug

/// Start of an SGR escape sequence; the color code and a trailing `m` follow.
pub const ANSI_START: &str = "\x1b[";
/// Reset sequence emitted after every colorized key.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Pick the SGR color code for a severity level.
pub fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace | Level::Debug => ANSI_GRAY,
        Level::Warn => ANSI_YELLOW,
        Level::Error | Level::Fatal | Level::Panic => ANSI_RED,
        // Info shares the fallback color
        Level::Info => ANSI_BLUE,
    }
}
