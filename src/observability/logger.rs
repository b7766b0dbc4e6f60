//! Structured JSON Logger
//!
//! - One log line per event, valid JSON, newline-terminated
//! - Deterministic key ordering: event, level, ts, then fields sorted
//!   alphabetically
//! - Synchronous and unbuffered; a line is flushed before the call
//!   returns
//! - Info and below go to stdout, warnings and errors to stderr

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};

use super::events::Event;

/// Log levels, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Diagnostic detail
    Debug = 0,
    /// Normal operation
    Info = 1,
    /// Recoverable or self-healing conditions
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Level {
    /// Level name for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger.
pub struct Logger;

impl Logger {
    /// Emit one event at the given level.
    pub fn emit(level: Level, event: Event, fields: &[(&str, &str)]) {
        if level >= Level::Warn {
            Self::write_line(level, event, fields, &mut io::stderr());
        } else {
            Self::write_line(level, event, fields, &mut io::stdout());
        }
    }

    /// Emit at DEBUG.
    pub fn debug(event: Event, fields: &[(&str, &str)]) {
        Self::emit(Level::Debug, event, fields);
    }

    /// Emit at INFO.
    pub fn info(event: Event, fields: &[(&str, &str)]) {
        Self::emit(Level::Info, event, fields);
    }

    /// Emit at WARN.
    pub fn warn(event: Event, fields: &[(&str, &str)]) {
        Self::emit(Level::Warn, event, fields);
    }

    /// Emit at ERROR.
    pub fn error(event: Event, fields: &[(&str, &str)]) {
        Self::emit(Level::Error, event, fields);
    }

    fn write_line<W: Write>(level: Level, event: Event, fields: &[(&str, &str)], writer: &mut W) {
        let mut line = String::with_capacity(192);

        line.push_str("{\"event\":\"");
        line.push_str(event.as_str());
        line.push_str("\",\"level\":\"");
        line.push_str(level.as_str());
        line.push_str("\",\"ts\":\"");
        line.push_str(&Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        line.push('"');

        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        for (key, value) in sorted {
            line.push_str(",\"");
            Self::escape_into(&mut line, key);
            line.push_str("\":\"");
            Self::escape_into(&mut line, value);
            line.push('"');
        }

        line.push_str("}\n");

        // Single write_all keeps concurrent writers from interleaving.
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn escape_into(out: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
    }
}

#[cfg(test)]
fn capture(level: Level, event: Event, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::write_line(level, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
