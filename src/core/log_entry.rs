//! Log entry structure

use super::log_context::{FieldValue, LogContext};
use super::log_level::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Call site of a log statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Location of the code that called the `#[track_caller]` function
    #[track_caller]
    pub fn here(module: &str) -> Self {
        let location = std::panic::Location::caller();
        Self::new(module, location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.function, self.file, self.line)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub module: String,
    #[serde(skip_serializing_if = "LogContext::is_empty")]
    pub fields: LogContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Caller>,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            module: String::new(),
            fields: LogContext::new(),
            caller: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: LogContext) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.add_field(key, value);
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builders() {
        let time = Utc.with_ymd_and_hms(2018, 6, 24, 12, 34, 56).unwrap();
        let entry = LogEntry::new(Level::INFO, "started")
            .with_timestamp(time)
            .with_module("server")
            .with_field("port", 8080)
            .with_caller(Caller::new("server::run", "src/server.rs", 42));

        assert_eq!(entry.level, Level::INFO);
        assert_eq!(entry.module, "server");
        assert_eq!(entry.fields.get("port"), Some(&FieldValue::Int(8080)));
        assert_eq!(
            entry.caller.as_ref().map(ToString::to_string).as_deref(),
            Some("server::run src/server.rs:42")
        );
    }

    #[test]
    fn test_caller_here() {
        let caller = Caller::here("tests");
        assert_eq!(caller.function, "tests");
        assert!(caller.file.ends_with("log_entry.rs"));
    }

    #[test]
    fn test_message_is_kept_verbatim() {
        let entry = LogEntry::new(Level::WARN, "line one\nline two");
        assert_eq!(entry.message, "line one\nline two");
    }
}
