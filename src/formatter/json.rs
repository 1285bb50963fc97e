//! JSON formatter for structured logging
//!
//! Each entry becomes a single JSON object (JSONL), compatible with log
//! aggregation tools like ELK or Loki.

use super::Formatter;
use crate::core::error::Result;
use crate::core::log_entry::LogEntry;
use crate::core::timestamp::TimestampFormat;
use serde_json::{Map, Value};

const RESERVED_KEYS: [&str; 6] = ["level", "module", "msg", "time", "func", "file"];

#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
    timestamp_format: TimestampFormat,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self {
            pretty: false,
            timestamp_format: TimestampFormat::Rfc3339,
        }
    }

    /// JSON formatter with pretty printing
    pub fn new_pretty() -> Self {
        Self {
            pretty: true,
            ..Self::new()
        }
    }

    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Result<Self> {
        format.validate()?;
        self.timestamp_format = format;
        Ok(self)
    }

    fn to_object(&self, entry: &LogEntry) -> Map<String, Value> {
        let mut object = Map::new();
        for (key, value) in &entry.fields {
            // Fields never hide the entry attributes
            let key = if RESERVED_KEYS.contains(&key.as_str()) {
                format!("fields.{}", key)
            } else {
                key.clone()
            };
            object.insert(key, value.to_json_value());
        }

        object.insert("level".to_string(), Value::String(entry.level.to_string()));
        if !entry.module.is_empty() {
            object.insert("module".to_string(), Value::String(entry.module.clone()));
        }
        object.insert("msg".to_string(), Value::String(entry.message.clone()));
        object.insert(
            "time".to_string(),
            Value::String(self.timestamp_format.format(&entry.timestamp)),
        );
        if let Some(caller) = &entry.caller {
            object.insert("func".to_string(), Value::String(caller.function.clone()));
            object.insert(
                "file".to_string(),
                Value::String(format!("{}:{}", caller.file, caller.line)),
            );
        }
        object
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        let object = Value::Object(self.to_object(entry));
        let mut json = if self.pretty {
            serde_json::to_string_pretty(&object)?
        } else {
            serde_json::to_string(&object)?
        };
        json.push('\n');
        Ok(json)
    }
}
