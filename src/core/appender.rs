//! Appender trait for log output destinations
//!
//! An appender is the capability contract behind a hook: it receives the
//! entries the hook accepted and writes them somewhere. Only `append` and
//! `name` are mandatory; destinations that own a formatter, an open handle
//! or a preferred level set override the other methods.

use super::{error::LoggerError, error::Result, log_entry::LogEntry, log_level::Level};
use crate::appenders::ConsoleAppender;
use crate::formatter::Formatter;
use std::sync::Arc;

pub trait Appender: Send + Sync {
    /// Write one entry; entries at `Level::PRINT` carry raw text
    fn append(&self, entry: &LogEntry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Identity used to prefix the errors this appender produces
    fn name(&self) -> &str;

    /// Explicit level set; `None` lets the hook derive it from its minimum
    fn levels(&self) -> Option<Vec<Level>> {
        None
    }

    /// Whether raw `PRINT` entries are delivered regardless of the minimum
    fn accepts_print(&self) -> bool {
        false
    }

    fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        None
    }

    fn set_formatter(&self, _formatter: Arc<dyn Formatter>) -> Result<()> {
        Err(LoggerError::unsupported(self.name(), "set_formatter"))
    }

    /// Independent copy for a derived logger, `None` to share this instance
    fn try_clone(&self) -> Option<Box<dyn Appender>> {
        None
    }

    fn as_console(&self) -> Option<&ConsoleAppender> {
        None
    }
}
