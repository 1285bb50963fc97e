//! Forward the records of the `log` crate facade into a [`Logger`].
//!
//! Libraries written against `log` then reach the hooks of the logger with
//! the record target as the `target` field, the record key-values as
//! fields, and the record location as the caller.

use crate::core::{Caller, FieldValue, Level, LogContext, Logger, LoggerError, Result};
use log::kv::{Error as KvError, Key, Value, VisitSource};
use std::sync::Arc;

/// [`log::Log`] implementation delivering records to a shared logger
pub struct LogBridge {
    logger: Arc<Logger>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

fn level_of(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::ERROR,
        log::Level::Warn => Level::WARN,
        log::Level::Info => Level::INFO,
        log::Level::Debug => Level::DEBUG,
        log::Level::Trace => Level::TRACE,
    }
}

fn field_value(value: &Value<'_>) -> FieldValue {
    if let Some(i) = value.to_i64() {
        FieldValue::Int(i)
    } else if let Some(u) = value.to_u64() {
        FieldValue::from(u)
    } else if let Some(f) = value.to_f64() {
        FieldValue::Float(f)
    } else if let Some(b) = value.to_bool() {
        FieldValue::Bool(b)
    } else if let Some(s) = value.to_borrowed_str() {
        FieldValue::from(s)
    } else {
        FieldValue::String(value.to_string())
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut LogContext,
}

impl<'kvs> VisitSource<'kvs> for FieldVisitor<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> std::result::Result<(), KvError> {
        self.fields.add_field(key.as_str(), field_value(&value));
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.is_level_enabled(level_of(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = level_of(record.level());
        if !self.logger.is_level_enabled(level) {
            return;
        }

        let mut fields = LogContext::new().with_field("target", record.target());
        let mut visitor = FieldVisitor { fields: &mut fields };
        if let Err(e) = record.key_values().visit(&mut visitor) {
            self.logger
                .add_error(LoggerError::config("log bridge", format!("cannot read key-values: {}", e)));
        }

        let caller = if self.logger.is_report_caller() {
            record.file().map(|file| {
                Caller::new(
                    record.module_path().unwrap_or_default(),
                    file,
                    record.line().unwrap_or(0),
                )
            })
        } else {
            None
        };
        // Errors are accumulated on the logger
        let _ = self
            .logger
            .dispatch(level, record.args().to_string(), Some(&fields), caller);
    }

    fn flush(&self) {
        if let Err(e) = self.logger.flush() {
            self.logger.add_error(e);
        }
    }
}

/// Install `logger` as the destination of the `log` crate records.
///
/// The maximum level of the `log` crate is set to `Trace`, every record is
/// then filtered by the hooks of the logger.
///
/// # Errors
///
/// Fails when a `log` crate logger is already installed.
pub fn try_setup_log_crate(logger: Arc<Logger>) -> Result<()> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))
        .map_err(|e| LoggerError::config("log bridge", e.to_string()))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Install `logger` as the destination of the `log` crate records.
///
/// # Panics
///
/// Panics when a `log` crate logger is already installed.
pub fn setup_log_crate(logger: Arc<Logger>) {
    if let Err(e) = try_setup_log_crate(logger) {
        panic!("{}", e);
    }
}
