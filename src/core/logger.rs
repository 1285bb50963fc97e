//! Main logger implementation
//!
//! A [`Logger`] owns a set of named hooks and fans every entry out to the
//! hooks accepting its level. Failures never interrupt the logging call:
//! they are accumulated and reported by [`Logger::get_error`].

use super::error::{ErrorList, LoggerError, Result};
use super::hook::{Hook, DEFAULT_CONSOLE_HOOK};
use super::log_context::{FieldValue, LogContext};
use super::log_entry::{Caller, LogEntry};
use super::log_level::{Level, TryIntoLevel};
use super::settings;
use crate::appenders::Appender;
use crate::formatter::Formatter;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

pub struct Logger {
    module: RwLock<String>,
    hooks: RwLock<BTreeMap<String, Hook>>,
    fields: LogContext,
    // Frozen timestamp of the entries, the current time when unset
    time: RwLock<Option<DateTime<Utc>>>,
    report_caller: AtomicBool,
    print_level: AtomicU32,
    catcher: AtomicBool,
    // Partial line kept by the stream catcher until its end arrives
    pub(super) remaining: Mutex<Vec<u8>>,
    errors: Mutex<ErrorList>,
}

impl Logger {
    /// Logger with the default console hook, at warning level
    pub fn new(module: impl Into<String>) -> Self {
        Self::with_hooks(module, [Hook::console("", Level::WARN)])
    }

    /// Logger with exactly the given hooks
    pub fn with_hooks(module: impl Into<String>, hooks: impl IntoIterator<Item = Hook>) -> Self {
        let logger = Self {
            module: RwLock::new(module.into()),
            hooks: RwLock::new(BTreeMap::new()),
            fields: LogContext::new(),
            time: RwLock::new(None),
            report_caller: AtomicBool::new(settings::report_caller()),
            print_level: AtomicU32::new(Level::PRINT.value()),
            catcher: AtomicBool::new(true),
            remaining: Mutex::new(Vec::new()),
            errors: Mutex::new(ErrorList::new()),
        };
        logger.add_hooks(hooks);
        logger
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn module(&self) -> String {
        self.module.read().clone()
    }

    pub fn set_module(&self, module: impl Into<String>) -> &Self {
        *self.module.write() = module.into();
        self
    }

    /// Fields added to every entry of this logger
    pub fn fields(&self) -> &LogContext {
        &self.fields
    }

    // Hook registry

    /// Add a hook, replacing any hook registered under the same name
    pub fn add_hook(&self, hook: Hook) -> &Self {
        self.hooks.write().insert(hook.name().to_string(), hook);
        self
    }

    pub fn add_hooks(&self, hooks: impl IntoIterator<Item = Hook>) -> &Self {
        let mut registry = self.hooks.write();
        for hook in hooks {
            registry.insert(hook.name().to_string(), hook);
        }
        self
    }

    /// Add a hook whose level is given as a name or an ordinal
    pub fn try_add_hook<L: TryIntoLevel>(
        &self,
        name: impl Into<String>,
        level: L,
        appender: impl Appender + 'static,
    ) -> Result<&Self> {
        Ok(self.add_hook(Hook::try_new(name, level, appender)?))
    }

    /// Add a console hook, an empty name replaces the default console hook
    pub fn add_console(&self, name: &str, level: Level, formatter: Option<Arc<dyn Formatter>>) -> &Self {
        self.add_hook(Hook::console_with(name, level, formatter))
    }

    /// Add a file hook, one file per module when `is_dir` is set
    pub fn add_file(
        &self,
        path: impl Into<PathBuf>,
        is_dir: bool,
        level: Level,
        formatter: Option<Arc<dyn Formatter>>,
    ) -> &Self {
        self.add_hook(Hook::file_with(path, is_dir, level, formatter))
    }

    pub fn remove_hook(&self, name: &str) -> &Self {
        self.hooks.write().remove(hook_name(name));
        self
    }

    pub fn hook(&self, name: &str) -> Option<Hook> {
        self.hooks.read().get(hook_name(name)).cloned()
    }

    /// Minimum level of a hook, `DISABLED` when there is no such hook
    pub fn hook_level(&self, name: &str) -> Level {
        self.hook(name).map_or(Level::DISABLED, |hook| hook.level())
    }

    pub fn set_hook_level<L: TryIntoLevel>(&self, name: &str, level: L) -> Result<()> {
        let level = level.try_into_level()?;
        let mut hooks = self.hooks.write();
        let hook = hooks
            .get_mut(hook_name(name))
            .ok_or_else(|| LoggerError::HookNotFound(name.to_string()))?;
        *hook = hook.with_level(level);
        Ok(())
    }

    /// Names of the registered hooks, sorted
    pub fn list_hooks(&self) -> Vec<String> {
        self.hooks.read().keys().cloned().collect()
    }

    // Default console hook

    pub fn default_console_hook(&self) -> Option<Hook> {
        self.hook(DEFAULT_CONSOLE_HOOK)
    }

    pub fn default_console_hook_level(&self) -> Level {
        self.hook_level(DEFAULT_CONSOLE_HOOK)
    }

    pub fn set_default_console_hook_level<L: TryIntoLevel>(&self, level: L) -> Result<()> {
        self.set_hook_level(DEFAULT_CONSOLE_HOOK, level)
    }

    /// Formatter of the default console hook
    pub fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        self.default_console_hook().and_then(|hook| hook.formatter())
    }

    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) -> &Self {
        self.on_default_hook(|hook| hook.set_formatter(formatter).map(|_| ()))
    }

    pub fn set_format(&self, formats: &[&str]) -> &Self {
        self.on_default_hook(|hook| hook.set_format(formats).map(|_| ()))
    }

    pub fn set_color(&self, color: bool) -> &Self {
        self.on_default_hook(|hook| {
            hook.set_color(color);
            Ok(())
        })
    }

    /// Stream receiving the formatted entries of the default console hook
    pub fn set_out(&self, writer: impl Write + Send + 'static) -> &Self {
        self.on_default_hook(|hook| hook.set_out(writer).map(|_| ()))
    }

    /// Stream receiving the raw output of the default console hook
    pub fn set_stdout(&self, writer: impl Write + Send + 'static) -> &Self {
        self.on_default_hook(|hook| hook.set_stdout(writer).map(|_| ()))
    }

    pub fn set_all_outputs(&self, writer: impl Write + Send + 'static) -> &Self {
        self.on_default_hook(|hook| hook.set_all_outputs(writer).map(|_| ()))
    }

    fn on_default_hook<F>(&self, action: F) -> &Self
    where
        F: FnOnce(&Hook) -> Result<()>,
    {
        if let Some(hook) = self.default_console_hook() {
            if let Err(e) = action(&hook) {
                self.add_error(e);
            }
        }
        self
    }

    // Derivation

    /// Logger with the same configuration and independent hooks where
    /// needed, `None` keeps the module name
    pub fn copy(&self, module: Option<&str>) -> Logger {
        self.derive(
            module.map_or_else(|| self.module(), str::to_string),
            self.fields.clone(),
        )
    }

    /// Copy whose module is `parent:child`
    pub fn child(&self, name: &str) -> Logger {
        let module = self.module();
        if module.is_empty() {
            self.copy(Some(name))
        } else {
            self.copy(Some(&format!("{}:{}", module, name)))
        }
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Logger {
        let mut fields = self.fields.clone();
        fields.add_field(key, value);
        self.derive(self.module(), fields)
    }

    pub fn with_fields(&self, fields: &LogContext) -> Logger {
        let mut merged = self.fields.clone();
        merged.merge(fields);
        self.derive(self.module(), merged)
    }

    /// Copy whose entries all carry `time`
    pub fn with_time(&self, time: DateTime<Utc>) -> Logger {
        let logger = self.copy(None);
        *logger.time.write() = Some(time);
        logger
    }

    /// Move the frozen time forward, no effect on a logger using the clock
    pub fn add_time(&self, duration: chrono::Duration) -> &Self {
        if let Some(time) = self.time.write().as_mut() {
            *time += duration;
        }
        self
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        *self.time.read()
    }

    fn derive(&self, module: String, fields: LogContext) -> Logger {
        let hooks = self
            .hooks
            .read()
            .iter()
            .map(|(name, hook)| (name.clone(), hook.try_clone_hook()))
            .collect();
        Logger {
            module: RwLock::new(module),
            hooks: RwLock::new(hooks),
            fields,
            time: RwLock::new(self.time()),
            report_caller: AtomicBool::new(self.is_report_caller()),
            print_level: AtomicU32::new(self.print_level().value()),
            catcher: AtomicBool::new(self.is_catcher()),
            remaining: Mutex::new(Vec::new()),
            errors: Mutex::new(self.errors.lock().clone()),
        }
    }

    // Levels and switches

    /// Most verbose level accepted by an enabled hook
    pub fn level(&self) -> Level {
        self.hooks
            .read()
            .values()
            .map(Hook::level)
            .filter(|level| !level.is_disabled())
            .max()
            .unwrap_or(Level::DISABLED)
    }

    pub fn is_level_enabled(&self, level: Level) -> bool {
        self.hooks.read().values().any(|hook| hook.accepts(level))
    }

    pub fn set_report_caller(&self, enabled: bool) -> &Self {
        self.report_caller.store(enabled, Ordering::Release);
        self
    }

    pub fn is_report_caller(&self) -> bool {
        self.report_caller.load(Ordering::Acquire)
    }

    /// Level used by [`Logger::print`], `PRINT` sends raw text
    pub fn set_print_level(&self, level: Level) -> &Self {
        self.print_level.store(level.value(), Ordering::Release);
        self
    }

    pub fn print_level(&self) -> Level {
        Level::new(self.print_level.load(Ordering::Acquire))
    }

    /// Route `[level]` markers written to the logger to that level
    pub fn set_catcher(&self, enabled: bool) -> &Self {
        self.catcher.store(enabled, Ordering::Release);
        self
    }

    pub fn is_catcher(&self) -> bool {
        self.catcher.load(Ordering::Acquire)
    }

    // Logging

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        let caller = self.capture_caller();
        // Errors are accumulated on the logger
        let _ = self.dispatch(level, message.into(), None, caller);
    }

    #[track_caller]
    pub fn log_with_fields(&self, level: Level, fields: &LogContext, message: impl Into<String>) {
        let caller = self.capture_caller();
        let _ = self.dispatch(level, message.into(), Some(fields), caller);
    }

    /// Log on behalf of an explicit call site, used by the logging macros
    pub fn log_from(&self, caller: Caller, level: Level, message: impl Into<String>) {
        let caller = self.is_report_caller().then_some(caller);
        let _ = self.dispatch(level, message.into(), None, caller);
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    /// Log at fatal level, the process keeps running
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::FATAL, message);
    }

    /// Log at panic level without unwinding
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) {
        self.log(Level::PANIC, message);
    }

    /// Send text at the print level, raw unless the print level was changed
    #[track_caller]
    pub fn print(&self, message: impl Into<String>) {
        self.log(self.print_level(), message);
    }

    #[track_caller]
    pub fn println(&self, message: impl Into<String>) {
        let mut message = message.into();
        message.push('\n');
        self.print(message);
    }

    #[track_caller]
    fn capture_caller(&self) -> Option<Caller> {
        if self.is_report_caller() {
            Some(Caller::here(""))
        } else {
            None
        }
    }

    /// Deliver an entry to every accepting hook.
    ///
    /// Every failure is added to the accumulator; the failures of this
    /// entry alone are also returned.
    pub(crate) fn dispatch(
        &self,
        level: Level,
        message: String,
        fields: Option<&LogContext>,
        caller: Option<Caller>,
    ) -> Result<()> {
        let hooks: Vec<Hook> = self
            .hooks
            .read()
            .values()
            .filter(|hook| hook.accepts(level))
            .cloned()
            .collect();
        if hooks.is_empty() {
            return Ok(());
        }

        let mut entry = LogEntry::new(level, message).with_module(self.module());
        if let Some(time) = self.time() {
            entry = entry.with_timestamp(time);
        }
        let mut all_fields = self.fields.clone();
        if let Some(fields) = fields {
            all_fields.merge(fields);
        }
        entry = entry.with_fields(all_fields);
        if let Some(caller) = caller {
            entry = entry.with_caller(caller);
        }

        let mut failures = ErrorList::new();
        for hook in &hooks {
            if let Err(e) = hook.fire(&entry) {
                failures.push(e);
            }
        }
        if !failures.is_empty() {
            self.errors.lock().append(&failures);
        }
        failures.as_result()
    }

    // Errors

    /// Record a failure of the logging process
    pub fn add_error(&self, error: LoggerError) {
        self.errors.lock().push(error);
    }

    /// Failures recorded so far
    pub fn get_error(&self) -> Result<()> {
        self.errors.lock().as_result()
    }

    /// Failures recorded so far, forgetting them
    pub fn clear_error(&self) -> Result<()> {
        std::mem::take(&mut *self.errors.lock()).as_result()
    }

    /// Emit the buffered partial line, then flush every hook
    pub fn flush(&self) -> Result<()> {
        let mut failures = ErrorList::new();
        if let Err(e) = self.close() {
            failures.push(e);
        }
        let hooks: Vec<Hook> = self.hooks.read().values().cloned().collect();
        for hook in &hooks {
            if let Err(e) = hook.flush() {
                failures.push(e);
            }
        }
        failures.as_result()
    }

    /// Emit the partial line buffered by the stream catcher
    pub fn close(&self) -> Result<()> {
        if self.remaining.lock().is_empty() {
            return Ok(());
        }
        self.catch(None).map(|_| ())
    }
}

fn hook_name(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_CONSOLE_HOOK
    } else {
        name
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("module", &*self.module.read())
            .field("hooks", &self.list_hooks())
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_multi_logger::prelude::*;
///
/// let logs = BufferWriter::new();
/// let logger = Logger::builder()
///     .module("app")
///     .hook(Hook::console("", Level::INFO))
///     .build();
/// logger.set_color(false).set_out(logs.clone());
/// logger.info("ready");
/// assert!(logs.contents().ends_with("INFO     ready\n"));
/// ```
pub struct LoggerBuilder {
    module: String,
    hooks: Vec<Hook>,
    report_caller: Option<bool>,
    print_level: Level,
    catcher: bool,
    time: Option<DateTime<Utc>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            module: String::new(),
            hooks: Vec::new(),
            report_caller: None,
            print_level: Level::PRINT,
            catcher: true,
            time: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Add a hook; without any, the default console hook is installed
    #[must_use = "builder methods return a new value"]
    pub fn hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hooks(mut self, hooks: impl IntoIterator<Item = Hook>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Override the process-wide caller reporting default
    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn print_level(mut self, level: Level) -> Self {
        self.print_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn catcher(mut self, enabled: bool) -> Self {
        self.catcher = enabled;
        self
    }

    /// Freeze the timestamp of every entry
    #[must_use = "builder methods return a new value"]
    pub fn time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn build(self) -> Logger {
        let logger = if self.hooks.is_empty() {
            Logger::new(self.module)
        } else {
            Logger::with_hooks(self.module, self.hooks)
        };
        if let Some(enabled) = self.report_caller {
            logger.set_report_caller(enabled);
        }
        logger.set_print_level(self.print_level).set_catcher(self.catcher);
        *logger.time.write() = self.time;
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
