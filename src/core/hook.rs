//! Named destinations with their own minimum level
//!
//! A [`Hook`] pairs an [`Appender`] with a name and the least severe level it
//! accepts. Loggers fan every entry out to the hooks accepting its level.

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::log_level::{Level, TryIntoLevel};
use crate::appenders::{ConsoleAppender, FileAppender};
use crate::formatter::Formatter;
use std::any::Any;
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the console hook installed by default
pub const DEFAULT_CONSOLE_HOOK: &str = "console-hook";

/// Levels accepted by a hook whose minimum is `minimum`, most severe first.
///
/// `PRINT` comes first when raw output is accepted, even if the hook is
/// disabled. Ordinals above trace are listed up to the minimum.
pub fn compute_levels(minimum: Level, accepts_print: bool) -> Vec<Level> {
    let mut levels = Vec::new();
    if accepts_print {
        levels.push(Level::PRINT);
    }
    if minimum.is_disabled() || minimum.is_print() {
        return levels;
    }
    levels.extend(Level::ALL.iter().copied().filter(|level| *level <= minimum));
    if minimum > Level::TRACE {
        levels.extend((Level::TRACE.value() + 1..=minimum.value()).map(Level::new));
    }
    levels
}

#[derive(Clone)]
pub struct Hook {
    name: String,
    level: Level,
    appender: Arc<dyn Appender>,
}

impl Hook {
    pub fn new(name: impl Into<String>, level: Level, appender: impl Appender + 'static) -> Self {
        Self::from_arc(name, level, Arc::new(appender))
    }

    pub fn from_arc(name: impl Into<String>, level: Level, appender: Arc<dyn Appender>) -> Self {
        Self {
            name: name.into(),
            level,
            appender,
        }
    }

    /// Same as [`Hook::new`] with a level given as a name or an ordinal
    pub fn try_new<L: TryIntoLevel>(
        name: impl Into<String>,
        level: L,
        appender: impl Appender + 'static,
    ) -> Result<Self> {
        Ok(Self::new(name, level.try_into_level()?, appender))
    }

    /// Console hook using the default console formatter, an empty name
    /// stands for [`DEFAULT_CONSOLE_HOOK`]
    pub fn console(name: &str, level: Level) -> Self {
        Self::console_with(name, level, None)
    }

    pub fn console_with(name: &str, level: Level, formatter: Option<Arc<dyn Formatter>>) -> Self {
        let name = if name.is_empty() { DEFAULT_CONSOLE_HOOK } else { name };
        let appender = match formatter {
            Some(formatter) => ConsoleAppender::with_formatter(formatter),
            None => ConsoleAppender::new(),
        };
        Self::new(name, level, appender)
    }

    /// File hook named after its path
    pub fn file(path: impl Into<PathBuf>, is_dir: bool, level: Level) -> Self {
        Self::file_with(path, is_dir, level, None)
    }

    pub fn file_with(
        path: impl Into<PathBuf>,
        is_dir: bool,
        level: Level,
        formatter: Option<Arc<dyn Formatter>>,
    ) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        let mut appender = FileAppender::new(path, is_dir);
        if let Some(formatter) = formatter {
            appender = appender.with_formatter(formatter);
        }
        Self::new(name, level, appender)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Same destination with another minimum level
    #[must_use]
    pub fn with_level(&self, level: Level) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    pub fn appender(&self) -> &Arc<dyn Appender> {
        &self.appender
    }

    /// Levels delivered to the appender
    ///
    /// An appender declaring its own levels gets those not less severe
    /// than the hook minimum.
    pub fn levels(&self) -> Vec<Level> {
        match self.appender.levels() {
            Some(levels) => levels
                .into_iter()
                .filter(|level| *level <= self.level)
                .collect(),
            None => compute_levels(self.level, self.appender.accepts_print()),
        }
    }

    pub fn accepts(&self, level: Level) -> bool {
        if let Some(levels) = self.appender.levels() {
            return levels.contains(&level) && level <= self.level;
        }
        if level.is_print() {
            return self.appender.accepts_print();
        }
        !level.is_disabled() && !self.level.is_disabled() && level <= self.level
    }

    /// Deliver the entry to the appender, turning a panic into an error
    pub fn fire(&self, entry: &LogEntry) -> Result<()> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.appender.append(entry))) {
            Ok(result) => result,
            Err(payload) => Err(LoggerError::HookPanic {
                hook: self.name.clone(),
                message: panic_message(&*payload),
            }),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.flush()
    }

    pub fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        self.appender.formatter()
    }

    pub fn set_formatter(&self, formatter: Arc<dyn Formatter>) -> Result<&Self> {
        self.appender.set_formatter(formatter)?;
        Ok(self)
    }

    /// Change the template of a [`TemplateFormatter`](crate::formatter::TemplateFormatter)
    pub fn set_format(&self, formats: &[&str]) -> Result<&Self> {
        let formatter = self
            .formatter()
            .ok_or_else(|| LoggerError::unsupported(&self.name, "set_format"))?;
        let template = formatter
            .as_template()
            .ok_or_else(|| LoggerError::unsupported(&self.name, "set_format"))?;
        template.set_log_format(formats);
        Ok(self)
    }

    /// Switch colors, ignored by formatters without colors
    pub fn set_color(&self, color: bool) -> &Self {
        if let Some(formatter) = self.formatter() {
            formatter.set_color(color);
        }
        self
    }

    fn console_appender(&self, operation: &str) -> Result<&ConsoleAppender> {
        self.appender
            .as_console()
            .ok_or_else(|| LoggerError::unsupported(&self.name, operation))
    }

    pub fn set_out(&self, writer: impl Write + Send + 'static) -> Result<&Self> {
        self.console_appender("set_out")?.set_out(writer);
        Ok(self)
    }

    pub fn set_stdout(&self, writer: impl Write + Send + 'static) -> Result<&Self> {
        self.console_appender("set_stdout")?.set_stdout(writer);
        Ok(self)
    }

    pub fn set_all_outputs(&self, writer: impl Write + Send + 'static) -> Result<&Self> {
        self.console_appender("set_all_outputs")?.set_all_outputs(writer);
        Ok(self)
    }

    /// Copy for a derived logger, with an independent appender when the
    /// appender holds per-instance state
    #[must_use]
    pub fn try_clone_hook(&self) -> Self {
        let appender = match self.appender.try_clone() {
            Some(appender) => Arc::from(appender),
            None => Arc::clone(&self.appender),
        };
        Self {
            name: self.name.clone(),
            level: self.level,
            appender,
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("appender", &self.appender.name())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
