//! Console appender implementation

use super::{shared_writer, write_checked, SharedWriter};
use crate::core::error::{LoggerError, Result};
use crate::core::{Appender, LogEntry};
use crate::formatter::{Formatter, TemplateFormatter};
use parking_lot::RwLock;
use std::io::Write;
use std::sync::Arc;

const NAME: &str = "ConsoleHook";

/// Writes formatted entries to a log stream (stderr by default) and raw
/// `PRINT` text to an output stream (stdout by default).
///
/// Both streams can be replaced at any time, which is how tests and
/// embedding applications capture the console output.
///
/// The appender is not cloned when a logger is copied: copies and children
/// share it, so replacing a stream through one of them redirects all.
///
/// # Examples
///
/// ```
/// use rust_multi_logger::appenders::{Appender, BufferWriter, ConsoleAppender};
/// use rust_multi_logger::{Level, LogEntry};
///
/// let logs = BufferWriter::new();
/// let console = ConsoleAppender::new();
/// console.set_out(logs.clone());
/// console.set_color(false);
/// console.set_format(&["%level:upper% %message%"]);
///
/// console.append(&LogEntry::new(Level::WARN, "careful")).unwrap();
/// assert_eq!(logs.contents(), "WARNING careful\n");
/// ```
pub struct ConsoleAppender {
    log: RwLock<SharedWriter>,
    out: RwLock<SharedWriter>,
    formatter: RwLock<Arc<dyn Formatter>>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_formatter(Arc::new(TemplateFormatter::console()))
    }

    pub fn with_formatter(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            log: RwLock::new(shared_writer(std::io::stderr())),
            out: RwLock::new(shared_writer(std::io::stdout())),
            formatter: RwLock::new(formatter),
        }
    }

    /// Replace the stream receiving formatted entries
    pub fn set_out(&self, writer: impl Write + Send + 'static) {
        *self.log.write() = shared_writer(writer);
    }

    /// Replace the stream receiving raw `PRINT` text
    pub fn set_stdout(&self, writer: impl Write + Send + 'static) {
        *self.out.write() = shared_writer(writer);
    }

    /// Send formatted entries and raw text to the same stream
    pub fn set_all_outputs(&self, writer: impl Write + Send + 'static) {
        let shared = shared_writer(writer);
        *self.log.write() = Arc::clone(&shared);
        *self.out.write() = shared;
    }

    /// Change the template of the formatter, ignored for other formatters
    pub fn set_format(&self, formats: &[&str]) {
        if let Some(template) = self.formatter.read().as_template() {
            template.set_log_format(formats);
        }
    }

    pub fn set_color(&self, color: bool) {
        self.formatter.read().set_color(color);
    }

    fn write_to(stream: &RwLock<SharedWriter>, text: &str) -> Result<()> {
        let writer = Arc::clone(&stream.read());
        let mut writer = writer.lock();
        write_checked(NAME, &mut **writer, text)
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        if entry.level.is_print() {
            return Self::write_to(&self.out, &entry.message);
        }

        let formatter = Arc::clone(&self.formatter.read());
        let text = formatter
            .format(entry)
            .map_err(|e| LoggerError::hook(NAME, e))?;
        Self::write_to(&self.log, &text)
    }

    fn flush(&self) -> Result<()> {
        for stream in [&self.log, &self.out] {
            let writer = Arc::clone(&stream.read());
            let result = writer.lock().flush();
            result.map_err(|e| LoggerError::hook(NAME, e.into()))?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        NAME
    }

    fn accepts_print(&self) -> bool {
        true
    }

    fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        Some(Arc::clone(&self.formatter.read()))
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) -> Result<()> {
        *self.formatter.write() = formatter;
        Ok(())
    }

    fn as_console(&self) -> Option<&ConsoleAppender> {
        Some(self)
    }
}
