//! Stream catcher
//!
//! A logger is also an [`io::Write`] sink. Text written to it goes through
//! the print path, except the segments tagged with a level, written either
//! as `[level] { message }` or as a line containing `[level]`, which are
//! logged at that level. Incomplete lines stay buffered until their end is
//! written or the logger is closed.

use super::error::Result;
use super::log_level::{accepted_levels, Level};
use super::logger::Logger;
use regex::Regex;
use std::borrow::Cow;
use std::io;
use std::sync::LazyLock;

static LOG_MESSAGES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    let choices = format!(r"\[(?P<level>warn|{})\]", accepted_levels()[1..].join("|"));
    [
        format!(r"{choices}[[:blank:]]*\{{\s*(?P<message>.*?)\s*\}}"),
        format!(r"[[:blank:]]*(?P<prefix>[^\n]*?)[[:blank:]]*{choices}[[:blank:]]*(?P<message>.*?)[[:blank:]]*\n"),
    ]
    .map(|expression| {
        Regex::new(&format!(r"(?is)(?P<before>.*?)(?P<remove>{})", expression))
            .expect("catcher pattern is valid")
    })
});

impl Logger {
    /// Process text written to the logger, `None` flushes the partial line
    pub(super) fn catch(&self, data: Option<&[u8]>) -> Result<usize> {
        let written = data.map_or(0, <[u8]>::len);
        if !self.is_catcher() {
            if let Some(data) = data {
                self.print_lines(&String::from_utf8_lossy(data))?;
            }
            return Ok(written);
        }

        let mut remaining = self.remaining.lock();
        let mut pending = std::mem::take(&mut *remaining);
        if let Some(data) = data {
            pending.extend_from_slice(data);
            let complete = pending
                .iter()
                .rposition(|byte| *byte == b'\n')
                .map_or(0, |index| index + 1);
            *remaining = pending.split_off(complete);
        }

        let text = String::from_utf8_lossy(&pending);
        let mut buffer: &str = &text;
        loop {
            // A flushed partial line behaves as if it was terminated
            let search: Cow<'_, str> = if data.is_none() {
                Cow::Owned(format!("{}\n", buffer))
            } else {
                Cow::Borrowed(buffer)
            };
            let Some(captures) = LOG_MESSAGES.iter().find_map(|re| re.captures(&search)) else {
                break;
            };

            let before = captures.name("before").map_or("", |m| m.as_str());
            if !before.is_empty() {
                self.print_lines(before)?;
            }
            let level: Level = captures["level"].parse()?;
            let message = &captures["message"];
            let message = match captures.name("prefix").map(|m| m.as_str()) {
                Some(prefix) if !prefix.is_empty() => format!("{} {} {}", prefix, level, message),
                _ => message.to_string(),
            };
            self.dispatch(level, message, None, None)?;

            let end = captures.name("remove").map_or(0, |m| m.end()).min(buffer.len());
            buffer = &buffer[end..];
        }

        self.print_lines(buffer)?;
        Ok(written)
    }

    /// Send every line through the print path
    ///
    /// Raw printing keeps the line terminators, other print levels log one
    /// entry per line.
    fn print_lines(&self, text: &str) -> Result<()> {
        let level = self.print_level();
        let lines: Vec<&str> = text.split('\n').collect();
        let last = lines.len() - 1;
        for (i, line) in lines.into_iter().enumerate() {
            if level.is_print() && i != last {
                self.dispatch(level, format!("{}\n", line), None, None)?;
            } else if i != last || !line.is_empty() {
                self.dispatch(level, line.to_string(), None, None)?;
            }
        }
        Ok(())
    }
}

impl io::Write for Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.catch(Some(buf))?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(Logger::flush(self)?)
    }
}

impl io::Write for &Logger {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.catch(Some(buf))?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(Logger::flush(self)?)
    }
}
