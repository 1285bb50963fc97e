//! Appender implementations

pub mod buffer;
pub mod console;
pub mod file;

pub use buffer::BufferWriter;
pub use console::ConsoleAppender;
pub use file::FileAppender;

pub use crate::core::Appender;

use crate::core::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Writer shared between the appenders configured with the same stream
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn shared_writer(writer: impl Write + Send + 'static) -> SharedWriter {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// Issue a single write and treat a partial one as a failure.
///
/// Errors are prefixed with `source`, the identity of the writing hook.
pub(crate) fn write_checked(source: &str, out: &mut dyn Write, text: &str) -> Result<()> {
    match out.write(text.as_bytes()) {
        Ok(written) if written == text.len() => Ok(()),
        Ok(written) => Err(LoggerError::hook(
            source,
            LoggerError::short_write(written, text),
        )),
        Err(e) => Err(LoggerError::hook(source, LoggerError::IoError(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Partial;

    impl Write for Partial {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len() / 2)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_checked() {
        let mut buffer = BufferWriter::new();
        write_checked("test", &mut buffer, "complete").unwrap();
        assert_eq!(buffer.contents(), "complete");

        let err = write_checked("FileHook x.log", &mut Partial, "abcd").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"FileHook x.log: Wrong number of bytes written (2) for "abcd""#
        );
    }
}
