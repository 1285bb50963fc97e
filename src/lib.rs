//! # Rust Multi Logger
//!
//! A logging facade that fans every entry out to many destinations, each
//! attached through a named hook with its own minimum level.
//!
//! ## Features
//!
//! - **Independent Hooks**: Console and file destinations, each with its own level
//! - **Format Mini-Language**: `%token:attributes%` templates compiled once and cached
//! - **Derived Loggers**: Copies, children, extra fields and frozen time
//! - **Stream Catcher**: The logger is an `io::Write` sink turning tagged lines into entries
//! - **`log` Bridge**: Records of the `log` crate reach the same hooks
//!
//! ## Example
//!
//! ```
//! use rust_multi_logger::prelude::*;
//!
//! let buffer = BufferWriter::new();
//! let logger = Logger::new("app");
//! logger.set_format(&["%lvl:upper% %msg%"]);
//! logger.set_all_outputs(buffer.clone());
//!
//! logger.info("not shown, the console hook starts at warning level");
//! logger.error("disk almost full");
//! assert_eq!(buffer.contents(), "ERROR disk almost full\n");
//! ```

pub mod appenders;
pub mod bridge;
pub mod core;
pub mod formatter;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{BufferWriter, ConsoleAppender, FileAppender};
    pub use crate::core::{
        Appender, Attribute, Caller, DurationFormat, DurationStyle, ErrorList, FieldValue, Hook,
        Level, LogContext, LogEntry, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result,
        TimestampFormat, TryIntoLevel,
    };
    pub use crate::formatter::{Formatter, JsonFormatter, TemplateFormatter};
}

pub use appenders::{BufferWriter, ConsoleAppender, FileAppender};
pub use core::{
    accepted_levels, accepted_levels_string, compute_levels, format_duration, parse_level,
    round_duration, try_parse_level, Appender, Attribute, Caller, DurationFormat, DurationStyle,
    ErrorList, FieldValue, Hook, Level, LogContext, LogEntry, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, Result, TimestampFormat, TryIntoLevel, DEFAULT_CONSOLE_HOOK,
};
pub use formatter::{Formatter, JsonFormatter, TemplateFormatter};
