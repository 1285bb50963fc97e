//! Core logger types and traits

pub mod appender;
pub mod catcher;
pub mod color;
pub mod config;
pub mod duration;
pub mod error;
pub mod hook;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod settings;
pub mod timestamp;

pub use appender::Appender;
pub use color::Attribute;
pub use config::LoggerConfig;
pub use duration::{format_duration, round_duration, DurationFormat, DurationStyle};
pub use error::{ErrorList, LoggerError, Result};
pub use hook::{compute_levels, Hook, DEFAULT_CONSOLE_HOOK};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{Caller, LogEntry};
pub use log_level::{
    accepted_levels, accepted_levels_string, parse_level, try_parse_level, Level, TryIntoLevel,
};
pub use logger::{Logger, LoggerBuilder};
pub use timestamp::TimestampFormat;
