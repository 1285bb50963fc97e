//! Timestamp formatting utilities
//!
//! Used by the `time` template token and by the header line written when a
//! log file is opened.

use crate::core::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Layout used when nothing else is configured: `2018/06/24 12:34:56.789`
pub const CLASSIC_LAYOUT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_multi_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2018, 6, 24, 12, 34, 56).unwrap();
/// assert_eq!(TimestampFormat::Classic.format(&time), "2018/06/24 12:34:56.000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2018/06/24 12:34:56.789`
    #[default]
    Classic,

    /// ISO 8601 with milliseconds: `2018-06-24T12:34:56.789Z`
    Iso8601,

    /// RFC 3339 with seconds: `2018-06-24T12:34:56+02:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1529843696`
    Unix,

    /// Any strftime layout understood by chrono
    ///
    /// ```
    /// use rust_multi_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%H:%M:%S".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Reject custom layouts holding a specifier chrono does not know
    pub fn validate(&self) -> Result<()> {
        match self {
            TimestampFormat::Custom(layout) => {
                if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
                    Err(LoggerError::template(vec![format!(
                        "Invalid time layout {:?}",
                        layout
                    )]))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Format a datetime in its own timezone
    ///
    /// A custom layout that fails [`validate`](Self::validate) is written
    /// out verbatim.
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Classic => datetime.format(CLASSIC_LAYOUT).to_string(),
            TimestampFormat::Iso8601 => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Custom(layout) => {
                let mut output = String::new();
                match write!(output, "{}", datetime.format(layout)) {
                    Ok(()) => output,
                    Err(_) => layout.clone(),
                }
            }
        }
    }
}

impl From<&str> for TimestampFormat {
    fn from(layout: &str) -> Self {
        TimestampFormat::Custom(layout.to_string())
    }
}
