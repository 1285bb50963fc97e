//! Environment driven defaults
//!
//! Every value is optional: an unset variable leaves the built-in default in
//! place. Invalid values are reported on stderr and ignored, since the
//! configuration is read before any logger exists to report them.

use super::duration::DurationFormat;
use super::settings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;

pub const FORMAT_ENV_VAR: &str = "MULTILOGGER_FORMAT";
pub const FILE_FORMAT_ENV_VAR: &str = "MULTILOGGER_FILE_FORMAT";
pub const CALLER_ENV_VAR: &str = "MULTILOGGER_CALLER";
pub const DURATION_PRECISION_ENV_VAR: &str = "MULTILOGGER_DURATION_PRECISION";
pub const DURATION_FORMAT_ENV_VAR: &str = "MULTILOGGER_DURATION_FORMAT";
pub const BASE_TIME_ENV_VAR: &str = "MULTILOGGER_BASETIME";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Template used by console hooks
    pub format: Option<String>,
    /// Template used by file hooks
    pub file_format: Option<String>,
    pub report_caller: Option<bool>,
    /// Written in humantime syntax (`5ms`, `1s 500ms`)
    #[serde(
        serialize_with = "serialize_precision",
        deserialize_with = "deserialize_precision"
    )]
    pub duration_precision: Option<Duration>,
    pub duration_style: Option<DurationFormat>,
    /// Reference instant for the `globaldelay` token
    pub base_time: Option<DateTime<Utc>>,
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `MULTILOGGER_*` variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let duration_precision = lookup(DURATION_PRECISION_ENV_VAR).and_then(|value| {
            humantime::parse_duration(value.trim())
                .map_err(|e| warn_invalid(DURATION_PRECISION_ENV_VAR, &value, &e))
                .ok()
        });
        let duration_style = lookup(DURATION_FORMAT_ENV_VAR).and_then(|value| {
            value
                .parse::<DurationFormat>()
                .map_err(|e| warn_invalid(DURATION_FORMAT_ENV_VAR, &value, &e))
                .ok()
        });
        let base_time = lookup(BASE_TIME_ENV_VAR).and_then(|value| {
            DateTime::parse_from_rfc3339(value.trim())
                .map(|time| time.with_timezone(&Utc))
                .map_err(|e| warn_invalid(BASE_TIME_ENV_VAR, &value, &e))
                .ok()
        });

        Self {
            format: lookup(FORMAT_ENV_VAR).filter(|format| !format.is_empty()),
            file_format: lookup(FILE_FORMAT_ENV_VAR).filter(|format| !format.is_empty()),
            report_caller: lookup(CALLER_ENV_VAR).map(|value| parse_bool(&value)),
            duration_precision,
            duration_style,
            base_time,
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_file_format(mut self, format: impl Into<String>) -> Self {
        self.file_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_duration_precision(mut self, precision: Duration) -> Self {
        self.duration_precision = Some(precision);
        self
    }

    #[must_use]
    pub fn with_duration_style(mut self, style: DurationFormat) -> Self {
        self.duration_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_base_time(mut self, time: DateTime<Utc>) -> Self {
        self.base_time = Some(time);
        self
    }

    /// Push the values into the process-wide settings.
    ///
    /// Settings that were already set keep their value unless `override_set`
    /// is true.
    pub fn apply(&self, override_set: bool) {
        if let Some(format) = &self.format {
            settings::set_global_format(format, override_set);
        }
        if let Some(format) = &self.file_format {
            settings::set_global_file_format(format, override_set);
        }
        if let Some(enabled) = self.report_caller {
            settings::set_report_caller(enabled, override_set);
        }
        if let Some(precision) = self.duration_precision {
            settings::set_duration_precision(precision, override_set);
        }
        if let Some(style) = self.duration_style {
            settings::set_duration_style(style, override_set);
        }
        if let Some(time) = self.base_time {
            settings::set_global_time(time, override_set);
        }
    }
}

fn warn_invalid(name: &str, value: &str, error: &dyn std::fmt::Display) {
    eprintln!(
        "[LOGGER WARNING] Ignoring {}={:?}: {}",
        name, value, error
    );
}

/// Interpret an environment flag: empty, `0`, `f`, `false`, `n`, `no` and
/// `off` are false, anything else is true
pub fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "f" | "false" | "n" | "no" | "off"
    )
}

fn serialize_precision<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(duration) => {
            serializer.serialize_some(&humantime::format_duration(*duration).to_string())
        }
        None => serializer.serialize_none(),
    }
}

fn deserialize_precision<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|text| humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom))
        .transpose()
}
