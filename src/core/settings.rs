//! Process-wide formatting settings
//!
//! Values are seeded from the environment the first time any of them is
//! read. Each setter follows the same rule: the first explicit value wins, a
//! later call only replaces it when `override_set` is true. A value coming
//! from the environment counts as already set.

use super::config::LoggerConfig;
use super::duration::DurationFormat;
use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_DURATION_PRECISION: Duration = Duration::from_millis(1);

struct Setting<T> {
    value: T,
    is_set: bool,
}

impl<T: Clone> Setting<T> {
    fn new(value: Option<T>, default: T) -> Self {
        match value {
            Some(value) => Self { value, is_set: true },
            None => Self {
                value: default,
                is_set: false,
            },
        }
    }

    fn set(&mut self, value: T, override_set: bool) -> (T, bool) {
        if self.is_set && !override_set {
            return (self.value.clone(), false);
        }
        self.value = value;
        self.is_set = true;
        (self.value.clone(), true)
    }
}

struct Settings {
    precision_nanos: AtomicU64,
    precision_set: AtomicBool,
    // Serializes precision updates; reads only touch the atomic
    precision_lock: parking_lot::Mutex<()>,
    duration_style: RwLock<Setting<DurationFormat>>,
    global_time: RwLock<Setting<DateTime<Utc>>>,
    display_zone: RwLock<Option<FixedOffset>>,
    global_format: RwLock<Setting<String>>,
    global_file_format: RwLock<Setting<String>>,
    report_caller: RwLock<Setting<bool>>,
}

impl Settings {
    fn from_config(config: LoggerConfig) -> Self {
        let precision = config.duration_precision.unwrap_or(DEFAULT_DURATION_PRECISION);
        Self {
            precision_nanos: AtomicU64::new(duration_nanos(precision)),
            precision_set: AtomicBool::new(config.duration_precision.is_some()),
            precision_lock: parking_lot::Mutex::new(()),
            duration_style: RwLock::new(Setting::new(
                config.duration_style,
                DurationFormat::default(),
            )),
            global_time: RwLock::new(Setting::new(config.base_time, Utc::now())),
            display_zone: RwLock::new(None),
            global_format: RwLock::new(Setting::new(config.format, String::new())),
            global_file_format: RwLock::new(Setting::new(config.file_format, String::new())),
            report_caller: RwLock::new(Setting::new(config.report_caller, false)),
        }
    }
}

static SETTINGS: LazyLock<Settings> = LazyLock::new(|| Settings::from_config(LoggerConfig::from_env()));

fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Set the precision used to round `delay`, `delta` and `globaldelay`.
///
/// Returns the effective precision and whether this call changed it.
pub fn set_duration_precision(precision: Duration, override_set: bool) -> (Duration, bool) {
    let _guard = SETTINGS.precision_lock.lock();
    if SETTINGS.precision_set.load(Ordering::Acquire) && !override_set {
        return (duration_precision(), false);
    }
    SETTINGS
        .precision_nanos
        .store(duration_nanos(precision), Ordering::Release);
    SETTINGS.precision_set.store(true, Ordering::Release);
    (precision, true)
}

pub fn duration_precision() -> Duration {
    Duration::from_nanos(SETTINGS.precision_nanos.load(Ordering::Acquire))
}

/// Set the default rendering of durations, returns whether it was applied
pub fn set_duration_style(style: DurationFormat, override_set: bool) -> bool {
    SETTINGS.duration_style.write().set(style, override_set).1
}

pub fn duration_style() -> DurationFormat {
    SETTINGS.duration_style.read().value
}

/// Set the reference instant used by the `globaldelay` token
pub fn set_global_time(time: DateTime<Utc>, override_set: bool) -> (DateTime<Utc>, bool) {
    SETTINGS.global_time.write().set(time, override_set)
}

/// Reference instant: the environment value, an explicit one, or the time
/// the settings were first accessed
pub fn global_time() -> DateTime<Utc> {
    SETTINGS.global_time.read().value
}

/// Timezone applied to the `time` token when the formatter has none; `None`
/// renders in UTC
pub fn set_display_zone(zone: Option<FixedOffset>) {
    *SETTINGS.display_zone.write() = zone;
}

pub fn display_zone() -> Option<FixedOffset> {
    *SETTINGS.display_zone.read()
}

/// Set the default console template
pub fn set_global_format(format: &str, override_set: bool) -> (String, bool) {
    SETTINGS
        .global_format
        .write()
        .set(format.to_string(), override_set)
}

/// Default console template, empty when none was configured
pub fn global_format() -> String {
    SETTINGS.global_format.read().value.clone()
}

/// Set the default file template
pub fn set_global_file_format(format: &str, override_set: bool) -> (String, bool) {
    SETTINGS
        .global_file_format
        .write()
        .set(format.to_string(), override_set)
}

pub fn global_file_format() -> String {
    SETTINGS.global_file_format.read().value.clone()
}

/// Set whether new loggers report their call site
pub fn set_report_caller(enabled: bool, override_set: bool) -> bool {
    SETTINGS.report_caller.write().set(enabled, override_set).1
}

pub fn report_caller() -> bool {
    SETTINGS.report_caller.read().value
}
