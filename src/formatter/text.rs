//! Template based text formatter

use super::render::RenderContext;
use super::template::CompiledTemplate;
use super::{Formatter, DEFAULT_CONSOLE_FORMAT, DEFAULT_FILE_FORMAT, DEFAULT_TEMPLATE};
use crate::core::color::Attribute;
use crate::core::duration::DurationFn;
use crate::core::error::Result;
use crate::core::log_entry::{Caller, LogEntry};
use crate::core::log_level::Level;
use crate::core::settings;
use crate::core::timestamp::TimestampFormat;
use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Function rendering the `caller` token
pub type CallerFn = Arc<dyn Fn(&Caller) -> String + Send + Sync>;

/// Rendering settings of a [`TemplateFormatter`]
#[derive(Clone)]
pub struct FormatOptions {
    pub timestamp_format: TimestampFormat,
    /// Attributes of the `color` keyword, per level
    pub color_map: HashMap<Level, Vec<Attribute>>,
    /// Display name overrides for the `level` token
    pub level_names: HashMap<Level, String>,
    /// Rounding of duration tokens, the process-wide precision when unset
    pub round_duration: Option<Duration>,
    pub duration_fn: Option<DurationFn>,
    pub caller_fn: Option<CallerFn>,
    /// Zone of the `time` token, the process-wide zone when unset
    pub zone: Option<FixedOffset>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::Classic,
            color_map: Level::ALL
                .iter()
                .map(|level| (*level, level.default_attributes()))
                .collect(),
            level_names: HashMap::new(),
            round_duration: None,
            duration_fn: None,
            caller_fn: None,
            zone: None,
        }
    }
}

impl fmt::Debug for FormatOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatOptions")
            .field("timestamp_format", &self.timestamp_format)
            .field("color_map", &self.color_map)
            .field("level_names", &self.level_names)
            .field("round_duration", &self.round_duration)
            .field("duration_fn", &self.duration_fn.is_some())
            .field("caller_fn", &self.caller_fn.is_some())
            .field("zone", &self.zone)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct Clock {
    base_time: DateTime<Utc>,
    last: DateTime<Utc>,
}

/// Formatter driven by a template string
///
/// The template is compiled on first use and reused until the format or
/// the color mode changes.
///
/// # Examples
///
/// ```
/// use rust_multi_logger::formatter::{Formatter, TemplateFormatter};
/// use rust_multi_logger::{Level, LogEntry};
///
/// let formatter = TemplateFormatter::new(false, &["%-8level:upper% %message%"]);
/// let line = formatter.format(&LogEntry::new(Level::INFO, "ready")).unwrap();
/// assert_eq!(line, "INFO     ready\n");
/// ```
pub struct TemplateFormatter {
    format: RwLock<String>,
    color: AtomicBool,
    options: RwLock<FormatOptions>,
    compiled: RwLock<Option<Arc<CompiledTemplate>>>,
    // Held while compiling and while invalidating the compiled template
    compile_lock: Mutex<()>,
    clock: Mutex<Clock>,
}

impl TemplateFormatter {
    /// Create a formatter using the first non-empty format of the list
    pub fn new(color: bool, formats: &[&str]) -> Self {
        // Anchors the process-wide reference time no later than the first formatter
        settings::global_time();
        let now = Utc::now();
        Self {
            format: RwLock::new(first_format(formats)),
            color: AtomicBool::new(color),
            options: RwLock::new(FormatOptions::default()),
            compiled: RwLock::new(None),
            compile_lock: Mutex::new(()),
            clock: Mutex::new(Clock {
                base_time: now,
                last: now,
            }),
        }
    }

    /// Formatter used by console hooks
    pub fn console() -> Self {
        let color = colored::control::SHOULD_COLORIZE.should_colorize();
        let global = settings::global_format();
        Self::new(color, &[global.as_str(), DEFAULT_CONSOLE_FORMAT])
    }

    /// Formatter used by file hooks, never colored
    pub fn file() -> Self {
        let file_format = settings::global_file_format();
        let global = settings::global_format();
        Self::new(
            false,
            &[file_format.as_str(), global.as_str(), DEFAULT_FILE_FORMAT],
        )
    }

    /// Use another layout for the `time` token
    ///
    /// # Errors
    ///
    /// Returns an error if a custom layout holds an unknown specifier.
    pub fn with_timestamp_format(mut self, format: impl Into<TimestampFormat>) -> Result<Self> {
        let format = format.into();
        format.validate()?;
        self.options.get_mut().timestamp_format = format;
        Ok(self)
    }

    #[must_use]
    pub fn with_color_map(mut self, color_map: HashMap<Level, Vec<Attribute>>) -> Self {
        self.options.get_mut().color_map = color_map;
        self
    }

    #[must_use]
    pub fn with_level_name(mut self, level: Level, name: impl Into<String>) -> Self {
        self.options.get_mut().level_names.insert(level, name.into());
        self
    }

    #[must_use]
    pub fn with_round_duration(mut self, precision: Duration) -> Self {
        self.options.get_mut().round_duration = Some(precision);
        self
    }

    #[must_use]
    pub fn with_duration_fn(mut self, function: DurationFn) -> Self {
        self.options.get_mut().duration_fn = Some(function);
        self
    }

    #[must_use]
    pub fn with_caller_fn(mut self, function: CallerFn) -> Self {
        self.options.get_mut().caller_fn = Some(function);
        self
    }

    #[must_use]
    pub fn with_zone(mut self, zone: FixedOffset) -> Self {
        self.options.get_mut().zone = Some(zone);
        self
    }

    #[must_use]
    pub fn with_base_time(mut self, time: DateTime<Utc>) -> Self {
        let clock = self.clock.get_mut();
        clock.base_time = time;
        clock.last = time;
        self
    }

    pub fn log_format(&self) -> String {
        self.format.read().clone()
    }

    /// Replace the template with the first non-empty format of the list
    pub fn set_log_format(&self, formats: &[&str]) -> &Self {
        let _guard = self.compile_lock.lock();
        *self.format.write() = first_format(formats);
        *self.compiled.write() = None;
        self
    }

    pub fn is_color(&self) -> bool {
        self.color.load(Ordering::Acquire)
    }

    pub fn options(&self) -> FormatOptions {
        self.options.read().clone()
    }

    pub fn set_timestamp_format(&self, format: impl Into<TimestampFormat>) -> Result<()> {
        let format = format.into();
        format.validate()?;
        self.options.write().timestamp_format = format;
        Ok(())
    }

    pub fn set_color_map(&self, color_map: HashMap<Level, Vec<Attribute>>) {
        let _guard = self.compile_lock.lock();
        self.options.write().color_map = color_map;
        *self.compiled.write() = None;
    }

    pub fn set_level_name(&self, level: Level, name: impl Into<String>) {
        self.options.write().level_names.insert(level, name.into());
    }

    pub fn set_round_duration(&self, precision: Option<Duration>) {
        self.options.write().round_duration = precision;
    }

    pub fn set_duration_fn(&self, function: Option<DurationFn>) {
        self.options.write().duration_fn = function;
    }

    pub fn set_caller_fn(&self, function: Option<CallerFn>) {
        self.options.write().caller_fn = function;
    }

    pub fn set_zone(&self, zone: Option<FixedOffset>) {
        self.options.write().zone = zone;
    }

    /// Reset the origin of the `delay` and `delta` tokens
    pub fn set_base_time(&self, time: DateTime<Utc>) {
        let mut clock = self.clock.lock();
        clock.base_time = time;
        clock.last = time;
    }

    pub fn base_time(&self) -> DateTime<Utc> {
        self.clock.lock().base_time
    }

    /// Compile the template, or return the template compiled earlier.
    ///
    /// Concurrent callers wait for a single compilation. A failed
    /// compilation is not cached.
    pub fn compile(&self) -> Result<Arc<CompiledTemplate>> {
        if let Some(template) = self.compiled.read().as_ref() {
            return Ok(Arc::clone(template));
        }

        let _guard = self.compile_lock.lock();
        if let Some(template) = self.compiled.read().as_ref() {
            return Ok(Arc::clone(template));
        }
        let template = Arc::new(CompiledTemplate::compile(
            &self.format.read(),
            self.is_color(),
        )?);
        *self.compiled.write() = Some(Arc::clone(&template));
        Ok(template)
    }

    /// # Panics
    ///
    /// Panics if the template refers to unknown attributes.
    pub fn must_compile(&self) -> Arc<CompiledTemplate> {
        match self.compile() {
            Ok(template) => template,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Formatter for TemplateFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        let template = self.compile()?;
        let clock = *self.clock.lock();
        let output = {
            let options = self.options.read();
            let ctx = RenderContext {
                color: self.is_color(),
                options: &options,
                base_time: clock.base_time,
                last: clock.last,
            };
            template.render(entry, &ctx)
        };
        self.clock.lock().last = entry.timestamp;
        Ok(output)
    }

    fn set_color(&self, color: bool) {
        let _guard = self.compile_lock.lock();
        self.color.store(color, Ordering::Release);
        *self.compiled.write() = None;
    }

    fn as_template(&self) -> Option<&TemplateFormatter> {
        Some(self)
    }
}

impl fmt::Debug for TemplateFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFormatter")
            .field("format", &*self.format.read())
            .field("color", &self.is_color())
            .finish_non_exhaustive()
    }
}

fn first_format(formats: &[&str]) -> String {
    formats
        .iter()
        .find(|format| !format.is_empty())
        .map_or_else(|| DEFAULT_TEMPLATE.to_string(), |format| format.to_string())
}
