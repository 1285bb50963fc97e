//! Log level definitions
//!
//! Levels are ordered from the most severe (`PANIC`) to the most verbose
//! (`TRACE`); any ordinal above trace is accepted as an even more verbose
//! level. Two sentinels live at the top of the scale: `PRINT` marks raw
//! passthrough output and `DISABLED` is never accepted by any hook.

use super::color::Attribute;
use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "LevelRepr", into = "String")]
pub struct Level(u32);

impl Level {
    pub const PANIC: Level = Level(0);
    pub const FATAL: Level = Level(1);
    pub const ERROR: Level = Level(2);
    pub const WARN: Level = Level(3);
    pub const INFO: Level = Level(4);
    pub const DEBUG: Level = Level(5);
    pub const TRACE: Level = Level(6);

    /// Synthetic level used for unformatted passthrough text
    pub const PRINT: Level = Level(u32::MAX - 1);
    /// A hook configured at this level never fires
    pub const DISABLED: Level = Level(u32::MAX);

    /// Standard levels, most severe first
    pub const ALL: [Level; 7] = [
        Level::PANIC,
        Level::FATAL,
        Level::ERROR,
        Level::WARN,
        Level::INFO,
        Level::DEBUG,
        Level::TRACE,
    ];

    pub const fn new(value: u32) -> Self {
        Level(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_disabled(self) -> bool {
        self.0 == u32::MAX
    }

    pub const fn is_print(self) -> bool {
        self.0 == u32::MAX - 1
    }

    pub fn to_str(&self) -> Option<&'static str> {
        match *self {
            Level::PANIC => Some("panic"),
            Level::FATAL => Some("fatal"),
            Level::ERROR => Some("error"),
            Level::WARN => Some("warning"),
            Level::INFO => Some("info"),
            Level::DEBUG => Some("debug"),
            Level::TRACE => Some("trace"),
            Level::PRINT => Some("print"),
            Level::DISABLED => Some("disabled"),
            _ => None,
        }
    }

    /// Color attributes applied by the `color` template attribute
    pub fn default_attributes(&self) -> Vec<Attribute> {
        use colored::Color;
        match *self {
            Level::PANIC => vec![Attribute::Fg(Color::Magenta), Attribute::Bold],
            Level::FATAL => vec![Attribute::Fg(Color::Red), Attribute::Bold],
            Level::ERROR => vec![Attribute::Fg(Color::Red)],
            Level::WARN => vec![Attribute::Fg(Color::Yellow)],
            Level::INFO => vec![Attribute::Fg(Color::Blue), Attribute::Bold],
            Level::DEBUG => vec![Attribute::Fg(Color::Green)],
            Level::TRACE => vec![Attribute::Fg(Color::Green), Attribute::Faint],
            _ => Vec::new(),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::WARN
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "level({})", self.0),
        }
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Level::DISABLED);
        }
        if let Ok(ordinal) = trimmed.parse::<i64>() {
            return Level::try_from(ordinal);
        }
        match trimmed.to_lowercase().as_str() {
            "panic" => Ok(Level::PANIC),
            "fatal" => Ok(Level::FATAL),
            "error" => Ok(Level::ERROR),
            "warn" | "warning" => Ok(Level::WARN),
            "info" => Ok(Level::INFO),
            "debug" => Ok(Level::DEBUG),
            "trace" => Ok(Level::TRACE),
            "print" => Ok(Level::PRINT),
            "disabled" => Ok(Level::DISABLED),
            _ => Err(LoggerError::invalid_level(
                s,
                format!("not a valid level, accepted values are {}", accepted_levels_string()),
            )),
        }
    }
}

impl TryFrom<i64> for Level {
    type Error = LoggerError;

    fn try_from(value: i64) -> Result<Self> {
        u32::try_from(value)
            .map(Level)
            .map_err(|_| LoggerError::invalid_level(value.to_string(), "ordinal out of range"))
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Ordinal(i64),
    Name(String),
}

impl TryFrom<LevelRepr> for Level {
    type Error = LoggerError;

    fn try_from(repr: LevelRepr) -> Result<Self> {
        match repr {
            LevelRepr::Ordinal(value) => Level::try_from(value),
            LevelRepr::Name(name) => name.parse(),
        }
    }
}

/// Anything that can be resolved into a [`Level`]: names, ordinals or levels.
pub trait TryIntoLevel {
    fn try_into_level(self) -> Result<Level>;
}

impl TryIntoLevel for Level {
    fn try_into_level(self) -> Result<Level> {
        Ok(self)
    }
}

impl TryIntoLevel for &str {
    fn try_into_level(self) -> Result<Level> {
        self.parse()
    }
}

impl TryIntoLevel for String {
    fn try_into_level(self) -> Result<Level> {
        self.parse()
    }
}

impl TryIntoLevel for &String {
    fn try_into_level(self) -> Result<Level> {
        self.parse()
    }
}

impl<T: TryIntoLevel> TryIntoLevel for Option<T> {
    fn try_into_level(self) -> Result<Level> {
        match self {
            Some(value) => value.try_into_level(),
            None => Ok(Level::DISABLED),
        }
    }
}

macro_rules! impl_try_into_level_for_int {
    ($($ty:ty),*) => {
        $(
            impl TryIntoLevel for $ty {
                fn try_into_level(self) -> Result<Level> {
                    u32::try_from(self)
                        .map(Level)
                        .map_err(|_| LoggerError::invalid_level(self.to_string(), "ordinal out of range"))
                }
            }
        )*
    };
}

impl_try_into_level_for_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Resolve a level, reporting the offending input on failure
pub fn try_parse_level<T: TryIntoLevel>(value: T) -> Result<Level> {
    value.try_into_level()
}

/// Resolve a level, panicking on invalid input
///
/// # Panics
///
/// Panics if the value cannot be converted. Use [`try_parse_level`] to
/// handle the error instead.
pub fn parse_level<T: TryIntoLevel>(value: T) -> Level {
    match value.try_into_level() {
        Ok(level) => level,
        Err(e) => panic!("{}", e),
    }
}

pub fn accepted_levels() -> Vec<&'static str> {
    std::iter::once("disabled")
        .chain(Level::ALL.iter().filter_map(|level| level.to_str()))
        .collect()
}

pub fn accepted_levels_string() -> String {
    accepted_levels().join(", ")
}
