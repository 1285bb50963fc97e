//! Human readable rendering of elapsed time
//!
//! Three styles are available:
//!
//! - `Native`: hours, minutes and fractional seconds (`5h5m5.005s`)
//! - `Precise`: every non-zero unit from years down to nanoseconds (`1w3d5h`)
//! - `Classic`: integer units above one minute, a single fractional value below
//!
//! Each style can be rounded to a magnitude-dependent precision and rendered
//! with short (`h`) or long (`hours`) unit names.

use super::error::{LoggerError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const NANOSECOND: i64 = 1;
pub const MICROSECOND: i64 = 1_000 * NANOSECOND;
pub const MILLISECOND: i64 = 1_000 * MICROSECOND;
pub const SECOND: i64 = 1_000 * MILLISECOND;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;
pub const DAY: i64 = 24 * HOUR;
pub const WEEK: i64 = 7 * DAY;
pub const MONTH: i64 = 30 * DAY;
pub const YEAR: i64 = 365 * DAY;

struct Unit {
    /// Smallest duration for which the unit is emitted
    delay: i64,
    divider: i64,
    short: &'static str,
    long: &'static str,
}

const UNITS: [Unit; 10] = [
    Unit { delay: YEAR, divider: YEAR, short: "y", long: "year" },
    Unit { delay: 45 * DAY, divider: MONTH, short: "mo", long: "month" },
    Unit { delay: 10 * DAY, divider: WEEK, short: "w", long: "week" },
    Unit { delay: DAY, divider: DAY, short: "d", long: "day" },
    Unit { delay: HOUR, divider: HOUR, short: "h", long: "hour" },
    Unit { delay: MINUTE, divider: MINUTE, short: "m", long: "minute" },
    Unit { delay: SECOND, divider: SECOND, short: "s", long: "second" },
    Unit { delay: MILLISECOND, divider: MILLISECOND, short: "ms", long: "millisecond" },
    Unit { delay: MICROSECOND, divider: MICROSECOND, short: "µs", long: "microsecond" },
    Unit { delay: NANOSECOND, divider: NANOSECOND, short: "ns", long: "nanosecond" },
];

/// Function used by formatters to render durations
pub type DurationFn = Arc<dyn Fn(Duration) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationStyle {
    Native,
    #[default]
    Precise,
    Classic,
}

impl DurationStyle {
    /// Units below `min` are rendered as a fraction, units at or above `max`
    /// are never used (zero means unbounded)
    fn window(self) -> (i64, i64) {
        match self {
            DurationStyle::Precise => (0, 0),
            DurationStyle::Classic => (MINUTE, 0),
            DurationStyle::Native => (MINUTE, DAY),
        }
    }
}

impl fmt::Display for DurationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DurationStyle::Native => "native",
            DurationStyle::Precise => "precise",
            DurationStyle::Classic => "classic",
        })
    }
}

/// Complete duration rendering preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DurationFormat {
    pub style: DurationStyle,
    pub rounded: bool,
    pub long_units: bool,
}

impl Default for DurationFormat {
    fn default() -> Self {
        Self {
            style: DurationStyle::Precise,
            rounded: true,
            long_units: false,
        }
    }
}

impl DurationFormat {
    #[must_use]
    pub fn new(style: DurationStyle, rounded: bool, long_units: bool) -> Self {
        Self {
            style,
            rounded,
            long_units,
        }
    }

    pub fn format(&self, duration: Duration) -> String {
        let mut nanos = to_nanos(duration);
        if nanos < 0 {
            return format!("-{}", self.format(Duration::nanoseconds(nanos.saturating_neg())));
        }
        if self.rounded {
            nanos = rounded_nanos(nanos);
        }
        let (min_unit, max_unit) = self.style.window();
        format_nanos(nanos, min_unit, max_unit, self.long_units)
    }

    /// Shareable rendering function for this preference
    pub fn function(self) -> DurationFn {
        Arc::new(move |duration| self.format(duration))
    }
}

impl fmt::Display for DurationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{}+{}",
            self.style,
            if self.rounded { "rounded" } else { "exact" },
            if self.long_units { "long" } else { "short" }
        )
    }
}

/// Parse a list of keywords such as `precise+rounded` or `classic,long`.
///
/// Keywords not mentioned keep their default value.
impl FromStr for DurationFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        let mut format = DurationFormat::default();
        for token in s
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            match token.to_lowercase().as_str() {
                "native" => format.style = DurationStyle::Native,
                "precise" => format.style = DurationStyle::Precise,
                "classic" => format.style = DurationStyle::Classic,
                "rounded" | "round" => format.rounded = true,
                "exact" => format.rounded = false,
                "long" => format.long_units = true,
                "short" => format.long_units = false,
                other => {
                    return Err(LoggerError::config(
                        "duration format",
                        format!("unknown keyword '{}' in '{}'", other, s),
                    ))
                }
            }
        }
        Ok(format)
    }
}

impl TryFrom<String> for DurationFormat {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DurationFormat> for String {
    fn from(format: DurationFormat) -> Self {
        format.to_string()
    }
}

/// Render a duration with the given style, without rounding, in short units
pub fn format_duration(duration: Duration, style: DurationStyle) -> String {
    DurationFormat::new(style, false, false).format(duration)
}

/// Round a duration to the precision matching its magnitude
pub fn round_duration(duration: Duration) -> Duration {
    let nanos = to_nanos(duration);
    if nanos < 0 {
        Duration::nanoseconds(-rounded_nanos(nanos.saturating_neg()))
    } else {
        Duration::nanoseconds(rounded_nanos(nanos))
    }
}

/// Round to the nearest multiple of `precision`, halfway values away from zero
pub fn round_to(duration: Duration, precision: Duration) -> Duration {
    Duration::nanoseconds(round_nanos(to_nanos(duration), to_nanos(precision)))
}

fn to_nanos(duration: Duration) -> i64 {
    duration.num_nanoseconds().unwrap_or(if duration < Duration::zero() {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn rounded_nanos(nanos: i64) -> i64 {
    let precision = match nanos {
        n if n >= MONTH => DAY,
        n if n >= HOUR => MINUTE,
        n if n >= 5 * MINUTE => SECOND,
        n if n >= MINUTE => 5 * SECOND,
        n if n >= 10 * SECOND => 100 * MILLISECOND,
        n if n >= SECOND => 10 * MILLISECOND,
        n if n >= MILLISECOND => 10 * MICROSECOND,
        n if n >= MICROSECOND => 10 * NANOSECOND,
        _ => return nanos,
    };
    round_nanos(nanos, precision)
}

fn round_nanos(nanos: i64, precision: i64) -> i64 {
    if precision <= 0 {
        return nanos;
    }
    let remainder = nanos % precision;
    if nanos < 0 {
        let remainder = -remainder;
        if remainder + remainder < precision {
            return nanos + remainder;
        }
        return nanos.checked_sub(precision - remainder).unwrap_or(i64::MIN);
    }
    if remainder + remainder < precision {
        return nanos - remainder;
    }
    nanos.checked_add(precision - remainder).unwrap_or(i64::MAX)
}

fn format_nanos(mut nanos: i64, min_unit: i64, max_unit: i64, long_units: bool) -> String {
    let mut result = String::new();
    for unit in &UNITS {
        if max_unit != 0 && unit.delay >= max_unit {
            continue;
        }
        if nanos < unit.delay {
            continue;
        }
        let value = if nanos > min_unit {
            let quotient = nanos / unit.divider;
            nanos -= quotient * unit.divider;
            quotient as f64
        } else {
            let value = nanos as f64 / unit.divider as f64;
            nanos = 0;
            value
        };
        if long_units {
            if !result.is_empty() {
                result.push(' ');
            }
            let plural = if value >= 2.0 { "s" } else { "" };
            result.push_str(&format!("{} {}{}", value, unit.long, plural));
        } else {
            result.push_str(&format!("{}{}", value, unit.short));
        }
    }
    if result.is_empty() {
        result.push_str(if long_units { "0 second" } else { "0s" });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nanos(n: i64) -> Duration {
        Duration::nanoseconds(n)
    }

    fn mixed(scale: i64, unit: i64) -> Duration {
        // 5 units + 5 of every smaller unit down to nanoseconds
        let mut total = 0;
        for u in [HOUR, MINUTE, SECOND, MILLISECOND, MICROSECOND, NANOSECOND] {
            if u <= unit {
                total += scale * u;
            }
        }
        nanos(total)
    }

    const CLASSIC: DurationFormat = DurationFormat {
        style: DurationStyle::Classic,
        rounded: false,
        long_units: false,
    };
    const CLASSIC_ROUNDED: DurationFormat = DurationFormat {
        style: DurationStyle::Classic,
        rounded: true,
        long_units: false,
    };
    const PRECISE: DurationFormat = DurationFormat {
        style: DurationStyle::Precise,
        rounded: false,
        long_units: false,
    };
    const PRECISE_ROUNDED: DurationFormat = DurationFormat {
        style: DurationStyle::Precise,
        rounded: true,
        long_units: false,
    };
    const NATIVE_LONG: DurationFormat = DurationFormat {
        style: DurationStyle::Native,
        rounded: false,
        long_units: true,
    };
    const ROUNDED_LONG: DurationFormat = DurationFormat {
        style: DurationStyle::Precise,
        rounded: true,
        long_units: true,
    };

    fn check(duration: Duration, expected: [&str; 6]) {
        let formats = [CLASSIC, CLASSIC_ROUNDED, PRECISE, PRECISE_ROUNDED, NATIVE_LONG, ROUNDED_LONG];
        for (format, expected) in formats.iter().zip(expected) {
            assert_eq!(format.format(duration), expected, "{} with {}", duration, format);
        }
    }

    #[test]
    fn test_zero() {
        check(Duration::zero(), ["0s", "0s", "0s", "0s", "0 second", "0 second"]);
    }

    #[test]
    fn test_small_units() {
        check(nanos(1), ["1ns", "1ns", "1ns", "1ns", "1 nanosecond", "1 nanosecond"]);
        check(
            nanos(10 * MICROSECOND),
            ["10µs", "10µs", "10µs", "10µs", "10 microseconds", "10 microseconds"],
        );
        check(
            mixed(5, MICROSECOND),
            ["5.005µs", "5.01µs", "5µs5ns", "5µs10ns", "5.005 microseconds", "5 microseconds 10 nanoseconds"],
        );
        check(
            mixed(5, MILLISECOND),
            [
                "5.005005ms",
                "5.01ms",
                "5ms5µs5ns",
                "5ms10µs",
                "5.005005 milliseconds",
                "5 milliseconds 10 microseconds",
            ],
        );
        check(
            mixed(5, SECOND),
            [
                "5.005005005s",
                "5.01s",
                "5s5ms5µs5ns",
                "5s10ms",
                "5.005005005 seconds",
                "5 seconds 10 milliseconds",
            ],
        );
    }

    #[test]
    fn test_minutes_and_hours() {
        check(nanos(MINUTE), ["1m", "1m", "1m", "1m", "1 minute", "1 minute"]);
        check(
            mixed(5, MINUTE),
            [
                "5m5.005005005s",
                "5m5s",
                "5m5s5ms5µs5ns",
                "5m5s",
                "5 minutes 5.005005005 seconds",
                "5 minutes 5 seconds",
            ],
        );
        check(
            mixed(5, HOUR),
            [
                "5h5m5.005005005s",
                "5h5m",
                "5h5m5s5ms5µs5ns",
                "5h5m",
                "5 hours 5 minutes 5.005005005 seconds",
                "5 hours 5 minutes",
            ],
        );
        check(nanos(DAY), ["1d", "1d", "1d", "1d", "24 hours", "1 day"]);
    }

    #[test]
    fn test_weeks_and_months() {
        check(nanos(240 * HOUR), ["1w3d", "1w3d", "1w3d", "1w3d", "240 hours", "1 week 3 days"]);
        check(nanos(168 * HOUR), ["7d", "7d", "7d", "7d", "168 hours", "7 days"]);
        check(nanos(720 * HOUR), ["4w2d", "4w2d", "4w2d", "4w2d", "720 hours", "4 weeks 2 days"]);
        check(
            nanos(1680 * HOUR),
            ["2mo1w3d", "2mo1w3d", "2mo1w3d", "2mo1w3d", "1680 hours", "2 months 1 week 3 days"],
        );
        check(
            nanos(960 * HOUR) + mixed(5, HOUR),
            [
                "5w5d5h5m5.005005005s",
                "5w5d",
                "5w5d5h5m5s5ms5µs5ns",
                "5w5d",
                "965 hours 5 minutes 5.005005005 seconds",
                "5 weeks 5 days",
            ],
        );
    }

    #[test]
    fn test_years() {
        assert_eq!(PRECISE.format(nanos(YEAR)), "1y");
        assert_eq!(PRECISE.format(nanos(2 * YEAR + 3 * DAY)), "2y3d");
        assert_eq!(ROUNDED_LONG.format(nanos(2 * YEAR + 3 * DAY)), "2 years 3 days");
        assert_eq!(NATIVE_LONG.format(nanos(YEAR)), "8760 hours");
    }

    #[test]
    fn test_precise_scenario() {
        let duration = nanos(HOUR + MINUTE + SECOND + MILLISECOND + MICROSECOND + NANOSECOND);
        assert_eq!(format_duration(duration, DurationStyle::Precise), "1h1m1s1ms1µs1ns");
        assert_eq!(format_duration(duration, DurationStyle::Classic), "1h1m1.001001001s");
    }

    #[test]
    fn test_negative() {
        assert_eq!(PRECISE.format(nanos(-90 * SECOND)), "-1m30s");
        assert_eq!(round_duration(nanos(-(5 * SECOND + 5 * MILLISECOND + 5))), nanos(-5_010 * MILLISECOND));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(nanos(7 * MILLISECOND), nanos(5 * MILLISECOND)), nanos(5 * MILLISECOND));
        assert_eq!(round_to(nanos(2_500), nanos(5_000)), nanos(5_000));
        assert_eq!(round_to(nanos(2_499), nanos(5_000)), Duration::zero());
        assert_eq!(round_to(nanos(-2_500), nanos(5_000)), nanos(-5_000));
        assert_eq!(round_to(nanos(1_234), Duration::zero()), nanos(1_234));
        assert_eq!(round_to(nanos(i64::MAX - 1), nanos(SECOND)), nanos(i64::MAX));
    }

    #[test]
    fn test_parse_format() {
        let format: DurationFormat = "classic,long".parse().unwrap();
        assert_eq!(format, DurationFormat::new(DurationStyle::Classic, true, true));

        let format: DurationFormat = "Native+Exact".parse().unwrap();
        assert_eq!(format, DurationFormat::new(DurationStyle::Native, false, false));

        assert_eq!("".parse::<DurationFormat>().unwrap(), DurationFormat::default());
        assert!("precise+fuzzy".parse::<DurationFormat>().is_err());

        let format = DurationFormat::new(DurationStyle::Classic, false, true);
        assert_eq!(format.to_string().parse::<DurationFormat>().unwrap(), format);
    }
}
