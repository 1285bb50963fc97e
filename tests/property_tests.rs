//! Property-based tests for rust_multi_logger using proptest

use proptest::prelude::*;
use rust_multi_logger::formatter::CompiledTemplate;
use rust_multi_logger::prelude::*;
use rust_multi_logger::{compute_levels, round_duration, try_parse_level};
use std::io::Write;
use std::sync::Arc;

// ============================================================================
// Level Tests
// ============================================================================

fn level_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("panic"),
        Just("fatal"),
        Just("error"),
        Just("warn"),
        Just("warning"),
        Just("info"),
        Just("debug"),
        Just("trace"),
        Just("print"),
        Just("disabled"),
    ]
}

proptest! {
    /// Level names are recognized whatever their case
    #[test]
    fn test_level_name_case_insensitive(name in level_name(), mask in any::<u16>()) {
        let mixed: String = name
            .chars()
            .enumerate()
            .map(|(i, c)| if mask & (1 << (i % 16)) != 0 { c.to_ascii_uppercase() } else { c })
            .collect();
        let expected: Level = name.parse().unwrap();
        prop_assert_eq!(mixed.parse::<Level>().unwrap(), expected);
    }

    /// Named levels survive a display/parse cycle
    #[test]
    fn test_level_display_parse(name in level_name()) {
        let level: Level = name.parse().unwrap();
        prop_assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
    }

    /// Any ordinal is a level, given as a number or as text
    #[test]
    fn test_level_ordinals(ordinal in any::<u32>()) {
        prop_assert_eq!(ordinal.to_string().parse::<Level>().unwrap(), Level::new(ordinal));
        prop_assert_eq!(try_parse_level(ordinal).unwrap(), Level::new(ordinal));
    }

    /// Negative ordinals are rejected
    #[test]
    fn test_negative_ordinals(ordinal in i64::MIN..0) {
        prop_assert!(try_parse_level(ordinal).is_err());
        prop_assert!(ordinal.to_string().parse::<Level>().is_err());
    }

    /// A hook accepts its minimum and every more severe level
    #[test]
    fn test_compute_levels(minimum in 0u32..40, accepts_print in any::<bool>()) {
        let levels = compute_levels(Level::new(minimum), accepts_print);
        let offset = usize::from(accepts_print);
        prop_assert_eq!(levels.len(), minimum as usize + 1 + offset);
        prop_assert_eq!(levels.first() == Some(&Level::PRINT), accepts_print);
        for (i, level) in levels[offset..].iter().enumerate() {
            prop_assert_eq!(level.value(), i as u32);
        }
    }

    /// Hook levels follow the computed level list
    #[test]
    fn test_hook_accepts(minimum in 0u32..10, level in 0u32..12) {
        let hook = Hook::console("", Level::new(minimum));
        prop_assert_eq!(hook.accepts(Level::new(level)), level <= minimum);
        prop_assert!(hook.accepts(Level::PRINT));
    }
}

// ============================================================================
// Duration Tests
// ============================================================================

proptest! {
    /// Rounding a rounded duration changes nothing
    #[test]
    fn test_round_duration_idempotent(nanos in -(i64::MAX / 2)..(i64::MAX / 2)) {
        let once = round_duration(chrono::Duration::nanoseconds(nanos));
        prop_assert_eq!(round_duration(once), once);
    }

    /// Rounding is symmetric around zero
    #[test]
    fn test_round_duration_symmetric(nanos in 0..(i64::MAX / 2)) {
        let positive = round_duration(chrono::Duration::nanoseconds(nanos));
        let negative = round_duration(chrono::Duration::nanoseconds(-nanos));
        prop_assert_eq!(negative, -positive);
    }

    /// Durations below a microsecond are never rounded
    #[test]
    fn test_small_durations_exact(nanos in 0i64..1_000) {
        let duration = chrono::Duration::nanoseconds(nanos);
        prop_assert_eq!(round_duration(duration), duration);
    }

    /// Negative durations render as the positive one with a sign
    #[test]
    fn test_negative_duration_format(nanos in 1i64..(i64::MAX / 2), rounded in any::<bool>()) {
        let format = DurationFormat::new(DurationStyle::Precise, rounded, false);
        prop_assert_eq!(
            format.format(chrono::Duration::nanoseconds(-nanos)),
            format!("-{}", format.format(chrono::Duration::nanoseconds(nanos)))
        );
    }
}

// ============================================================================
// Template Tests
// ============================================================================

proptest! {
    /// Compiling the same template gives the same result
    #[test]
    fn test_compile_deterministic(format in "[a-z %:,]{0,40}") {
        let first = CompiledTemplate::compile(&format, false);
        let second = CompiledTemplate::compile(&format, false);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.skeleton(), b.skeleton());
                prop_assert_eq!(a.field_count(), b.field_count());
            }
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "compilation of {:?} is not deterministic", format),
        }
    }

    /// Text without placeholders is reproduced after the message
    #[test]
    fn test_literal_template(prefix in "[a-zA-Z0-9 .,!?]{0,30}", message in "[a-zA-Z0-9 .,!?]{0,50}") {
        let formatter = TemplateFormatter::new(false, &[&format!("{}%msg%", prefix)]);
        let line = formatter.format(&LogEntry::new(Level::INFO, message.clone())).unwrap();
        prop_assert_eq!(line, format!("{}{}\n", prefix, message));
    }
}

// ============================================================================
// Catcher Tests
// ============================================================================

proptest! {
    /// Untagged text comes out unchanged, however it is split
    #[test]
    fn test_untagged_text_passes_through(chunks in prop::collection::vec("[a-z \n]{0,20}", 0..10)) {
        let output = BufferWriter::new();
        let formatter: Arc<dyn Formatter> = Arc::new(TemplateFormatter::new(false, &["%msg%"]));
        let log = Logger::with_hooks("catcher", [Hook::console_with("", Level::TRACE, Some(formatter))]);
        log.set_all_outputs(output.clone());

        let mut sink = &log;
        for chunk in &chunks {
            prop_assert_eq!(sink.write(chunk.as_bytes()).unwrap(), chunk.len());
        }
        log.close().unwrap();
        prop_assert_eq!(output.contents(), chunks.concat());
    }
}
