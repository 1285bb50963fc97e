//! Template renderer
//!
//! Values are computed in template order, except the `fields` placeholders
//! which need to know every field consumed by name first. The values are
//! then spliced into the skeleton at their recorded offsets.

use super::template::{CompiledTemplate, FieldSpec, Token, Transform};
use super::text::FormatOptions;
use crate::core::color::{sgr_prefix, strip_ansi, SGR_RESET};
use crate::core::duration::round_to;
use crate::core::log_context::FieldValue;
use crate::core::log_entry::{Caller, LogEntry};
use crate::core::log_level::Level;
use crate::core::settings;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

/// Formatter state visible to one rendering
pub(crate) struct RenderContext<'a> {
    pub color: bool,
    pub options: &'a FormatOptions,
    /// Creation time of the formatter, origin of `delay`
    pub base_time: DateTime<Utc>,
    /// Time of the previous rendered entry, origin of `delta`
    pub last: DateTime<Utc>,
}

impl RenderContext<'_> {
    fn format_time(&self, time: DateTime<Utc>) -> String {
        match self.options.zone.or_else(settings::display_zone) {
            Some(zone) => self
                .options
                .timestamp_format
                .format(&time.with_timezone(&zone)),
            None => self.options.timestamp_format.format(&time),
        }
    }

    fn elapsed(&self, time: DateTime<Utc>, begin: DateTime<Utc>) -> String {
        let precision = self
            .options
            .round_duration
            .filter(|round| !round.is_zero())
            .unwrap_or_else(settings::duration_precision);
        let precision = chrono::Duration::from_std(precision)
            .unwrap_or_else(|_| chrono::Duration::milliseconds(1));
        let delay = round_to(time - begin, precision);
        if delay.is_zero() {
            format!("<{}", self.format_duration(precision))
        } else {
            self.format_duration(delay)
        }
    }

    fn format_duration(&self, duration: chrono::Duration) -> String {
        match &self.options.duration_fn {
            Some(function) => function(duration),
            None => settings::duration_style().format(duration),
        }
    }

    fn format_caller(&self, caller: &Caller) -> String {
        match &self.options.caller_fn {
            Some(function) => function(caller),
            None => default_caller_format(caller),
        }
    }
}

/// `function file:line`, omitting the missing parts
pub fn default_caller_format(caller: &Caller) -> String {
    let mut result = caller.function.clone();
    if !caller.file.is_empty() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(&format!("{}:{}", caller.file, caller.line));
    }
    result
}

impl CompiledTemplate {
    pub(crate) fn render(&self, entry: &LogEntry, ctx: &RenderContext<'_>) -> String {
        let mut used = HashSet::new();
        let mut values: Vec<Option<String>> = self
            .fields
            .iter()
            .map(|spec| self.field_value(spec, entry, ctx, &mut used))
            .collect();

        for (spec, value) in self.fields.iter().zip(values.iter_mut()) {
            if value.is_none() {
                *value = Some(self.remaining_fields(spec, entry, ctx, &used));
            }
        }

        let extra: usize = values.iter().flatten().map(String::len).sum();
        let mut output = String::with_capacity(self.skeleton.len() + extra + 1);
        let mut previous = 0;
        for (spec, value) in self.fields.iter().zip(&values) {
            output.push_str(&self.skeleton[previous..spec.position]);
            output.push_str(value.as_deref().unwrap_or_default());
            previous = spec.position;
        }
        output.push_str(&self.skeleton[previous..]);
        output.push('\n');
        output
    }

    /// Rendered value of a placeholder, `None` for deferred `fields`
    fn field_value<'a>(
        &'a self,
        spec: &'a FieldSpec,
        entry: &LogEntry,
        ctx: &RenderContext<'_>,
        used: &mut HashSet<&'a str>,
    ) -> Option<String> {
        let mut print_key = spec.print_key;
        let caller = entry.caller.as_ref();
        let value = match &spec.token {
            Token::Field(name) => {
                used.insert(name.as_str());
                let found = match entry.fields.get(name) {
                    Some(FieldValue::String(s)) if s.is_empty() => None,
                    Some(FieldValue::Null) if spec.ignore_empty => None,
                    Some(value) => Some(value.to_string()),
                    None => None,
                };
                found.unwrap_or_else(|| {
                    print_key = false;
                    String::new()
                })
            }
            Token::Message => entry.message.clone(),
            Token::Level => ctx
                .options
                .level_names
                .get(&entry.level)
                .cloned()
                .unwrap_or_else(|| entry.level.to_string()),
            Token::Time => ctx.format_time(entry.timestamp),
            Token::Delta => ctx.elapsed(entry.timestamp, ctx.last),
            Token::Delay => ctx.elapsed(entry.timestamp, ctx.base_time),
            Token::GlobalDelay => ctx.elapsed(entry.timestamp, settings::global_time()),
            Token::Module => entry.module.clone(),
            Token::Func => caller.map(|c| c.function.clone()).unwrap_or_default(),
            Token::File => caller.map(|c| c.file.clone()).unwrap_or_default(),
            Token::Line => caller.map(|c| c.line.to_string()).unwrap_or_default(),
            Token::Caller => caller.map(|c| ctx.format_caller(c)).unwrap_or_default(),
            Token::Fields => return None,
            Token::FieldWrapper | Token::KeyWrapper | Token::Unset => String::new(),
        };
        Some(self.format_field(spec, spec.token.key_name(), &value, print_key, entry.level, ctx))
    }

    /// Sorted `key=value` list of the fields not consumed by name
    fn remaining_fields(
        &self,
        spec: &FieldSpec,
        entry: &LogEntry,
        ctx: &RenderContext<'_>,
        used: &HashSet<&str>,
    ) -> String {
        let level = entry.level;
        let pairs: Vec<String> = entry
            .fields
            .iter()
            .filter(|(key, value)| {
                !used.contains(key.as_str()) && !(spec.ignore_empty && value.is_null())
            })
            .map(|(key, value)| {
                if spec.no_key_format {
                    format!("{}={}", key, value)
                } else {
                    self.format_value(&self.key_spec, &format!("{}=", key), level, ctx)
                        + &self.format_value(&self.value_spec, &value.to_string(), level, ctx)
                }
            })
            .collect();
        let fields = pairs.join(" ");
        let print_key = spec.print_key && (!spec.ignore_empty || !fields.is_empty());
        self.format_field(spec, "Fields", &fields, print_key, level, ctx)
    }

    fn format_value(&self, spec: &FieldSpec, value: &str, level: Level, ctx: &RenderContext<'_>) -> String {
        self.format_field(spec, "", value, false, level, ctx)
    }

    fn format_field(
        &self,
        spec: &FieldSpec,
        key: &str,
        value: &str,
        print_key: bool,
        level: Level,
        ctx: &RenderContext<'_>,
    ) -> String {
        if spec.ignore_empty && value.trim().is_empty() {
            return String::new();
        }

        let value: Cow<'_, str> = if ctx.color {
            Cow::Borrowed(value)
        } else {
            strip_ansi(value)
        };
        let mut value = match spec.transform {
            Transform::None => value.into_owned(),
            Transform::Upper => value.to_uppercase(),
            Transform::Lower => value.to_lowercase(),
            Transform::Title => title_case(&value),
        };

        if let Some(limit) = spec.limit {
            if let Some((index, _)) = value.char_indices().nth(limit) {
                value.truncate(index);
            }
        }
        if let Some(width) = spec.width {
            let left_aligned = width < 0;
            let width = usize::try_from(width.unsigned_abs()).unwrap_or(usize::MAX);
            value = if left_aligned {
                format!("{:<width$}", value)
            } else {
                format!("{:>width$}", value)
            };
        }
        value = spec.bracket.wrap(value);
        if spec.add_space {
            value.push(' ');
        }
        if let Some(prefix) = self.painter(spec, level, ctx) {
            value = format!("{}{}{}", prefix, value, SGR_RESET);
        }

        if spec.token.is_wrapper() {
            return value;
        }
        if print_key {
            if spec.no_key_format {
                format!("{}={}", key, value)
            } else {
                self.format_value(&self.key_spec, &format!("{}=", key), level, ctx)
                    + &self.format_value(&self.value_spec, &value, level, ctx)
            }
        } else if !spec.no_key_format {
            self.format_value(&self.value_spec, &value, level, ctx)
        } else {
            value
        }
    }

    /// SGR prefix applied to the field at this level, cached per level
    fn painter(&self, spec: &FieldSpec, level: Level, ctx: &RenderContext<'_>) -> Option<Arc<str>> {
        if let Some(cached) = spec.painters.read().get(&level) {
            return cached.clone();
        }

        let mut attributes = Vec::new();
        if ctx.color && (spec.color || !spec.attributes.is_empty()) {
            attributes.extend_from_slice(&spec.attributes);
            if spec.color {
                if let Some(palette) = ctx.options.color_map.get(&level) {
                    attributes.extend_from_slice(palette);
                }
            }
        }
        let painter: Option<Arc<str>> = if attributes.is_empty() {
            None
        } else {
            Some(Arc::from(sgr_prefix(&attributes)))
        };
        spec.painters.write().insert(level, painter.clone());
        painter
    }
}

/// Uppercase the first letter of every word
fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    result
}
