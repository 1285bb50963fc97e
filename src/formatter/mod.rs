//! Entry formatters
//!
//! [`TemplateFormatter`] renders entries through the template language;
//! [`JsonFormatter`] produces one JSON object per entry.

mod json;
mod render;
mod template;
mod text;

pub use json::JsonFormatter;
pub use render::default_caller_format;
pub use template::{Bracket, CompiledTemplate, FieldSpec, Token, Transform};
pub use text::{CallerFn, FormatOptions, TemplateFormatter};

use crate::core::error::Result;
use crate::core::log_entry::LogEntry;

/// Template used when no format is given at all
pub const DEFAULT_TEMPLATE: &str = "[%.4level:color,upper%]: %time% - %message%";

/// Template of console hooks unless `MULTILOGGER_FORMAT` is set
pub const DEFAULT_CONSOLE_FORMAT: &str =
    "%module:Italic,Green,SquareBrackets,IgnoreEmpty,Space%%time% %-8level:upper,color% %message:color%";

/// Template of file hooks unless `MULTILOGGER_FILE_FORMAT` or `MULTILOGGER_FORMAT` is set
pub const DEFAULT_FILE_FORMAT: &str = "%module:SquareBrackets,IgnoreEmpty,Space%%time% %-8level:upper% %message%";

pub trait Formatter: Send + Sync {
    /// Render one entry, including its trailing newline
    fn format(&self, entry: &LogEntry) -> Result<String>;

    /// Switch colored output, ignored by formatters without colors
    fn set_color(&self, _color: bool) {}

    fn as_template(&self) -> Option<&TemplateFormatter> {
        None
    }
}
