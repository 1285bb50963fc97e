//! Terminal color attributes resolved from their names
//!
//! Template attributes such as `Bold`, `Red`, `BgHiBlue` or `CrossedOut` are
//! looked up in a table built once; unknown names are reported rather than
//! ignored.

use super::error::{LoggerError, Result};
use colored::Color;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// One SGR attribute: a text style or a foreground/background color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Reset,
    Bold,
    Faint,
    Italic,
    Underline,
    BlinkSlow,
    BlinkRapid,
    ReverseVideo,
    Concealed,
    CrossedOut,
    Fg(Color),
    Bg(Color),
}

impl Attribute {
    /// SGR parameter for this attribute
    pub fn code(&self) -> Cow<'static, str> {
        match self {
            Attribute::Reset => "0".into(),
            Attribute::Bold => "1".into(),
            Attribute::Faint => "2".into(),
            Attribute::Italic => "3".into(),
            Attribute::Underline => "4".into(),
            Attribute::BlinkSlow => "5".into(),
            Attribute::BlinkRapid => "6".into(),
            Attribute::ReverseVideo => "7".into(),
            Attribute::Concealed => "8".into(),
            Attribute::CrossedOut => "9".into(),
            Attribute::Fg(color) => color.to_fg_str().to_string().into(),
            Attribute::Bg(color) => color.to_bg_str().to_string().into(),
        }
    }

    /// Case-insensitive lookup in the attribute name table
    pub fn from_name(name: &str) -> Option<Attribute> {
        ATTRIBUTE_NAMES.get(name.to_lowercase().as_str()).copied()
    }
}

const COLORS: [(&str, Color, Color); 8] = [
    ("black", Color::Black, Color::BrightBlack),
    ("red", Color::Red, Color::BrightRed),
    ("green", Color::Green, Color::BrightGreen),
    ("yellow", Color::Yellow, Color::BrightYellow),
    ("blue", Color::Blue, Color::BrightBlue),
    ("magenta", Color::Magenta, Color::BrightMagenta),
    ("cyan", Color::Cyan, Color::BrightCyan),
    ("white", Color::White, Color::BrightWhite),
];

static ATTRIBUTE_NAMES: LazyLock<HashMap<String, Attribute>> = LazyLock::new(|| {
    let mut names = HashMap::new();
    let styles = [
        ("reset", Attribute::Reset),
        ("bold", Attribute::Bold),
        ("faint", Attribute::Faint),
        ("italic", Attribute::Italic),
        ("underline", Attribute::Underline),
        ("blinkslow", Attribute::BlinkSlow),
        ("blink", Attribute::BlinkSlow),
        ("blinkrapid", Attribute::BlinkRapid),
        ("reversevideo", Attribute::ReverseVideo),
        ("reverse", Attribute::ReverseVideo),
        ("concealed", Attribute::Concealed),
        ("secret", Attribute::Concealed),
        ("crossedout", Attribute::CrossedOut),
        ("strikethrough", Attribute::CrossedOut),
        ("strike", Attribute::CrossedOut),
    ];
    for (name, attribute) in styles {
        names.insert(name.to_string(), attribute);
    }
    for (name, normal, bright) in COLORS {
        names.insert(name.to_string(), Attribute::Fg(normal));
        names.insert(format!("fg{name}"), Attribute::Fg(normal));
        names.insert(format!("hi{name}"), Attribute::Fg(bright));
        names.insert(format!("fghi{name}"), Attribute::Fg(bright));
        names.insert(format!("bg{name}"), Attribute::Bg(normal));
        names.insert(format!("bghi{name}"), Attribute::Bg(bright));
    }
    names
});

static ANSI_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\x1b\x{9b}][\[\]()#;?]*(?:(?:(?:[a-zA-Z\d]*(?:;[a-zA-Z\d]*)*)?\x07)|(?:(?:\d{1,4}(?:;\d{0,4})*)?[\dA-PRZcf-ntqry=><~]))",
    )
    .expect("ANSI escape pattern is valid")
});

/// Resolve a list of attribute specifications.
///
/// Each item may hold several names separated by any non alphanumeric
/// character (`"Red+Bold"`, `"bold, BgBlue"`). Every unknown name is reported
/// together in a single error, which also notes when nothing was resolved.
pub fn try_convert_attributes<I, S>(specs: I) -> Result<Vec<Attribute>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = Vec::new();
    let mut errors = Vec::new();
    for spec in specs {
        for name in spec
            .as_ref()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|name| !name.is_empty())
        {
            match Attribute::from_name(name) {
                Some(attribute) => result.push(attribute),
                None => errors.push(format!("Attribute not found {}", name)),
            }
        }
    }
    if result.is_empty() {
        errors.push("No attribute specified".to_string());
    }
    if errors.is_empty() {
        Ok(result)
    } else {
        Err(LoggerError::template(errors))
    }
}

/// Resolve attribute names, panicking on unknown ones
///
/// # Panics
///
/// Panics if any name is not a known attribute.
pub fn attributes<I, S>(specs: I) -> Vec<Attribute>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match try_convert_attributes(specs) {
        Ok(attributes) => attributes,
        Err(e) => panic!("{}", e),
    }
}

/// Escape sequence that switches the terminal to the given attributes
pub fn sgr_prefix(attributes: &[Attribute]) -> String {
    let codes: Vec<Cow<'static, str>> = attributes.iter().map(Attribute::code).collect();
    format!("\x1b[{}m", codes.join(";"))
}

pub const SGR_RESET: &str = "\x1b[0m";

/// Wrap text with the attributes and a trailing reset
pub fn paint(attributes: &[Attribute], text: &str) -> String {
    format!("{}{}{}", sgr_prefix(attributes), text, SGR_RESET)
}

/// Remove every ANSI escape sequence from the text
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_SEQUENCE.replace_all(text, "")
}
