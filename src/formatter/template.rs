//! Template compiler
//!
//! A template is literal text with placeholders of the form
//! `%[width][.limit](token|field)[:attributes]%`. Compilation removes every
//! placeholder from the text, keeping the byte offset at which its rendered
//! value must be inserted.

use crate::core::color::{sgr_prefix, try_convert_attributes, Attribute};
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::Level;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"%(?:(?P<width>-?\d+)?(?:\.(?P<limit>\d+))?",
        r"(?:(?P<token>(?i:time|(?:global)?delay|global|delta|message|msg|level|lvl|module|func|file|line|caller|fields|key|field))",
        r"|(?P<field>\w+)))?",
        r"(?::(?P<attributes>[\w,+\-\s]*))?%",
    ))
    .expect("placeholder pattern is valid")
});

/// What a placeholder renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Message,
    Level,
    Time,
    Delta,
    Delay,
    GlobalDelay,
    Module,
    Func,
    File,
    Line,
    Caller,
    /// Every field not consumed by name elsewhere in the template
    Fields,
    /// Lookup of a named field
    Field(String),
    /// `%field:...%`, style applied to field values
    FieldWrapper,
    /// `%key:...%`, style applied to field keys
    KeyWrapper,
    /// Placeholder carrying only attributes
    Unset,
}

impl Token {
    fn from_name(name: &str) -> Option<Token> {
        Some(match name.to_lowercase().as_str() {
            "message" | "msg" => Token::Message,
            "level" | "lvl" => Token::Level,
            "time" => Token::Time,
            "delta" => Token::Delta,
            "delay" => Token::Delay,
            "globaldelay" | "global" => Token::GlobalDelay,
            "module" => Token::Module,
            "func" => Token::Func,
            "file" => Token::File,
            "line" => Token::Line,
            "caller" => Token::Caller,
            "fields" => Token::Fields,
            "field" => Token::FieldWrapper,
            "key" => Token::KeyWrapper,
            _ => return None,
        })
    }

    /// Key printed in front of the value by the `key` attribute
    pub fn key_name(&self) -> &str {
        match self {
            Token::Message => "Message",
            Token::Level => "Level",
            Token::Time => "Time",
            Token::Delta => "Delta",
            Token::Delay => "Delay",
            Token::GlobalDelay => "GlobalDelay",
            Token::Module => "Module",
            Token::Func => "Func",
            Token::File => "File",
            Token::Line => "Line",
            Token::Caller => "Caller",
            Token::Fields => "Fields",
            Token::Field(name) => name,
            Token::FieldWrapper | Token::KeyWrapper | Token::Unset => "",
        }
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self, Token::FieldWrapper | Token::KeyWrapper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    None,
    Upper,
    Lower,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bracket {
    #[default]
    None,
    Square,
    Curly,
    Round,
    Angle,
}

impl Bracket {
    pub fn wrap(self, value: String) -> String {
        match self {
            Bracket::None => value,
            Bracket::Square => format!("[{}]", value),
            Bracket::Curly => format!("{{{}}}", value),
            Bracket::Round => format!("({})", value),
            Bracket::Angle => format!("<{}>", value),
        }
    }
}

/// Compiled rendering behavior of one placeholder
#[derive(Debug)]
pub struct FieldSpec {
    pub token: Token,
    pub transform: Transform,
    pub bracket: Bracket,
    pub add_space: bool,
    pub ignore_empty: bool,
    pub print_key: bool,
    pub no_key_format: bool,
    /// Apply the level palette
    pub color: bool,
    /// Explicit attributes, only resolved when colors are enabled
    pub attributes: Vec<Attribute>,
    pub width: Option<i64>,
    pub limit: Option<usize>,
    /// Byte offset of the value in the skeleton
    pub position: usize,
    // SGR prefix per level, `None` when nothing is painted
    pub(crate) painters: RwLock<HashMap<Level, Option<Arc<str>>>>,
}

impl FieldSpec {
    fn new(token: Token, color: bool) -> Self {
        Self {
            token,
            transform: Transform::None,
            bracket: Bracket::None,
            add_space: false,
            ignore_empty: false,
            print_key: false,
            no_key_format: false,
            color,
            attributes: Vec::new(),
            width: None,
            limit: None,
            position: 0,
            painters: RwLock::new(HashMap::new()),
        }
    }

    /// Apply one attribute keyword, returns false if it is not a keyword
    fn apply_keyword(&mut self, keyword: &str) -> bool {
        match keyword {
            "color" => self.color = true,
            "upper" => self.transform = Transform::Upper,
            "lower" => self.transform = Transform::Lower,
            "title" => self.transform = Transform::Title,
            "key" => self.print_key = true,
            "curly" | "curlybrackets" => self.bracket = Bracket::Curly,
            "square" | "squarebrackets" => self.bracket = Bracket::Square,
            "round" | "roundbrackets" | "parens" | "parenthesis" => self.bracket = Bracket::Round,
            "angle" | "anglebrackets" => self.bracket = Bracket::Angle,
            "space" => self.add_space = true,
            "none" => self.no_key_format = true,
            "ignore" | "ignoreempty" => self.ignore_empty = true,
            _ => return false,
        }
        true
    }
}

/// Literal skeleton plus the placeholders to splice into it
#[derive(Debug)]
pub struct CompiledTemplate {
    pub(crate) skeleton: String,
    pub(crate) fields: Vec<FieldSpec>,
    pub(crate) key_spec: FieldSpec,
    pub(crate) value_spec: FieldSpec,
}

impl CompiledTemplate {
    /// Compile a template.
    ///
    /// Color attributes are always validated; they are only kept when `color`
    /// is true. All unknown attribute names are reported in one error.
    pub fn compile(format: &str, color: bool) -> Result<Self> {
        let mut skeleton = String::with_capacity(format.len());
        let mut fields = Vec::new();
        let mut key_spec = FieldSpec::new(Token::KeyWrapper, true);
        let mut value_spec = FieldSpec::new(Token::FieldWrapper, false);
        let mut errors = Vec::new();
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(format) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            skeleton.push_str(&format[last..whole.start()]);
            last = whole.end();

            let token = if let Some(token) = captures.name("token") {
                Token::from_name(token.as_str()).unwrap_or(Token::Unset)
            } else if let Some(field) = captures.name("field") {
                Token::Field(field.as_str().to_string())
            } else {
                Token::Unset
            };

            let mut spec = FieldSpec::new(token, false);
            spec.width = captures
                .name("width")
                .and_then(|width| width.as_str().parse().ok());
            spec.limit = captures
                .name("limit")
                .and_then(|limit| limit.as_str().parse().ok());

            let mut color_names = Vec::new();
            if let Some(attributes) = captures.name("attributes") {
                for name in attributes
                    .as_str()
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|name| !name.is_empty())
                {
                    if !spec.apply_keyword(&name.to_lowercase()) {
                        color_names.push(name);
                    }
                }
            }
            if !color_names.is_empty() {
                match try_convert_attributes(&color_names) {
                    Ok(attributes) if color => spec.attributes = attributes,
                    Ok(_) => {}
                    Err(LoggerError::Template { errors: found }) => errors.extend(found),
                    Err(other) => errors.push(other.to_string()),
                }
            }

            match spec.token {
                Token::KeyWrapper => key_spec = spec,
                Token::FieldWrapper => value_spec = spec,
                Token::Unset => {
                    // Attributes without a value switch the terminal state for
                    // the following literal text
                    if !spec.attributes.is_empty() {
                        skeleton.push_str(&sgr_prefix(&spec.attributes));
                    }
                }
                _ => {
                    spec.position = skeleton.len();
                    fields.push(spec);
                }
            }
        }
        skeleton.push_str(&format[last..]);

        if !errors.is_empty() {
            return Err(LoggerError::template(errors));
        }
        Ok(Self {
            skeleton,
            fields,
            key_spec,
            value_spec,
        })
    }

    /// Literal text of the template with every placeholder removed
    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    /// Number of placeholders producing output
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}
