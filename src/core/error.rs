//! Error types for the logger system

use std::fmt;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level that is neither a known name, an ordinal nor "disabled"
    #[error("Unable to parse logging level '{input}': {reason}")]
    InvalidLevel { input: String, reason: String },

    /// Every attribute that failed to resolve during one template compilation
    #[error("{}", errors.join("\n"))]
    Template { errors: Vec<String> },

    /// Failure raised by a hook, prefixed with the hook identity
    #[error("{hook}: {source}")]
    Hook {
        hook: String,
        #[source]
        source: Box<LoggerError>,
    },

    /// Destination accepted fewer bytes than requested
    #[error("Wrong number of bytes written ({written}) for {text:?}")]
    ShortWrite { written: usize, text: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// No hook registered under that name
    #[error("Hook not found {0}")]
    HookNotFound(String),

    /// Operation requested on a hook whose appender lacks the capability
    #[error("Hook {hook} does not support {operation}")]
    Unsupported { hook: String, operation: String },

    /// Appender panicked while firing
    #[error("{hook} panicked: {message}")]
    HookPanic { hook: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Errors accumulated by a logger during dispatch
    #[error("{0}")]
    Dispatch(ErrorList),
}

impl LoggerError {
    pub fn invalid_level(input: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn template(errors: Vec<String>) -> Self {
        LoggerError::Template { errors }
    }

    /// Wrap an error with the identity of the hook that produced it
    pub fn hook(hook: impl Into<String>, source: LoggerError) -> Self {
        LoggerError::Hook {
            hook: hook.into(),
            source: Box::new(source),
        }
    }

    pub fn short_write(written: usize, text: impl Into<String>) -> Self {
        LoggerError::ShortWrite {
            written,
            text: text.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn unsupported(hook: impl Into<String>, operation: impl Into<String>) -> Self {
        LoggerError::Unsupported {
            hook: hook.into(),
            operation: operation.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Ordered collection of errors gathered while dispatching entries.
///
/// Errors are reference counted so the list can be reported without being
/// drained (`Logger::get_error`) and drained later (`Logger::clear_error`).
#[derive(Debug, Clone, Default)]
pub struct ErrorList(Vec<Arc<LoggerError>>);

impl ErrorList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: LoggerError) {
        self.0.push(Arc::new(error));
    }

    /// Add the errors of `other`, sharing them
    pub fn append(&mut self, other: &ErrorList) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggerError> {
        self.0.iter().map(|e| e.as_ref())
    }

    /// `Ok(())` when empty, otherwise the whole list as a single error
    pub fn as_result(&self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::Dispatch(self.clone()))
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl From<LoggerError> for std::io::Error {
    fn from(error: LoggerError) -> Self {
        match error {
            LoggerError::IoError(e) => e,
            other => std::io::Error::other(other),
        }
    }
}
