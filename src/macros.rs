//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They record the
//! call site, reported when the logger has caller reporting enabled.
//!
//! # Examples
//!
//! ```
//! use rust_multi_logger::prelude::*;
//! use rust_multi_logger::{info, warn};
//!
//! let logger = Logger::new("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! warn!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_multi_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_multi_logger::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::ERROR, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_from(
            $crate::Caller::new(module_path!(), file!(), line!()),
            $level,
            format!($($arg)+),
        )
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_multi_logger::prelude::*;
/// # let logger = Logger::new("app");
/// # logger.set_hook_level("", Level::TRACE).unwrap();
/// use rust_multi_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_multi_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_multi_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_multi_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_multi_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message, the process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::FATAL, $($arg)+)
    };
}

/// Format text and send it through the print path of the logger.
///
/// # Examples
///
/// ```
/// # use rust_multi_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_multi_logger::{log_print, log_println};
/// log_print!(logger, "{} items", 3);
/// log_println!(logger, " processed");
/// ```
#[macro_export]
macro_rules! log_print {
    ($logger:expr, $($arg:tt)+) => {
        $logger.print(format!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_println {
    ($logger:expr) => {
        $logger.println("")
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.println(format!($($arg)+))
    };
}
