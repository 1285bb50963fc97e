//! Basic logger usage example
//!
//! Demonstrates the default console hook, hook levels, derived loggers,
//! the logging macros and the stream catcher.
//!
//! Run with: cargo run --example basic_usage

use rust_multi_logger::prelude::*;
use rust_multi_logger::{info, warn};
use std::io::Write;

fn main() -> Result<()> {
    println!("=== Rust Multi Logger - Basic Usage Example ===\n");

    // The default console hook starts at warning level
    let logger = Logger::new("basic");

    println!("1. Logging at different levels:");
    logger.set_default_console_hook_level("trace")?;
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message, the process keeps running");

    println!("\n2. Changing the hook level:");
    logger.set_default_console_hook_level(Level::INFO)?;
    println!("   Level set to {} - trace and debug won't show:", logger.level());
    logger.trace("Trace message (hidden)");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");

    println!("\n3. Derived loggers:");
    let child = logger.child("worker");
    child.info("Message from a child logger");
    let request = logger.with_field("request", 42).with_field("user", "alice");
    request.set_format(&["%module:square,space%%level:upper,color% %message% %fields:key%"]);
    request.warn("Message with fields");

    println!("\n4. Macros:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "{} connections left", 3);

    println!("\n5. Stream catcher:");
    let mut sink = &logger;
    writeln!(sink, "Plain text goes to the standard output")?;
    writeln!(sink, "This line contains an [error] tag")?;
    sink.write_all(b"[warning] { Braced messages\ncan span lines }\n")?;

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
