//! File logging example
//!
//! Demonstrates a file hook next to the console, one log file per module,
//! and the JSON formatter.
//!
//! Run with: cargo run --example file_logging

use rust_multi_logger::prelude::*;
use std::fs;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Multi Logger - File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("rust_multi_logger_demo");
    let single = log_dir.join("app.log");

    // Console keeps warnings, the file gets everything
    let logger = Logger::new("app");
    logger.add_file(&single, false, Level::TRACE, None);

    println!("1. Writing to {}", single.display());
    for i in 1..=5 {
        logger.info(format!("Log entry number {}", i));
    }
    logger.warn("This warning also reaches the console");
    logger.flush()?;
    println!("{}", fs::read_to_string(&single)?);

    println!("2. One file per module in {}", log_dir.display());
    let modules = Logger::with_hooks("service", [Hook::file(&log_dir, true, Level::INFO)]);
    let database = modules.child("database");
    modules.info("Service started");
    database.info("Connection pool ready");
    modules.flush()?;
    database.flush()?;
    for name in ["service.log", "service.database.log"] {
        let path = log_dir.join(name);
        println!("--- {} ---\n{}", path.display(), fs::read_to_string(&path)?);
    }

    println!("3. JSON lines");
    let json_file = log_dir.join("app.jsonl");
    let json = Logger::with_hooks("json", Vec::<Hook>::new());
    json.add_file(&json_file, false, Level::INFO, Some(Arc::new(JsonFormatter::new())));
    json.with_field("user", "alice").info("Structured entry");
    json.flush()?;
    println!("{}", fs::read_to_string(&json_file)?);

    if let Err(e) = logger.get_error() {
        eprintln!("Logging failures: {}", e);
    }

    println!("=== Example completed successfully! ===");
    Ok(())
}
