//! Integration tests for the multi logger
//!
//! These tests verify:
//! - Default console hook and level management
//! - Derived loggers (copy, child, fields, frozen time)
//! - Additional console hooks with JSON formatting
//! - File hooks, including one file per module
//! - Duration rounding in templates
//! - Error accumulation across hooks

use chrono::{DateTime, TimeZone, Utc};
use rust_multi_logger::formatter::DEFAULT_FILE_FORMAT;
use rust_multi_logger::prelude::*;
use rust_multi_logger::DEFAULT_CONSOLE_HOOK;
use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 6, 24, 12, 34, 56).unwrap() + chrono::Duration::milliseconds(789)
}

fn test_formatter(format: &str) -> Arc<dyn Formatter> {
    Arc::new(TemplateFormatter::new(false, &[format]))
}

/// Logger with a fixed time and a console hook writing to `output`
fn test_logger(module: &str, level: Level, output: &BufferWriter) -> Logger {
    let logger = Logger::with_hooks(
        module,
        [Hook::console_with("", level, Some(test_formatter(DEFAULT_FILE_FORMAT)))],
    )
    .with_time(base_time());
    logger.set_all_outputs(output.clone());
    logger
}

#[test]
fn test_default_logger() {
    let output = BufferWriter::new();
    let log = test_logger("default", Level::WARN, &output);
    log.warn("This is a warning");
    log.info("Not visible");
    log.println(format!("The logging level is set to {}", log.level()));
    log.print(format!("Module = {}\n", log.module()));

    assert_eq!(
        output.contents(),
        "[default] 2018/06/24 12:34:56.789 WARNING  This is a warning\n\
         The logging level is set to warning\n\
         Module = default\n"
    );
}

#[test]
fn test_setting_logging_level() {
    let log = Logger::with_hooks("console", [Hook::console("", Level::INFO)]);
    assert_eq!(log.level().to_string(), "info");

    let log = Logger::new("console");
    assert_eq!(log.level(), Level::WARN);
    log.set_hook_level("", "trace").unwrap();
    assert_eq!(log.level().to_string(), "trace");
    assert_eq!(log.default_console_hook_level(), Level::TRACE);

    let err = log.set_hook_level("missing", Level::INFO).unwrap_err();
    assert_eq!(err.to_string(), "Hook not found missing");
    assert!(log.set_hook_level("", "verbose").is_err());
}

#[test]
fn test_hook_registry() {
    let log = Logger::new("registry");
    assert_eq!(log.list_hooks(), vec![DEFAULT_CONSOLE_HOOK.to_string()]);

    log.add_console("second", Level::ERROR, None);
    assert_eq!(log.list_hooks(), vec!["console-hook".to_string(), "second".to_string()]);
    assert_eq!(log.hook_level("second"), Level::ERROR);
    assert_eq!(log.level(), Level::WARN);

    log.set_hook_level("second", Level::DISABLED).unwrap();
    assert_eq!(log.level(), Level::WARN);

    log.remove_hook("");
    assert_eq!(log.list_hooks(), vec!["second".to_string()]);
    assert_eq!(log.level(), Level::DISABLED);
    assert!(!log.is_level_enabled(Level::PANIC));
    assert_eq!(log.hook_level("missing"), Level::DISABLED);
}

#[test]
fn test_copy() {
    let output = BufferWriter::new();
    let log = test_logger("original", Level::TRACE, &output);
    log.info("Log from original");
    log.copy(Some("copy")).trace("Log from copy");
    log.copy(Some("")).debug("I have no module");
    log.copy(None).debug("I have the same module as the original");

    assert_eq!(
        output.contents(),
        "[original] 2018/06/24 12:34:56.789 INFO     Log from original\n\
         [copy] 2018/06/24 12:34:56.789 TRACE    Log from copy\n\
         2018/06/24 12:34:56.789 DEBUG    I have no module\n\
         [original] 2018/06/24 12:34:56.789 DEBUG    I have the same module as the original\n"
    );
}

#[test]
fn test_child() {
    let output = BufferWriter::new();
    let log = test_logger("original", Level::TRACE, &output);
    log.info("Log from original");
    log.child("1").trace("Log from first child");
    log.child("2").trace("Log from second child");
    log.copy(Some("")).child("orphan").trace("Log from orphan");

    assert_eq!(
        output.contents(),
        "[original] 2018/06/24 12:34:56.789 INFO     Log from original\n\
         [original:1] 2018/06/24 12:34:56.789 TRACE    Log from first child\n\
         [original:2] 2018/06/24 12:34:56.789 TRACE    Log from second child\n\
         [orphan] 2018/06/24 12:34:56.789 TRACE    Log from orphan\n"
    );
}

#[test]
fn test_with_time_and_add_time() {
    let output = BufferWriter::new();
    let log = test_logger("time", Level::TRACE, &output);

    let christmas = DateTime::parse_from_rfc3339("2020-12-25T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let log = log.with_time(christmas);
    log.info("Log from fixed time");
    log.add_time(chrono::Duration::seconds(5)).trace("Log 5 seconds later");
    log.add_time(chrono::Duration::milliseconds(8))
        .warn("Log 8 more milliseconds later");

    assert_eq!(
        output.contents(),
        "[time] 2020/12/25 00:00:00.000 INFO     Log from fixed time\n\
         [time] 2020/12/25 00:00:05.000 TRACE    Log 5 seconds later\n\
         [time] 2020/12/25 00:00:05.008 WARNING  Log 8 more milliseconds later\n"
    );
}

#[test]
fn test_with_fields() {
    let output = BufferWriter::new();
    let log = test_logger("field", Level::TRACE, &output);
    log.set_format(&["%module:square% %time% %level:upper% %message% %fields%."]);

    let single = log.with_field("hello", "world!").with_field("pi", std::f64::consts::PI);
    let many = log.with_fields(
        &LogContext::new()
            .with_field("hello", "world!")
            .with_field("pi", std::f64::consts::PI),
    );
    log.info("No additional field");
    single.info("With additional fields");
    many.info("With additional fields");

    assert_eq!(
        output.contents(),
        "[field] 2018/06/24 12:34:56.789 INFO No additional field .\n\
         [field] 2018/06/24 12:34:56.789 INFO With additional fields hello=world! pi=3.141592653589793.\n\
         [field] 2018/06/24 12:34:56.789 INFO With additional fields hello=world! pi=3.141592653589793.\n"
    );
    assert!(log.fields().is_empty());
    assert_eq!(single.fields().len(), 2);
}

#[test]
fn test_add_json_console() {
    let output = BufferWriter::new();
    let log = test_logger("json", Level::WARN, &output);
    log.add_console("json", Level::WARN, Some(Arc::new(JsonFormatter::new())));
    log.hook("json").unwrap().set_out(output.clone()).unwrap();

    log.warn("New JSON log");
    assert_eq!(
        output.contents(),
        "[json] 2018/06/24 12:34:56.789 WARNING  New JSON log\n\
         {\"level\":\"warning\",\"module\":\"json\",\"msg\":\"New JSON log\",\"time\":\"2018-06-24T12:34:56Z\"}\n"
    );
}

#[test]
fn test_replace_default_console() {
    let output = BufferWriter::new();
    let log = test_logger("json", Level::WARN, &output);
    log.add_console("", Level::WARN, Some(Arc::new(JsonFormatter::new_pretty())));
    log.set_out(output.clone());

    log.warn("New JSON log");
    assert_eq!(
        output.contents(),
        "{\n  \"level\": \"warning\",\n  \"module\": \"json\",\n  \"msg\": \"New JSON log\",\n  \"time\": \"2018-06-24T12:34:56Z\"\n}\n"
    );
}

#[test]
fn test_add_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("example.log");
    let output = BufferWriter::new();
    let log = test_logger("file", Level::WARN, &output);

    log.add_file(&log_file, false, Level::TRACE, Some(test_formatter(DEFAULT_FILE_FORMAT)));
    log.info("This is information");
    log.warn("This is a warning");
    log.flush().expect("Failed to flush");

    assert_eq!(
        output.contents(),
        "[file] 2018/06/24 12:34:56.789 WARNING  This is a warning\n"
    );
    assert_eq!(
        fs::read_to_string(&log_file).expect("Failed to read log file"),
        "# 2018/06/24 12:34:56.789\n\
         [file] 2018/06/24 12:34:56.789 INFO     This is information\n\
         [file] 2018/06/24 12:34:56.789 WARNING  This is a warning\n"
    );
}

#[test]
fn test_add_file_folder() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = BufferWriter::new();
    let log = test_logger("file", Level::WARN, &output);

    log.add_file(temp_dir.path(), true, Level::TRACE, Some(test_formatter(DEFAULT_FILE_FORMAT)));
    let child = log.child("folder/module");

    log.info("This is information");
    child.warn("This is a warning");
    child.info("This is information");

    assert_eq!(
        output.contents(),
        "[file:folder/module] 2018/06/24 12:34:56.789 WARNING  This is a warning\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("file.log")).unwrap(),
        "# 2018/06/24 12:34:56.789\n\
         [file] 2018/06/24 12:34:56.789 INFO     This is information\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("file.folder").join("module.log")).unwrap(),
        "# 2018/06/24 12:34:56.789\n\
         [file:folder/module] 2018/06/24 12:34:56.789 WARNING  This is a warning\n\
         [file:folder/module] 2018/06/24 12:34:56.789 INFO     This is information\n"
    );
}

#[test]
fn test_add_file_folder_with_invalid_module_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = BufferWriter::new();
    let name = "/abc:def!/g$%?&*().,;`^<>/";
    let log = test_logger(name, Level::WARN, &output);

    log.add_file(temp_dir.path(), true, Level::TRACE, Some(test_formatter(DEFAULT_FILE_FORMAT)));
    log.info("This is information");

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("abc.def").join("g.log")).unwrap(),
        format!(
            "# 2018/06/24 12:34:56.789\n[{}] 2018/06/24 12:34:56.789 INFO     This is information\n",
            name
        )
    );
}

#[test]
fn test_round_duration() {
    let output = BufferWriter::new();
    let formatter = TemplateFormatter::new(false, &["%time% %delay:round% %level:upper% %message%"])
        .with_base_time(base_time())
        .with_round_duration(Duration::from_millis(5))
        .with_duration_fn(DurationFormat::default().function());
    let log = Logger::with_hooks("RoundDuration", [Hook::console_with("", Level::INFO, Some(Arc::new(formatter)))])
        .with_time(base_time());
    log.set_all_outputs(output.clone());

    log.info("Starting");
    let mut step = chrono::Duration::nanoseconds(1);
    while step < chrono::Duration::hours(24) {
        step = step * 10;
        log.with_time(base_time() + step).info(format!("{} later", step.num_nanoseconds().unwrap()));
    }

    assert_eq!(
        output.contents(),
        "2018/06/24 12:34:56.789 (<5ms) INFO Starting\n\
         2018/06/24 12:34:56.789 (<5ms) INFO 10 later\n\
         2018/06/24 12:34:56.789 (<5ms) INFO 100 later\n\
         2018/06/24 12:34:56.789 (<5ms) INFO 1000 later\n\
         2018/06/24 12:34:56.789 (<5ms) INFO 10000 later\n\
         2018/06/24 12:34:56.789 (<5ms) INFO 100000 later\n\
         2018/06/24 12:34:56.790 (<5ms) INFO 1000000 later\n\
         2018/06/24 12:34:56.799 (10ms) INFO 10000000 later\n\
         2018/06/24 12:34:56.889 (100ms) INFO 100000000 later\n\
         2018/06/24 12:34:57.789 (1s) INFO 1000000000 later\n\
         2018/06/24 12:35:06.789 (10s) INFO 10000000000 later\n\
         2018/06/24 12:36:36.789 (1m40s) INFO 100000000000 later\n\
         2018/06/24 12:51:36.789 (16m40s) INFO 1000000000000 later\n\
         2018/06/24 15:21:36.789 (2h47m) INFO 10000000000000 later\n\
         2018/06/25 16:21:36.789 (1d3h47m) INFO 100000000000000 later\n"
    );
}

#[test]
fn test_caller_reporting() {
    let output = BufferWriter::new();
    let log = Logger::with_hooks("caller", [Hook::console_with("", Level::INFO, Some(test_formatter("%file%:%line% %msg%")))]);
    log.set_all_outputs(output.clone());

    log.info("not located");
    log.set_report_caller(true);
    log.info("located");
    let line = line!() - 1;

    assert_eq!(
        output.contents(),
        format!(": not located\n{}:{} located\n", file!(), line)
    );
}

/// Writer failing every write
struct FullDisk;

impl io::Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("Disk is full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_errors_are_accumulated() {
    let output = BufferWriter::new();
    let log = test_logger("errors", Level::INFO, &output);
    log.add_console("broken", Level::INFO, Some(test_formatter("%msg%")));
    log.hook("broken").unwrap().set_all_outputs(FullDisk).unwrap();

    log.info("first");
    log.info("second");

    assert_eq!(
        output.contents(),
        "[errors] 2018/06/24 12:34:56.789 INFO     first\n\
         [errors] 2018/06/24 12:34:56.789 INFO     second\n"
    );
    let err = log.get_error().unwrap_err();
    assert_eq!(err.to_string(), "ConsoleHook: Disk is full\nConsoleHook: Disk is full");

    assert!(log.clear_error().is_err());
    assert!(log.get_error().is_ok());
}

#[test]
fn test_unsupported_operation_is_recorded() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("x.log");
    let log = Logger::with_hooks("files", [Hook::file(&path, false, Level::INFO)]);
    assert_eq!(log.list_hooks().len(), 1);

    // Without a default console hook the console helpers do nothing
    log.set_out(BufferWriter::new()).set_color(true);
    assert!(log.get_error().is_ok());

    let hook = log.hook(&path.display().to_string()).unwrap();
    assert!(hook.set_out(BufferWriter::new()).is_err());
}

#[test]
fn test_builder() {
    let output = BufferWriter::new();
    let log = Logger::builder()
        .module("built")
        .hook(Hook::console_with("", Level::DEBUG, Some(test_formatter("%module% %lvl% %msg%"))))
        .print_level(Level::INFO)
        .time(base_time())
        .build();
    log.set_all_outputs(output.clone());

    log.debug("ready");
    log.print("printed as info");
    assert_eq!(output.contents(), "built debug ready\nbuilt info printed as info\n");
    assert_eq!(log.time(), Some(base_time()));
}
