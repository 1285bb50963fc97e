//! File appender implementation

use super::write_checked;
use crate::core::error::{LoggerError, Result};
use crate::core::settings;
use crate::core::timestamp::TimestampFormat;
use crate::core::{Appender, LogEntry};
use crate::formatter::{Formatter, TemplateFormatter};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Serializes every file write of the process, whatever the appender
static FILE_LOCK: Mutex<()> = parking_lot::const_mutex(());

struct OpenFile {
    path: PathBuf,
    file: File,
}

/// Appends entries to a log file, or to one file per module when the path
/// is a directory.
///
/// The file is opened on the first entry and a `# <timestamp>` header line
/// is written each time a file gets opened.
///
/// # Examples
///
/// ```no_run
/// use rust_multi_logger::appenders::{Appender, FileAppender};
/// use rust_multi_logger::{Level, LogEntry};
///
/// let appender = FileAppender::new("/var/log/app.log", false);
/// appender.append(&LogEntry::new(Level::INFO, "started")).unwrap();
/// ```
pub struct FileAppender {
    path: PathBuf,
    is_dir: bool,
    identity: String,
    add_header: bool,
    // File already headed by the appender this one was cloned from
    headed: Option<PathBuf>,
    formatter: RwLock<Arc<dyn Formatter>>,
    file: Mutex<Option<OpenFile>>,
}

impl FileAppender {
    /// `path` is the log file, or the base directory when `is_dir` is set
    pub fn new(path: impl Into<PathBuf>, is_dir: bool) -> Self {
        let path = path.into();
        Self {
            identity: format!("FileHook {}", path.display()),
            path,
            is_dir,
            add_header: true,
            headed: None,
            formatter: RwLock::new(Arc::new(TemplateFormatter::file())),
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_formatter(self, formatter: Arc<dyn Formatter>) -> Self {
        *self.formatter.write() = formatter;
        self
    }

    /// Enable or disable the `# <timestamp>` line written on open
    #[must_use]
    pub fn with_header(mut self, add_header: bool) -> Self {
        self.add_header = add_header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// File currently open, if any
    pub fn current_file(&self) -> Option<PathBuf> {
        self.file.lock().as_ref().map(|open| open.path.clone())
    }

    /// File receiving the entries of `module`
    pub fn target(&self, module: &str) -> Result<PathBuf> {
        if !self.is_dir {
            return Ok(self.path.clone());
        }
        let mut name = cleanup_module_name(module).replace(':', ".");
        if name.is_empty() {
            name = "default".to_string();
        }
        let target = self.path.join(format!("{}.log", name));
        std::path::absolute(&target).map_err(|e| {
            self.error(LoggerError::io_operation(
                "resolving log file",
                target.display().to_string(),
                e,
            ))
        })
    }

    fn error(&self, error: LoggerError) -> LoggerError {
        LoggerError::hook(&self.identity, error)
    }

    fn open(&self, target: &Path, time: DateTime<Utc>) -> Result<File> {
        let has_content = fs::metadata(target).map(|m| m.len() > 0).unwrap_or(false);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                self.error(LoggerError::io_operation(
                    "creating log directory",
                    parent.display().to_string(),
                    e,
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(target)
            .map_err(|e| {
                self.error(LoggerError::io_operation(
                    "opening log file",
                    target.display().to_string(),
                    e,
                ))
            })?;

        if self.add_header && self.headed.as_deref() != Some(target) {
            if has_content {
                write_checked(&self.identity, &mut file, "\n")?;
            }
            let header = match settings::display_zone() {
                Some(zone) => TimestampFormat::Classic.format(&time.with_timezone(&zone)),
                None => TimestampFormat::Classic.format(&time),
            };
            write_checked(&self.identity, &mut file, &format!("# {}\n", header))?;
        }
        Ok(file)
    }
}

/// Keep letters, digits, `/` and `:`, then trim the surrounding `/`
pub fn cleanup_module_name(module: &str) -> String {
    module
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '/' || *c == ':')
        .collect::<String>()
        .trim_matches('/')
        .to_string()
}

impl Appender for FileAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let text = if entry.level.is_print() {
            entry.message.clone()
        } else {
            let formatter = Arc::clone(&self.formatter.read());
            formatter.format(entry).map_err(|e| self.error(e))?
        };

        let _guard = FILE_LOCK.lock();
        let target = self.target(&entry.module)?;
        let mut current = self.file.lock();
        if current.as_ref().is_some_and(|open| open.path != target) {
            *current = None;
        }
        let open = match current.take() {
            Some(open) => open,
            None => OpenFile {
                file: self.open(&target, entry.timestamp)?,
                path: target,
            },
        };
        let open = current.insert(open);
        write_checked(&self.identity, &mut open.file, &text)
    }

    fn flush(&self) -> Result<()> {
        let _guard = FILE_LOCK.lock();
        if let Some(open) = self.file.lock().as_mut() {
            open.file.flush().map_err(|e| self.error(e.into()))?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.identity
    }

    fn accepts_print(&self) -> bool {
        true
    }

    fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        Some(Arc::clone(&self.formatter.read()))
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) -> Result<()> {
        *self.formatter.write() = formatter;
        Ok(())
    }

    /// Same destination and formatter, without the open handle
    fn try_clone(&self) -> Option<Box<dyn Appender>> {
        let headed = self
            .file
            .lock()
            .as_ref()
            .map(|open| open.path.clone())
            .or_else(|| self.headed.clone());
        Some(Box::new(FileAppender {
            path: self.path.clone(),
            is_dir: self.is_dir,
            identity: self.identity.clone(),
            add_header: self.add_header,
            headed,
            formatter: RwLock::new(Arc::clone(&self.formatter.read())),
            file: Mutex::new(None),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::Level;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn entry(module: &str, message: &str) -> LogEntry {
        LogEntry::new(Level::INFO, message)
            .with_module(module)
            .with_timestamp(Utc.with_ymd_and_hms(2018, 6, 24, 12, 34, 56).unwrap())
    }

    fn appender(path: &Path, is_dir: bool) -> FileAppender {
        FileAppender::new(path, is_dir)
            .with_formatter(Arc::new(TemplateFormatter::new(false, &["%module:square,ignore,space%%msg%"])))
    }

    #[test]
    fn test_cleanup_module_name() {
        assert_eq!(cleanup_module_name("/abc:def!/g$%?&*().,;`^<>/"), "abc:def/g");
        assert_eq!(cleanup_module_name("file:folder/module"), "file:folder/module");
        assert_eq!(cleanup_module_name("!!"), "");
    }

    #[test]
    fn test_header_and_lazy_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let appender = appender(&path, false);
        assert!(!path.exists());
        assert_eq!(appender.name(), format!("FileHook {}", path.display()));

        appender.append(&entry("", "first")).unwrap();
        appender.append(&entry("", "second")).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# 2018/06/24 12:34:56.000\nfirst\nsecond\n"
        );
    }

    #[test]
    fn test_blank_line_before_header_of_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        appender(&path, false).append(&entry("", "again")).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "previous run\n\n# 2018/06/24 12:34:56.000\nagain\n"
        );
    }

    #[test]
    fn test_print_entries_are_raw() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.log");
        let appender = appender(&path, false).with_header(false);
        appender.append(&LogEntry::new(Level::PRINT, "no newline")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "no newline");
    }

    #[test]
    fn test_directory_mode() {
        let dir = tempdir().unwrap();
        let appender = appender(dir.path(), true).with_header(false);

        appender.append(&entry("file", "main")).unwrap();
        appender.append(&entry("file:folder/module", "child")).unwrap();
        appender.append(&entry("", "anonymous")).unwrap();

        let read = |relative: &str| fs::read_to_string(dir.path().join(relative)).unwrap();
        assert_eq!(read("file.log"), "[file] main\n");
        assert_eq!(read("file.folder/module.log"), "[file:folder/module] child\n");
        assert_eq!(read("default.log"), "anonymous\n");
        assert_eq!(
            appender.current_file(),
            Some(std::path::absolute(dir.path().join("default.log")).unwrap())
        );
    }

    #[test]
    fn test_clone_has_its_own_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.log");
        let original = appender(&path, false);
        original.append(&entry("", "from original")).unwrap();

        let copy = original.try_clone().unwrap();
        copy.append(&entry("", "from copy")).unwrap();
        original.append(&entry("", "original again")).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# 2018/06/24 12:34:56.000\nfrom original\nfrom copy\noriginal again\n"
        );
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let appender = appender(&blocker.join("app.log"), false);
        let err = appender.append(&entry("", "lost")).unwrap_err();
        assert!(err.to_string().starts_with("FileHook "));
    }
}
