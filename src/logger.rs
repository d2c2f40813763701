use std::{fmt, path::Path, sync::Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{
    Caller, Error, LogEntry,
    formatter::{CallerFormatter, Formatter},
    log_writer::{LogFile, LogStderr, LogWriter},
    text_formatter::TextFormatter,
};

/// A configured logger: minimum level, formatter and sink.
///
/// Build one with [`logger_config`] and pass it around, or install it as the
/// process logger with [`ConfigBuilder::init_global`].
pub struct Logger {
    level: LevelFilter,
    report_caller: bool,
    formatter: Box<dyn Formatter>,
    writer: Mutex<Box<dyn LogWriter>>,
}

impl Logger {
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn reports_caller(&self) -> bool {
        self.report_caller
    }

    pub fn enabled_for(&self, level: Level) -> bool {
        level <= self.level
    }

    /// Formats and writes one entry. Failures are dropped: nothing is
    /// returned and nothing is retried.
    pub fn emit(&self, level: Level, args: fmt::Arguments<'_>, caller: Option<Caller>) {
        if !self.enabled_for(level) {
            return;
        }
        let caller = if self.report_caller { caller } else { None };
        let mut entry = LogEntry::new(level, args.to_string()).with_caller(caller);
        self.write_entry(&mut entry).ok();
    }

    pub fn info(&self, args: fmt::Arguments<'_>, caller: Option<Caller>) {
        self.emit(Level::Info, args, caller);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>, caller: Option<Caller>) {
        self.emit(Level::Warn, args, caller);
    }

    pub fn error(&self, args: fmt::Arguments<'_>, caller: Option<Caller>) {
        self.emit(Level::Error, args, caller);
    }

    pub fn flush(&self) {
        self.writer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .flush()
            .ok();
    }

    fn write_entry(&self, entry: &mut LogEntry) -> Result<(), Error> {
        let bytes = self.formatter.format(entry)?;
        // One write per entry under the lock keeps concurrent lines whole.
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writer.regular(&bytes)?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.enabled_for(metadata.level())
    }

    fn log(&self, record: &Record) {
        // The log crate knows the module, not the function.
        let caller = match (record.module_path_static(), record.file_static(), record.line()) {
            (Some(function), Some(file), Some(line)) => Some(Caller {
                function,
                file,
                line,
            }),
            _ => None,
        };
        self.emit(record.level(), *record.args(), caller);
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

/// Flushes the global logger when dropped.
pub struct LoggerGuard {
    logger: &'static Logger,
}

impl LoggerGuard {
    pub fn logger(&self) -> &'static Logger {
        self.logger
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        self.logger.flush();
    }
}

/// Builder for configuring and initializing the logger.
pub struct ConfigBuilder {
    level: LevelFilter,
    report_caller: bool,
    formatter: Option<Box<dyn Formatter>>,
    writer: Option<Box<dyn LogWriter>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            report_caller: false,
            formatter: None,
            writer: None,
        }
    }
}

impl ConfigBuilder {
    /// Sets the minimum level that gets written.
    pub fn with_level(self, level: LevelFilter) -> Self {
        Self { level, ..self }
    }
    /// Attach `func` and `file` fields to every entry.
    pub fn report_caller(self, yes: bool) -> Self {
        Self {
            report_caller: yes,
            ..self
        }
    }
    /// Replaces the base formatter. Caller fields are still injected in front of it.
    pub fn with_formatter<F: Formatter + 'static>(self, formatter: F) -> Self {
        Self {
            formatter: Some(Box::new(formatter)),
            ..self
        }
    }
    /// Replaces the sink (standard error by default).
    pub fn with_writer<W: LogWriter + 'static>(self, writer: W) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            ..self
        }
    }
    /// Sets a log file as the sink.
    pub fn with_log_file<P: AsRef<Path>>(self, path: P) -> Result<Self, std::io::Error> {
        Ok(self.with_writer(LogFile::new(path)?))
    }
    /// Maybe sets a log file as the sink.
    pub fn maybe_with_log_file<P: AsRef<Path>>(
        self,
        path: Option<P>,
    ) -> Result<Self, std::io::Error> {
        match path {
            Some(path) => self.with_log_file(path),
            None => Ok(self),
        }
    }

    /// Builds a standalone logger.
    pub fn build(self) -> Logger {
        let Self {
            level,
            report_caller,
            formatter,
            writer,
        } = self;
        let writer: Box<dyn LogWriter> = writer.unwrap_or_else(|| Box::new(LogStderr));
        let formatter: Box<dyn Formatter> =
            formatter.unwrap_or_else(|| Box::new(TextFormatter::prefixed()));
        let mut formatter = CallerFormatter::new(formatter);
        formatter.set_terminal(writer.is_terminal());
        Logger {
            level,
            report_caller,
            formatter: Box::new(formatter),
            writer: Mutex::new(writer),
        }
    }

    /// Installs the logger for the whole process.
    /// Fails if a global logger already exists, including the lazily created default one.
    #[must_use = "LoggerGuard flushes the logger when dropped. Do \"let _guard = logger_config().init_global()?;\""]
    pub fn init_global(self) -> Result<LoggerGuard, Error> {
        let logger = crate::install(self)?;
        Ok(LoggerGuard { logger })
    }
}

/// Returns a default ConfigBuilder: level Info, caller fields off, prefixed
/// colored text on standard error.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

#[cfg(test)]
fn buffered(builder: ConfigBuilder) -> (Logger, crate::LogBuffer) {
    let buffer = crate::LogBuffer::new();
    let logger = builder
        .with_formatter(TextFormatter::prefixed().with_colors(false))
        .with_writer(buffer.clone())
        .build();
    (logger, buffer)
}

#[test]
fn test_formatted_messages() {
    let (logger, buffer) = buffered(logger_config());
    crate::info!(logger: logger, "hello {}", "world");
    crate::warn!(logger: logger, "count={}", 3);
    crate::error!(logger: &logger, "{:>5}|{:.2}", "x", 1.23456);
    let output = buffer.contents();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[INFO] "));
    assert!(lines[0].ends_with(" hello world"));
    assert!(lines[1].starts_with("[WARN] "));
    assert!(lines[1].ends_with(" count=3"));
    assert!(lines[2].starts_with("[ERROR] "));
    assert!(lines[2].ends_with("    x|1.23"));
}

#[test]
fn test_below_level_suppressed() {
    let (logger, buffer) = buffered(logger_config());
    logger.emit(Level::Debug, format_args!("hidden"), None);
    logger.emit(Level::Trace, format_args!("hidden"), None);
    assert_eq!(buffer.contents(), "");

    let (logger, buffer) = buffered(logger_config().with_level(LevelFilter::Error));
    logger.warn(format_args!("hidden"), None);
    logger.error(format_args!("shown"), None);
    assert_eq!(buffer.contents().lines().count(), 1);
}

#[test]
fn test_caller_disabled_by_default() {
    let (logger, buffer) = buffered(logger_config());
    assert!(!logger.reports_caller());
    crate::info!(logger: logger, "no caller");
    let output = buffer.contents();
    assert!(!output.contains("func="));
    assert!(!output.contains("file="));
}

#[test]
fn test_caller_fields_when_enabled() {
    let (logger, buffer) = buffered(logger_config().report_caller(true));
    crate::info!(logger: logger, "with caller");
    let output = buffer.contents();
    assert!(output.contains(" file=logger.rs:"));
    assert!(output.contains(" func=flogger::logger::test_caller_fields_when_enabled"));
}

#[test]
fn test_log_crate_record() {
    let (logger, buffer) = buffered(logger_config().report_caller(true));
    assert!(Log::enabled(&logger, &Metadata::builder().level(Level::Warn).build()));
    assert!(!Log::enabled(&logger, &Metadata::builder().level(Level::Debug).build()));
    logger.log(
        &Record::builder()
            .args(format_args!("bridged {}", 1))
            .level(Level::Warn)
            .module_path_static(Some("app::net"))
            .file_static(Some("src/net/conn.rs"))
            .line(Some(9))
            .build(),
    );
    let output = buffer.contents();
    assert!(output.starts_with("[WARN] "));
    assert!(output.contains("bridged 1 file=conn.rs:9 func=app::net"));
}

#[test]
fn test_write_failure_swallowed() {
    struct Broken;
    impl LogWriter for Broken {
        fn regular(&mut self, _: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }
    let logger = logger_config().with_writer(Broken).build();
    crate::error!(logger: logger, "lost");
    logger.flush();
}

#[test]
fn test_concurrent_lines_whole() {
    let (logger, buffer) = buffered(logger_config());
    std::thread::scope(|scope| {
        for t in 0..8 {
            let logger = &logger;
            scope.spawn(move || {
                for i in 0..100 {
                    match i % 3 {
                        0 => crate::info!(logger: logger, "thread {t} message {i} end"),
                        1 => crate::warn!(logger: logger, "thread {t} message {i} end"),
                        _ => crate::error!(logger: logger, "thread {t} message {i} end"),
                    }
                }
            });
        }
    });
    let output = buffer.contents();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 800);
    for line in lines {
        assert!(line.starts_with('['));
        assert!(line.ends_with(" end"));
        assert_eq!(line.matches("thread").count(), 1);
    }
}

#[test]
fn test_log_file_sink() {
    let path = "/tmp/test_flogger_logger_sink.log";
    std::fs::remove_file(path).ok();
    let logger = logger_config()
        .maybe_with_log_file(Some(path))
        .unwrap()
        .build();
    crate::warn!(logger: logger, "to file");
    logger.flush();
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("WARN"));
    assert!(contents.ends_with("to file\n"));
}

#[test]
fn test_layout_follows_sink() {
    struct Tty(crate::LogBuffer);
    impl LogWriter for Tty {
        fn regular(&mut self, line: &[u8]) -> std::io::Result<()> {
            self.0.regular(line)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
        fn is_terminal(&self) -> bool {
            true
        }
    }

    let file_like = crate::LogBuffer::new();
    let logger = logger_config()
        .with_formatter(TextFormatter::default().full_timestamp(true))
        .with_writer(file_like.clone())
        .build();
    crate::info!(logger: logger, "hello world");
    let output = file_like.contents();
    assert!(output.starts_with("time=\""));
    assert!(output.ends_with(" level=info msg=\"hello world\"\n"));
    assert!(!output.contains('\x1B'));

    let tty = crate::LogBuffer::new();
    let logger = logger_config()
        .with_formatter(TextFormatter::default().with_colors(false))
        .with_writer(Tty(tty.clone()))
        .build();
    crate::info!(logger: logger, "hello world");
    assert!(tty.contents().starts_with("[INFO] "));
}
