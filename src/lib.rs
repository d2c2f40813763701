//! # flogger
//! Formatted logging facade: colored prefixed lines on standard error, with
//! optional `func` and `file` fields naming where each call came from.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! flogger = "0.1.0"
//! ```
//!
//! ```rust
//! flogger::info!("hello {}", "world");
//! flogger::warn!("count={}", 3);
//! flogger::error!("failed after {:.1}s", 2.5);
//! ```
//! The first call creates the process logger with its fixed configuration:
//! level Info, colored `[LEVEL] YYYY-MM-DD HH:MM:SS message` lines, standard error.
//! Logging never returns an error; a failed write is simply lost.
//!
//! ## Caller fields
//! Caller capture is off by default. Turn it on to get
//! `func=<function> file=<basename>:<line>` appended to each line.
//! ```rust
//! use flogger::logger_config;
//!
//! let _guard = logger_config()
//!     .report_caller(true)
//!     .init_global()
//!     .expect("logger already initialized");
//! flogger::info!("with caller");
//! // guard flushes the logger when dropped
//! ```
//!
//! ## Explicit loggers
//! A logger can also be built and passed around instead of using the global one.
//! ```rust
//! use flogger::{LogBuffer, logger_config};
//!
//! let buffer = LogBuffer::new();
//! let logger = logger_config()
//!     .with_writer(buffer.clone())
//!     .build();
//! flogger::warn!(logger: logger, "count={}", 3);
//! assert!(buffer.contents().contains("count=3"));
//! ```
//!
//! The global logger is also registered with the `log` crate, so `log::info!`
//! from dependencies ends up in the same stream.

mod macros;

mod entry;
mod error;
mod formatter;
mod log_writer;
mod logger;
mod text_formatter;

use std::sync::OnceLock;

pub use entry::{Caller, Fields, LogEntry};
pub use error::Error;
pub use formatter::{CallerFormatter, Formatter};
pub use log::{Level, LevelFilter};
pub use log_writer::{LogBuffer, LogFile, LogStderr, LogStdout, LogWriter};
pub use logger::{ConfigBuilder, Logger, LoggerGuard, logger_config};
pub use text_formatter::{DEFAULT_TIMESTAMP_FORMAT, TextFormatter};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process logger, created with the default configuration on first use.
pub fn global() -> &'static Logger {
    if let Some(logger) = GLOBAL.get() {
        return logger;
    }
    let mut created = false;
    let logger = GLOBAL.get_or_init(|| {
        created = true;
        logger_config().build()
    });
    if created {
        bridge_log_crate(logger);
    }
    logger
}

fn install(builder: ConfigBuilder) -> Result<&'static Logger, Error> {
    let mut created = false;
    let logger = GLOBAL.get_or_init(|| {
        created = true;
        builder.build()
    });
    if !created {
        return Err(Error::AlreadyInitialized);
    }
    bridge_log_crate(logger);
    Ok(logger)
}

// Skipped when another `log` implementation got there first.
fn bridge_log_crate(logger: &'static Logger) {
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level());
    }
}
