use thiserror::Error;

/// Errors raised while building or installing a logger, or rendering an entry.
///
/// Logging calls never return these; they are dropped inside [`crate::Logger::log`].
#[derive(Debug, Error)]
pub enum Error {
    /// Rendering the entry into text failed.
    #[error("unable to format log entry: {0}")]
    Format(#[from] std::fmt::Error),

    /// Writing to or opening the sink failed.
    #[error("unable to write log entry: {0}")]
    Io(#[from] std::io::Error),

    /// A global logger already exists for this process.
    #[error("global logger is already initialized")]
    AlreadyInitialized,
}
