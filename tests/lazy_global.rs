use flogger::{Error, LevelFilter, logger_config};

// Runs in its own binary so nothing installs a logger before the first call.
#[test]
fn test_first_call_creates_default_logger() {
    flogger::info!("lazy {}", 1);

    let logger = flogger::global();
    assert_eq!(logger.level(), LevelFilter::Info);
    assert!(!logger.reports_caller());
    assert!(std::ptr::eq(logger, flogger::global()));

    let late = logger_config().report_caller(true).init_global();
    assert!(matches!(late, Err(Error::AlreadyInitialized)));
    assert!(!flogger::global().reports_caller());
    assert_eq!(log::max_level(), LevelFilter::Info);
}
