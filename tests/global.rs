use flogger::{Error, LogBuffer, TextFormatter, logger_config};

// One test per binary: the global logger can only be installed once per process.
#[test]
fn test_global_logger() {
    let buffer = LogBuffer::new();
    let guard = logger_config()
        .report_caller(true)
        .with_formatter(TextFormatter::prefixed().with_colors(false))
        .with_writer(buffer.clone())
        .init_global()
        .unwrap();
    assert!(std::ptr::eq(guard.logger(), flogger::global()));

    flogger::info!("hello {}", "world");
    flogger::warn!("count={}", 3);
    log::error!("from the log crate");
    log::debug!("hidden");

    let second = logger_config().init_global();
    assert!(matches!(second, Err(Error::AlreadyInitialized)));
    flogger::info!("still the first logger");
    drop(guard);

    let output = buffer.contents();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("[INFO] "));
    assert!(lines[0].contains(" hello world "));
    assert!(lines[0].contains(" file=global.rs:"));
    assert!(lines[0].contains(" func=global::test_global_logger"));
    assert!(lines[1].starts_with("[WARN] "));
    assert!(lines[1].contains(" count=3 "));
    assert!(lines[2].starts_with("[ERROR] "));
    assert!(lines[2].contains(" from the log crate "));
    assert!(lines[2].ends_with(" func=global"));
    assert!(lines[3].contains(" still the first logger "));
}
