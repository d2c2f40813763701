use flogger::logger_config;

fn handle_request(id: u32) {
    flogger::info!("handling request {id}");
    if id % 2 == 0 {
        flogger::warn!("request {} took {:.1}ms", id, 12.345);
    }
}

fn main() {
    // caller fields are off unless asked for
    let _guard = logger_config()
        .report_caller(true)
        .init_global()
        .expect("logger already initialized");

    let handles: Vec<_> = (0..4)
        .map(|i| std::thread::spawn(move || handle_request(i)))
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    flogger::error!("shutting down");
    log::info!("the log crate goes through the same logger");
}
