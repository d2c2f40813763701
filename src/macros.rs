/// Path of the enclosing function, e.g. `my_app::server::run`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        match name.strip_suffix("::f") {
            Some(name) => name,
            None => name,
        }
    }};
}

/// [`Caller`](crate::Caller) for the current source location.
#[macro_export]
macro_rules! caller {
    () => {
        $crate::Caller {
            function: $crate::function_name!(),
            file: ::std::file!(),
            line: ::std::line!(),
        }
    };
}

/// Logs at Info level through the global logger, or through `logger: expr` when given.
///
/// ```rust
/// flogger::info!("listening on {}:{}", "0.0.0.0", 8080);
///
/// let logger = flogger::logger_config().build();
/// flogger::info!(logger: logger, "hello {}", "world");
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        ($logger).emit($crate::Level::Info, ::std::format_args!($($arg)+), ::std::option::Option::Some($crate::caller!()))
    };
    ($($arg:tt)+) => {
        $crate::global().emit($crate::Level::Info, ::std::format_args!($($arg)+), ::std::option::Option::Some($crate::caller!()))
    };
}

/// Logs at Warn level. Same forms as [`info!`].
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        ($logger).emit($crate::Level::Warn, ::std::format_args!($($arg)+), ::std::option::Option::Some($crate::caller!()))
    };
    ($($arg:tt)+) => {
        $crate::global().emit($crate::Level::Warn, ::std::format_args!($($arg)+), ::std::option::Option::Some($crate::caller!()))
    };
}

/// Logs at Error level. Same forms as [`info!`].
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        ($logger).emit($crate::Level::Error, ::std::format_args!($($arg)+), ::std::option::Option::Some($crate::caller!()))
    };
    ($($arg:tt)+) => {
        $crate::global().emit($crate::Level::Error, ::std::format_args!($($arg)+), ::std::option::Option::Some($crate::caller!()))
    };
}

#[test]
fn test_function_name() {
    assert_eq!(function_name!(), "flogger::macros::test_function_name");
}

#[test]
fn test_caller() {
    let caller = caller!();
    assert_eq!(caller.function, "flogger::macros::test_caller");
    assert_eq!(caller.file, file!());
    assert_eq!(caller.line, line!() - 3);
}
