use crate::{Error, LogEntry};

/// Turns a log entry into the bytes written to the sink.
pub trait Formatter: Send + Sync {
    /// Told once, when the logger is built, whether its sink is a terminal.
    fn set_terminal(&mut self, _terminal: bool) {}

    fn format(&self, entry: &mut LogEntry) -> Result<Vec<u8>, Error>;
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn set_terminal(&mut self, terminal: bool) {
        (**self).set_terminal(terminal);
    }

    fn format(&self, entry: &mut LogEntry) -> Result<Vec<u8>, Error> {
        (**self).format(entry)
    }
}

/// Last path segment of a source file, for either separator style.
fn base_name(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

/// Adds `func` and `file` fields from the entry's caller, then hands the entry to `inner`.
///
/// Entries without a caller pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct CallerFormatter<F> {
    inner: F,
}

impl<F: Formatter> CallerFormatter<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Formatter> Formatter for CallerFormatter<F> {
    fn set_terminal(&mut self, terminal: bool) {
        self.inner.set_terminal(terminal);
    }

    fn format(&self, entry: &mut LogEntry) -> Result<Vec<u8>, Error> {
        if let Some(caller) = entry.caller {
            let location = format!("{}:{}", base_name(caller.file), caller.line);
            let fields = entry.fields_mut();
            fields.insert("func".into(), caller.function.into());
            fields.insert("file".into(), location);
        }
        self.inner.format(entry)
    }
}

#[cfg(test)]
struct FieldsOnly;

#[cfg(test)]
impl Formatter for FieldsOnly {
    fn format(&self, entry: &mut LogEntry) -> Result<Vec<u8>, Error> {
        let mut out = entry.message.clone();
        for (key, value) in entry.fields.iter().flatten() {
            out.push_str(&format!(" {key}={value}"));
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
struct Failing;

#[cfg(test)]
impl Formatter for Failing {
    fn format(&self, _: &mut LogEntry) -> Result<Vec<u8>, Error> {
        Err(Error::Format(std::fmt::Error))
    }
}

#[test]
fn test_base_name() {
    assert_eq!(base_name("src/net/conn.rs"), "conn.rs");
    assert_eq!(base_name(r"C:\work\src\main.rs"), "main.rs");
    assert_eq!(base_name("lib.rs"), "lib.rs");
}

#[test]
fn test_caller_fields_injected() {
    use crate::Caller;
    use log::Level;

    let formatter = CallerFormatter::new(FieldsOnly);
    let mut entry = LogEntry::new(Level::Info, "hello").with_caller(Some(Caller {
        function: "app::server::run",
        file: "/home/dev/app/src/server/mod.rs",
        line: 42,
    }));
    let out = String::from_utf8(formatter.format(&mut entry).unwrap()).unwrap();
    assert_eq!(out, "hello file=mod.rs:42 func=app::server::run");
    let fields = entry.fields.unwrap();
    assert_eq!(fields.len(), 2);
    assert!(!fields["file"].contains('/'));
}

#[test]
fn test_caller_fields_overwrite_existing() {
    use crate::Caller;
    use log::Level;

    let formatter = CallerFormatter::new(FieldsOnly);
    let mut entry = LogEntry::new(Level::Warn, "hi").with_caller(Some(Caller {
        function: "main",
        file: "src/main.rs",
        line: 7,
    }));
    entry.fields_mut().insert("func".into(), "stale".into());
    entry.fields_mut().insert("user".into(), "alice".into());
    let out = String::from_utf8(formatter.format(&mut entry).unwrap()).unwrap();
    assert_eq!(out, "hi file=main.rs:7 func=main user=alice");
}

#[test]
fn test_no_caller_no_mutation() {
    use log::Level;

    let formatter = CallerFormatter::new(FieldsOnly);
    let mut entry = LogEntry::new(Level::Error, "plain");
    let out = String::from_utf8(formatter.format(&mut entry).unwrap()).unwrap();
    assert_eq!(out, "plain");
    assert!(entry.fields.is_none());
}

#[test]
fn test_inner_error_propagated() {
    use log::Level;

    let formatter = CallerFormatter::new(Failing);
    let mut entry = LogEntry::new(Level::Info, "boom");
    assert!(matches!(formatter.format(&mut entry), Err(Error::Format(_))));
}
