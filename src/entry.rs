use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use log::Level;

/// Extra `key=value` annotations attached to an entry.
pub type Fields = BTreeMap<String, String>;

/// Where a log call originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub function: &'static str,
    pub file: &'static str,
    pub line: u32,
}

/// One log call, alive only until the formatter has produced its bytes.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub time: DateTime<Local>,
    pub caller: Option<Caller>,
    /// `None` until something writes a field.
    pub fields: Option<Fields>,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            time: Local::now(),
            caller: None,
            fields: None,
        }
    }

    pub fn with_caller(self, caller: Option<Caller>) -> Self {
        Self { caller, ..self }
    }

    /// Field mapping, created empty on first access.
    pub fn fields_mut(&mut self) -> &mut Fields {
        self.fields.get_or_insert_with(Fields::new)
    }
}

#[test]
fn test_fields_initialized_on_demand() {
    let mut entry = LogEntry::new(Level::Info, "hello");
    assert!(entry.fields.is_none());
    assert!(entry.caller.is_none());
    entry.fields_mut().insert("key".into(), "value".into());
    assert_eq!(
        entry.fields.as_ref().and_then(|f| f.get("key")).map(String::as_str),
        Some("value")
    );
}
