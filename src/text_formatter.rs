use std::fmt::Write;

use chrono::{DateTime, Local};
use colored::Color;
use log::Level;

use crate::{Error, LogEntry, formatter::Formatter};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human readable formatter: `[LEVEL] <time> <message> key=value ...`.
///
/// When the sink is not a terminal and `force_formatting` is off, entries are
/// rendered as plain logfmt (`time=... level=... msg=...`) instead. The logger
/// tells the formatter whether its sink is a terminal when it is built.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    force_colors: bool,
    disable_colors: bool,
    force_formatting: bool,
    full_timestamp: bool,
    timestamp_format: String,
    base_time: DateTime<Local>,
    terminal: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            force_colors: false,
            disable_colors: false,
            force_formatting: false,
            full_timestamp: false,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.into(),
            base_time: Local::now(),
            terminal: false,
        }
    }
}

impl TextFormatter {
    /// Colored, always prefixed, full `YYYY-MM-DD HH:MM:SS` timestamps.
    pub fn prefixed() -> Self {
        Self {
            force_colors: true,
            force_formatting: true,
            full_timestamp: true,
            ..Self::default()
        }
    }
    /// Color even when the sink is not a terminal.
    pub fn force_colors(self, yes: bool) -> Self {
        Self {
            force_colors: yes,
            ..self
        }
    }
    /// `false` never colors, whatever `force_colors` says.
    pub fn with_colors(self, yes: bool) -> Self {
        Self {
            disable_colors: !yes,
            ..self
        }
    }
    /// Prefixed layout even when the sink is not a terminal.
    pub fn force_formatting(self, yes: bool) -> Self {
        Self {
            force_formatting: yes,
            ..self
        }
    }
    /// Wall clock time instead of seconds since the formatter was created.
    pub fn full_timestamp(self, yes: bool) -> Self {
        Self {
            full_timestamp: yes,
            ..self
        }
    }
    /// Sets the chrono strftime pattern used for wall clock timestamps.
    pub fn with_timestamp_format(self, format: &str) -> Self {
        Self {
            timestamp_format: format.into(),
            ..self
        }
    }

    fn colored(&self) -> bool {
        if self.disable_colors {
            return false;
        }
        self.force_colors
            || (self.terminal && colored::control::SHOULD_COLORIZE.should_colorize())
    }

    fn timestamp(&self, time: &DateTime<Local>) -> String {
        if self.full_timestamp {
            time.format(&self.timestamp_format).to_string()
        } else {
            let elapsed = (*time - self.base_time).num_seconds().max(0);
            format!("{elapsed:04}")
        }
    }

    fn format_prefixed(&self, entry: &LogEntry, out: &mut String) -> std::fmt::Result {
        let colored = self.colored();
        let color = level_color(entry.level);
        let level = paint(level_label(entry.level), color, colored);
        write!(out, "[{level}] {} {}", self.timestamp(&entry.time), entry.message)?;
        for (key, value) in entry.fields.iter().flatten() {
            write!(out, " {}=", paint(key, color, colored))?;
            write_value(out, value)?;
        }
        out.push('\n');
        Ok(())
    }

    fn format_logfmt(&self, entry: &LogEntry, out: &mut String) -> std::fmt::Result {
        out.push_str("time=");
        write_value(out, &entry.time.format(&self.timestamp_format).to_string())?;
        write!(out, " level={} msg=", entry.level.as_str().to_lowercase())?;
        write_value(out, &entry.message)?;
        for (key, value) in entry.fields.iter().flatten() {
            write!(out, " {key}=")?;
            write_value(out, value)?;
        }
        out.push('\n');
        Ok(())
    }
}

impl Formatter for TextFormatter {
    fn set_terminal(&mut self, terminal: bool) {
        self.terminal = terminal;
    }

    fn format(&self, entry: &mut LogEntry) -> Result<Vec<u8>, Error> {
        let mut out = String::with_capacity(64 + entry.message.len());
        if self.force_formatting || self.terminal {
            self.format_prefixed(entry, &mut out)?;
        } else {
            self.format_logfmt(entry, &mut out)?;
        }
        Ok(out.into_bytes())
    }
}

fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Magenta,
    }
}

// Escape codes are written by hand so forcing color here never touches
// colored's process-wide override.
fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("\x1B[{}m{text}\x1B[0m", color.to_fg_str())
    } else {
        text.to_string()
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=')
}

fn write_value(out: &mut String, value: &str) -> std::fmt::Result {
    if needs_quoting(value) {
        write!(out, "{value:?}")
    } else {
        out.push_str(value);
        Ok(())
    }
}

#[cfg(test)]
fn fixed_entry(level: Level, message: &str) -> LogEntry {
    use chrono::TimeZone;
    let mut entry = LogEntry::new(level, message);
    entry.time = Local.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
    entry
}

#[cfg(test)]
fn render(formatter: &TextFormatter, entry: &mut LogEntry) -> String {
    String::from_utf8(formatter.format(entry).unwrap()).unwrap()
}

#[test]
fn test_prefixed_plain() {
    let formatter = TextFormatter::prefixed().with_colors(false);
    let mut entry = fixed_entry(Level::Info, "hello world");
    assert_eq!(
        render(&formatter, &mut entry),
        "[INFO] 2024-01-02 15:04:05 hello world\n"
    );
}

#[test]
fn test_prefixed_fields() {
    let formatter = TextFormatter::prefixed().with_colors(false);
    let mut entry = fixed_entry(Level::Warn, "count=3");
    entry.fields_mut().insert("func".into(), "app::run".into());
    entry.fields_mut().insert("file".into(), "main.rs:12".into());
    entry.fields_mut().insert("note".into(), "two words".into());
    assert_eq!(
        render(&formatter, &mut entry),
        "[WARN] 2024-01-02 15:04:05 count=3 file=main.rs:12 func=app::run note=\"two words\"\n"
    );
}

#[test]
fn test_forced_colors() {
    let formatter = TextFormatter::prefixed();
    let mut entry = fixed_entry(Level::Error, "failed");
    let line = render(&formatter, &mut entry);
    assert!(line.starts_with("[\x1B[31mERROR\x1B[0m] "));
    assert!(line.ends_with("failed\n"));
}

#[test]
fn test_elapsed_timestamp() {
    let mut formatter = TextFormatter::default()
        .with_colors(false)
        .force_formatting(true);
    let mut entry = fixed_entry(Level::Info, "tick");
    formatter.base_time = entry.time - chrono::Duration::seconds(7);
    assert_eq!(render(&formatter, &mut entry), "[INFO] 0007 tick\n");
}

#[test]
fn test_custom_timestamp_format() {
    let formatter = TextFormatter::prefixed()
        .with_colors(false)
        .with_timestamp_format("%d/%m/%Y %H:%M");
    let mut entry = fixed_entry(Level::Info, "hello");
    assert_eq!(render(&formatter, &mut entry), "[INFO] 02/01/2024 15:04 hello\n");
}

#[test]
fn test_terminal_sink_gets_prefixed_layout() {
    let mut formatter = TextFormatter::default().with_colors(false);
    formatter.set_terminal(true);
    let mut entry = fixed_entry(Level::Warn, "on a tty");
    assert!(render(&formatter, &mut entry).starts_with("[WARN] 0"));
}

#[test]
fn test_logfmt_when_not_terminal() {
    let formatter = TextFormatter::default();
    let mut entry = fixed_entry(Level::Info, "hello world");
    entry.fields_mut().insert("file".into(), "lib.rs:3".into());
    assert_eq!(
        render(&formatter, &mut entry),
        "time=\"2024-01-02 15:04:05\" level=info msg=\"hello world\" file=lib.rs:3\n"
    );
}
