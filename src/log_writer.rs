use std::{
    fs::File,
    io::{self, BufWriter, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex},
};

/// Destination of formatted entries. Each `regular` call receives one whole entry.
pub trait LogWriter: Send {
    fn regular(&mut self, line: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    /// Decides between the prefixed layout and logfmt for formatters that care.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Standard error, the default sink.
#[derive(Default, Debug)]
pub struct LogStderr;

impl LogWriter for LogStderr {
    fn regular(&mut self, line: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }

    fn is_terminal(&self) -> bool {
        io::stderr().is_terminal()
    }
}

#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn regular(&mut self, line: &[u8]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(line)?;
        stdout.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn is_terminal(&self) -> bool {
        io::stdout().is_terminal()
    }
}

/// Log file, created if missing and appended to otherwise.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl LogWriter for LogFile {
    fn regular(&mut self, line: &[u8]) -> io::Result<()> {
        self.file.write_all(line)?;
        self.file.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// In-memory sink. Clones share the same buffer, so one clone can be handed
/// to a logger and another kept to read what was written.
#[derive(Clone, Default, Debug)]
pub struct LogBuffer {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl LogWriter for LogBuffer {
    fn regular(&mut self, line: &[u8]) -> io::Result<()> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(line);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_log_file() {
    std::fs::remove_file("/tmp/test_flogger_log_file.log").ok();
    let mut log_file = LogFile::new("/tmp/test_flogger_log_file.log").unwrap();
    log_file.regular(b"Hello, world!\n").unwrap();
    log_file.regular(b"rust is awesome !\n").unwrap();
    drop(log_file);
    let mut log_file = LogFile::new("/tmp/test_flogger_log_file.log").unwrap();
    log_file.regular(b"appended\n").unwrap();
    assert_eq!(
        std::fs::read_to_string("/tmp/test_flogger_log_file.log").unwrap(),
        "Hello, world!\nrust is awesome !\nappended\n"
    );
}

#[test]
fn test_log_buffer_shared() {
    let buffer = LogBuffer::new();
    let mut writer = buffer.clone();
    writer.regular(b"first\n").unwrap();
    writer.regular(b"second\n").unwrap();
    writer.flush().unwrap();
    assert_eq!(buffer.contents(), "first\nsecond\n");
}

#[test]
fn test_file_and_buffer_are_not_terminals() {
    std::fs::remove_file("/tmp/test_flogger_not_terminal.log").ok();
    let log_file = LogFile::new("/tmp/test_flogger_not_terminal.log").unwrap();
    assert!(!log_file.is_terminal());
    assert!(!LogBuffer::new().is_terminal());
    assert_eq!(LogStderr.is_terminal(), io::stderr().is_terminal());
    assert_eq!(LogStdout.is_terminal(), io::stdout().is_terminal());
}
