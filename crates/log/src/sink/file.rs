//! File sink

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::core::{LogError, LogIoResultExt, LogResult};
use crate::record::Record;

use super::{Sink, parse_bool};

/// Appends each line to a file
///
/// Concurrent writers are serialised by an internal mutex; every line is
/// flushed before `log` returns.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    append: bool,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::sink::FileSink";
    /// Configuration alias
    pub const ALIAS: &'static str = "FileSink";
    /// File written when no `file` property is given
    pub const DEFAULT_FILE: &'static str = "arbor.log";

    const PROPERTY_NAMES: &'static [&'static str] = &["file", "append"];

    /// File sink for `path`, truncating on open
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append: false,
            writer: Mutex::new(None),
        }
    }

    /// Keep existing content on open
    #[must_use]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether existing content is kept on open
    pub fn append(&self) -> bool {
        self.append
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

impl Sink for FileSink {
    fn name(&self) -> &'static str {
        Self::ALIAS
    }

    fn open(&self) -> io::Result<()> {
        let mut writer = self.writer.lock();
        if writer.is_some() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(self.append)
            .truncate(!self.append)
            .open(&self.path)?;
        *writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        match self.writer.lock().take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    fn is_open(&self) -> bool {
        self.writer.lock().is_some()
    }

    fn log(&self, _record: &Record<'_>, line: &str) -> io::Result<()> {
        let mut guard = self.writer.lock();
        let Some(writer) = guard.as_mut() else {
            return Ok(());
        };
        writeln!(writer, "{line}")?;
        writer.flush()
    }

    fn clear(&self) -> LogResult<()> {
        let mut guard = self.writer.lock();
        match guard.as_mut() {
            Some(writer) => {
                writer.flush().with_sink("clear", Self::ALIAS)?;
                let file = writer.get_mut();
                file.set_len(0).with_sink("clear", Self::ALIAS)?;
                file.seek(SeekFrom::Start(0))
                    .with_sink("clear", Self::ALIAS)?;
                Ok(())
            }
            None => match OpenOptions::new().write(true).truncate(true).open(&self.path) {
                Ok(_) => Ok(()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(LogError::io("clear", Self::ALIAS, error)),
            },
        }
    }

    fn log_size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|meta| meta.len())
    }

    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTY_NAMES
    }

    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        match name {
            "file" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(LogError::invalid_property(name, value, "empty path"));
                }
                self.path = PathBuf::from(value);
                Ok(())
            }
            "append" => {
                self.append = parse_bool(name, value)?;
                Ok(())
            }
            _ => Err(LogError::invalid_property(name, value, "unknown property")),
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.get_mut().as_mut() {
            let _ = writer.flush();
        }
    }
}
