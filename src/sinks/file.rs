//! File sink implementation

use crate::core::{LogMessage, LoggerError, OutputFormat, Result, Sink, TimestampFormat};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per message to a file
///
/// Writes are buffered; [`Logger::flush`](crate::Logger::flush) and
/// [`Logger::dispose`](crate::Logger::dispose) flush the buffer.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        })
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_logger_tree::sinks::FileSink;
    /// use rust_logger_tree::TimestampFormat;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn emit(&self, message: &LogMessage) -> Result<()> {
        let mut line = self.output_format.format(message, &self.timestamp_format);
        line.push('\n');

        self.writer.lock().write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}
