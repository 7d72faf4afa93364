//! Console sink implementation

use crate::core::{LogLevel, LogMessage, OutputFormat, Result, Sink, TimestampFormat};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_tree::sinks::ConsoleSink;
    /// use rust_logger_tree::OutputFormat;
    ///
    /// let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, message: &LogMessage) -> String {
        let plain = self.output_format.format(message, &self.timestamp_format);
        if !self.use_colors || self.output_format != OutputFormat::Text {
            return plain;
        }

        // Color only the level column of the text layout
        let level = format!("{:7}", message.level());
        let colored_level = level.color(message.level().color_code()).to_string();
        plain.replacen(&format!("[{}]", level), &format!("[{}]", colored_level), 1)
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, message: &LogMessage) -> Result<()> {
        let output = self.render(message);

        // Error and above go to stderr, the rest to stdout
        if message.level() >= LogLevel::ERROR {
            writeln!(std::io::stderr().lock(), "{}", output)?;
        } else {
            writeln!(std::io::stdout().lock(), "{}", output)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(level: LogLevel) -> LogMessage {
        let mut message = LogMessage::new(level, "hello");
        message.push_sender("app");
        message
    }

    #[test]
    fn test_plain_render_matches_format() {
        let sink = ConsoleSink::with_colors(false);
        let msg = message(LogLevel::WARNING);
        assert_eq!(
            sink.render(&msg),
            OutputFormat::Text.format(&msg, &TimestampFormat::default())
        );
    }

    #[test]
    fn test_json_output_is_never_colored() {
        let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
        let rendered = sink.render(&message(LogLevel::ERROR));
        assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
    }

    #[test]
    fn test_emit_succeeds() {
        let sink = ConsoleSink::with_colors(false);
        sink.emit(&message(LogLevel::INFO)).unwrap();
        sink.emit(&message(LogLevel::FATAL)).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "console");
    }
}
