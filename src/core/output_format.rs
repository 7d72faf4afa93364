//! Output formats used by the bundled sinks
//!
//! - Text: Human-readable format (default)
//! - Json: One JSON object per message
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::log_message::LogMessage;
use super::timestamp::TimestampFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [Info   ] app.db - connected`
    #[default]
    Text,

    /// `{"timestamp":"2025-01-08T10:30:45.123Z","level":"Info","sender":"app.db",...}`
    Json,

    /// `timestamp=2025-01-08T10:30:45.123Z level=Info sender=app.db payload="connected"`
    Logfmt,
}

/// Escape line breaks and tabs so one message always renders as one line.
pub(crate) fn sanitize(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

impl OutputFormat {
    pub fn format(&self, message: &LogMessage, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => self.format_text(message, timestamp_format),
            OutputFormat::Json => self.format_json(message, timestamp_format),
            OutputFormat::Logfmt => self.format_logfmt(message, timestamp_format),
        }
    }

    fn format_text(&self, message: &LogMessage, timestamp_format: &TimestampFormat) -> String {
        format!(
            "[{}] [{:7}] {} - {}",
            timestamp_format.format(message.timestamp()),
            message.level(),
            message.sender(),
            sanitize(&message.payload().to_string())
        )
    }

    fn format_json(&self, message: &LogMessage, timestamp_format: &TimestampFormat) -> String {
        use serde_json::{Map, Value};

        let mut json_obj = Map::new();

        let timestamp = timestamp_format.format(message.timestamp());
        let timestamp = if timestamp_format.is_numeric() {
            timestamp
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or(Value::String(timestamp))
        } else {
            Value::String(timestamp)
        };
        json_obj.insert("timestamp".to_string(), timestamp);
        json_obj.insert(
            "level".to_string(),
            Value::String(message.level().name().to_string()),
        );
        json_obj.insert("sender".to_string(), Value::String(message.sender()));
        json_obj.insert(
            "trail".to_string(),
            Value::Array(message.trail().into_iter().map(Value::String).collect()),
        );
        json_obj.insert(
            "thread_id".to_string(),
            Value::String(message.thread_id().to_string()),
        );
        if let Some(name) = message.thread_name() {
            json_obj.insert("thread_name".to_string(), Value::String(name.to_string()));
        }

        // Structured payloads stay structured
        let payload = match message.payload_as::<Value>() {
            Some(value) => value.clone(),
            None => Value::String(message.payload().to_string()),
        };
        json_obj.insert("payload".to_string(), payload);

        serde_json::to_string(&Value::Object(json_obj)).unwrap_or_default()
    }

    fn format_logfmt(&self, message: &LogMessage, timestamp_format: &TimestampFormat) -> String {
        let mut parts = vec![
            format!(
                "timestamp={}",
                self.escape_logfmt_value(&timestamp_format.format(message.timestamp()))
            ),
            format!("level={}", self.escape_logfmt_value(message.level().name())),
            format!("sender={}", self.escape_logfmt_value(&message.sender())),
            format!("thread_id={}", self.escape_logfmt_value(message.thread_id())),
        ];
        if let Some(name) = message.thread_name() {
            parts.push(format!("thread_name={}", self.escape_logfmt_value(name)));
        }
        parts.push(format!(
            "payload={}",
            self.quote_logfmt_value(&sanitize(&message.payload().to_string()))
        ));

        parts.join(" ")
    }

    /// Quote a logfmt value only when it needs it
    fn escape_logfmt_value(&self, value: &str) -> String {
        if value.is_empty() || value.contains([' ', '"', '=']) {
            self.quote_logfmt_value(value)
        } else {
            value.to_string()
        }
    }

    fn quote_logfmt_value(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn sent(level: LogLevel, payload: &'static str) -> LogMessage {
        let mut message = LogMessage::new(level, payload);
        message.push_sender("app.db");
        message
    }

    #[test]
    fn test_text_format() {
        let result = OutputFormat::Text.format(
            &sent(LogLevel::INFO, "connected"),
            &TimestampFormat::Iso8601,
        );

        assert!(result.contains("[Info   ]"));
        assert!(result.contains("app.db - connected"));
    }

    #[test]
    fn test_text_format_escapes_line_breaks() {
        let result = OutputFormat::Text.format(
            &sent(LogLevel::INFO, "login\nError fake entry"),
            &TimestampFormat::Iso8601,
        );
        assert_eq!(result.lines().count(), 1);
        assert!(result.contains("login\\nError fake entry"));
    }

    #[test]
    fn test_json_format() {
        let result =
            OutputFormat::Json.format(&sent(LogLevel::ERROR, "boom"), &TimestampFormat::Iso8601);

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "Error");
        assert_eq!(parsed["payload"], "boom");
        assert_eq!(parsed["sender"], "app.db");
        assert_eq!(parsed["trail"], serde_json::json!(["app.db"]));
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn test_json_format_keeps_structured_payload() {
        let mut message = LogMessage::new(
            LogLevel::INFO,
            serde_json::json!({"request_id": "abc-123", "latency_ms": 42}),
        );
        message.push_sender("app.http");

        let result = OutputFormat::Json.format(&message, &TimestampFormat::UnixMillis);
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(parsed["payload"]["request_id"], "abc-123");
        assert_eq!(parsed["payload"]["latency_ms"], 42);
        assert!(parsed["timestamp"].is_i64());
    }

    #[test]
    fn test_logfmt_format() {
        let result = OutputFormat::Logfmt.format(
            &sent(LogLevel::WARNING, "pool \"main\" exhausted"),
            &TimestampFormat::Iso8601,
        );

        assert!(result.contains("level=Warning"));
        assert!(result.contains("sender=app.db"));
        assert!(result.contains(r#"payload="pool \"main\" exhausted""#));
    }

    #[test]
    fn test_logfmt_quotes_empty_sender() {
        let message = LogMessage::new(LogLevel::INFO, "orphan");
        let result = OutputFormat::Logfmt.format(&message, &TimestampFormat::Iso8601);
        assert!(result.contains("sender=\"\""));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
