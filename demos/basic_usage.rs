//! Basic logger usage example
//!
//! Demonstrates a single root logger with a console sink and different log levels.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_tree::prelude::*;
use rust_logger_tree::{info, warning};

fn main() -> Result<()> {
    println!("=== Rust Logger Tree - Basic Usage Example ===\n");

    // Create a root logger and print everything it accepts
    let logger = Logger::new("app")?;
    logger.add_sink(ConsoleSink::new());
    logger.set_min_level(LogLevel::ANY);

    println!("1. Logging at different levels:");
    logger.log(LogLevel::ANY, "This is an any-level message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warning("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;
    logger.flush()?;

    println!("\n2. Logging with different minimum levels:");
    logger.set_min_level(LogLevel::INFO);
    println!("   Minimum level set to Info - debug won't show:");
    logger.debug("Debug message (hidden)")?;
    logger.info("Info message (visible)")?;
    warning!(logger, "Disk usage at {}%", 91)?;
    logger.flush()?;

    println!("\n3. Silencing a logger:");
    logger.set_min_level(LogLevel::ALWAYS);
    logger.fatal("Fatal message (hidden)")?;
    logger.always("Always message (visible)")?;
    logger.flush()?;

    println!("\n4. Structured payloads:");
    logger.set_min_level(LogLevel::INFO);
    logger.add_sink(ConsoleSink::with_colors(false).with_output_format(OutputFormat::Json));
    info!(logger, "user {} logged in", "alice")?;
    logger.info(serde_json::json!({ "event": "checkout", "items": 3 }))?;

    logger.dispose()?;
    let metrics = logger.metrics();
    println!(
        "\nEnqueued: {}, filtered: {}, delivered: {}",
        metrics.enqueued(),
        metrics.filtered(),
        metrics.delivered()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
