//! File logging example
//!
//! Demonstrates logging to both console and file sinks simultaneously.
//!
//! Run with: cargo run --example file_logging

use rust_logger_tree::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Logger Tree - File Logging Example ===\n");

    // The root writes everything to a file, the worker also prints to console
    let app = Logger::builder("app")
        .sink(FileSink::new("application.log")?)
        .sink(
            FileSink::new("application.jsonl")?
                .with_output_format(OutputFormat::Json)
                .with_timestamp_format(TimestampFormat::UnixMillis),
        )
        .build()?;
    let worker = Logger::builder("app.worker")
        .parent(&app)
        .min_level(LogLevel::DEBUG)
        .sink(ConsoleSink::new())
        .build()?;

    println!("1. Logging to both console and file:");
    app.info("Application started")?;
    worker.debug("Loading configuration...")?;
    worker.info("Configuration loaded successfully")?;
    worker.warning("Using default settings for some options")?;
    app.error("Failed to load optional plugin")?;

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        worker.info(format!("Processing item {}/5", i))?;
        if i == 3 {
            worker.warning("Item 3 took longer than expected")?;
        }
    }
    worker.info("All operations completed")?;

    // Dispose the child first so everything it forwarded reaches the files
    worker.dispose()?;
    app.dispose()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'application.jsonl' for the file output");

    Ok(())
}
