//! Logger tree example
//!
//! Demonstrates a hierarchy of loggers: children inherit the minimum level of
//! their ancestors, forward what they accept, and each node can add its own
//! filters and sinks.
//!
//! Run with: cargo run --example logger_tree

use rust_logger_tree::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Logger Tree - Hierarchy Example ===\n");

    // Build the tree from configuration
    let config = LoggerConfig::from_json(
        r#"{
            "name": "app",
            "children": [
                { "name": "app.db", "min_level": "Debug" },
                { "name": "app.http", "children": [{ "name": "app.http.auth" }] }
            ]
        }"#,
    )?;
    let loggers = config.build()?;
    let [app, db, http, auth] = &loggers[..] else {
        unreachable!("the configuration describes four loggers");
    };

    app.add_sink(ConsoleSink::new());
    let audit = Arc::new(MemorySink::named("audit"));
    auth.attach_sink(SinkHandle::from(Arc::clone(&audit)));

    println!("1. Effective minimum levels:");
    for logger in &loggers {
        println!("   {:<14} {}", logger.name(), logger.min_level());
    }

    println!("\n2. Messages propagate to every ancestor:");
    db.debug("SELECT 1 took 0.2ms")?;
    auth.info("login accepted for alice")?;
    http.warning("slow response from /reports")?;

    // Drain leaves before their parents
    for logger in loggers.iter().rev() {
        logger.flush()?;
    }

    println!("\n3. The auth sink saw its own view of the trail:");
    for message in audit.messages() {
        println!(
            "   sender={} trail={:?} payload={}",
            message.sender(),
            message.trail(),
            message.payload()
        );
    }

    println!("\n4. Per-node filters:");
    http.add_filter(Filter::new(|m: &LogMessage| {
        !m.payload().to_string().starts_with("GET /health")
    }));
    http.info("GET /health 200")?;
    http.info("GET /users 200")?;
    http.flush()?;
    app.flush()?;

    for logger in loggers.iter().rev() {
        logger.dispose()?;
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
