//! Async sink example
//!
//! Demonstrates an async sink driven by logger workers, with flush and
//! dispose awaited from a tokio runtime.
//!
//! Run with: cargo run --example async_logging --features async-sinks

use async_trait::async_trait;
use rust_logger_tree::core::{AsyncSink, BlockingSink};
use rust_logger_tree::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Pretends to ship every message to a remote collector
struct RemoteCollector {
    shipped: Arc<AtomicUsize>,
}

#[async_trait]
impl AsyncSink for RemoteCollector {
    async fn emit(&self, message: &LogMessage) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.shipped.fetch_add(1, Ordering::SeqCst);
        if message.level() >= LogLevel::FATAL {
            return Err(LoggerError::other("collector rejected fatal message"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "remote"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Logger Tree - Async Sink Example ===\n");

    let app = Logger::new("app")?;
    let shipped = Arc::new(AtomicUsize::new(0));
    app.add_sink(BlockingSink::current(RemoteCollector {
        shipped: Arc::clone(&shipped),
    }));
    app.add_sink(ConsoleSink::new());

    println!("1. Logging from several tasks:");
    let tasks: Vec<_> = (0..4)
        .map(|task| {
            let logger = app.child(format!("app.task{}", task));
            tokio::spawn(async move {
                let logger = logger?;
                for i in 0..5 {
                    logger.info(format!("task {} step {}", task, i))?;
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
                logger.flush_async().await
            })
        })
        .collect();
    for task in tasks {
        task.await.map_err(|e| LoggerError::other(e.to_string()))??;
    }

    println!("\n2. A failing async sink does not stop the others:");
    app.fatal("out of disk space")?;
    app.flush_async().await?;

    app.dispose_async().await?;
    println!(
        "\nShipped: {}, sink failures: {}",
        shipped.load(Ordering::SeqCst),
        app.metrics().sink_failures()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
