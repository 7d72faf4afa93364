//! Logger nodes
//!
//! Every [`Logger`] is one node of a tree. A node owns a queue and a single
//! worker thread. The worker takes messages in arrival order, runs them
//! through the node's filter chain, forwards accepted messages to the parent
//! node and hands them to all of the node's sinks at once, waiting for every
//! sink before it takes the next message.

use super::{
    error::{panic_message, LoggerError, Result},
    fan_out::FanOut,
    filter::Filter,
    log_level::LogLevel,
    log_message::{LogMessage, Payload},
    metrics::LoggerMetrics,
    sink::{Sink, SinkHandle},
    snapshot::SnapshotList,
};
use crossbeam_channel::{bounded, unbounded, Receiver, SendError, Sender};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// How long dropping the last handle of a live logger waits for its backlog
///
/// Explicit [`Logger::dispose`] and [`Logger::flush`] wait without a limit.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Callback invoked by a worker for every failed sink invocation
pub type SinkErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Node state reachable from both the handles and the worker thread.
struct Shared {
    name: Arc<str>,
    parent: Option<Logger>,
    min_level: RwLock<Option<LogLevel>>,
    level_filter: Filter,
    filters: SnapshotList<Filter>,
    sinks: SnapshotList<SinkHandle>,
    metrics: LoggerMetrics,
    on_sink_error: Option<SinkErrorCallback>,
    worker_thread: RwLock<Option<ThreadId>>,
    fan_out: FanOut,
}

impl Shared {
    fn effective_min_level(&self) -> LogLevel {
        let mut current = self;
        loop {
            if let Some(level) = *current.min_level.read() {
                return level;
            }
            match &current.parent {
                Some(parent) => current = &*parent.node.shared,
                None => return LogLevel::default(),
            }
        }
    }

    fn run(&self, receiver: Receiver<LogMessage>) {
        // Disconnected and empty is the closed state: the handles swapped the
        // sender out and everything queued before that has been processed.
        while let Ok(message) = receiver.recv() {
            self.process(message);
        }
    }

    fn process(&self, message: LogMessage) {
        if !self.passes_filters(&message) {
            self.metrics.record_filtered();
            return;
        }

        if let Some(parent) = &self.parent {
            if let Err(e) = parent.enqueue(message.clone()) {
                let failed = self.metrics.record_forward_failure();
                if failed == 0 || (failed + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER WARNING] Logger '{}' could not forward {} message(s) to '{}': {}",
                        self.name,
                        failed + 1,
                        parent.name(),
                        e
                    );
                }
            }
        }

        let sinks = self.sinks.load();
        let failures = self.fan_out.deliver_all(&sinks, &message);
        if failures.is_empty() {
            self.metrics.record_delivered();
            return;
        }

        for failure in &failures {
            self.metrics.record_sink_failure();
            eprintln!("[LOGGER ERROR] Logger '{}': {}", self.name, failure);
            if let Some(ref callback) = self.on_sink_error {
                callback(failure);
            }
        }
    }

    fn passes_filters(&self, message: &LogMessage) -> bool {
        let filters = self.filters.load();
        filters.iter().all(|filter| {
            match catch_unwind(AssertUnwindSafe(|| filter.accepts(message))) {
                Ok(accepted) => accepted,
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER ERROR] Filter on logger '{}' panicked: {}. Message dropped.",
                        self.name,
                        panic_message(&*panic_info)
                    );
                    false
                }
            }
        })
    }

    /// Flush every sink, returning the first failure after trying them all.
    fn flush_sinks(&self) -> Result<()> {
        let sinks = self.sinks.load();
        let mut first_error = None;

        for sink in sinks.iter() {
            let result = match catch_unwind(AssertUnwindSafe(|| sink.flush())) {
                Ok(result) => result,
                Err(panic_info) => Err(LoggerError::sink_panicked(
                    sink.name(),
                    panic_message(&*panic_info),
                )),
            };
            if let Err(e) = result {
                eprintln!(
                    "[LOGGER ERROR] Logger '{}': flushing sink '{}' failed: {}",
                    self.name,
                    sink.name(),
                    e
                );
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

fn spawn_worker(shared: &Arc<Shared>, receiver: Receiver<LogMessage>) -> Result<JoinHandle<()>> {
    let (ready_tx, ready_rx) = bounded::<()>(1);
    let worker_shared = Arc::clone(shared);

    let handle = thread::Builder::new()
        .name(format!("logger-{}", shared.name))
        .spawn(move || {
            *worker_shared.worker_thread.write() = Some(thread::current().id());
            let _ = ready_tx.send(());
            drop(ready_tx);
            worker_shared.run(receiver);
        })
        .map_err(|e| LoggerError::worker_failed(&*shared.name, e.to_string()))?;

    ready_rx.recv().map_err(|_| {
        LoggerError::worker_failed(&*shared.name, "worker exited before it was ready")
    })?;
    Ok(handle)
}

struct Node {
    shared: Arc<Shared>,
    /// `None` once the node stops accepting messages for good.
    queue: RwLock<Option<Sender<LogMessage>>>,
    /// Held for the whole of a flush or dispose, so lifecycle operations
    /// never overlap and at most one worker drains a queue.
    worker: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
}

impl Node {
    /// Waiting on our own worker from inside it, or from a sink it is
    /// waiting on, would never return.
    fn check_not_worker(&self, operation: &'static str) -> Result<()> {
        let current = thread::current().id();
        if *self.shared.worker_thread.read() == Some(current)
            || self.shared.fan_out.runs_on(current)
        {
            return Err(LoggerError::reentrant(&*self.shared.name, operation));
        }
        Ok(())
    }

    fn join_worker(&self, slot: &mut Option<JoinHandle<()>>) -> Result<()> {
        match slot.take() {
            Some(handle) => handle.join().map_err(|panic_info| {
                LoggerError::worker_failed(&*self.shared.name, panic_message(&*panic_info))
            }),
            None => Ok(()),
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if *self.disposed.get_mut() {
            return;
        }

        // Close the queue so the worker drains what is left and exits
        drop(self.queue.get_mut().take());

        if let Some(handle) = self.worker.get_mut().take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }

            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Worker of logger '{}' panicked during shutdown: {:?}",
                            self.shared.name, e
                        );
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Worker of logger '{}' did not finish within {:?}. \
                         Some messages may be lost.",
                        self.shared.name, DEFAULT_SHUTDOWN_TIMEOUT
                    );
                    return;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        if let Err(e) = self.shared.flush_sinks() {
            eprintln!(
                "[LOGGER ERROR] Failed to flush sinks of logger '{}' during shutdown: {}",
                self.shared.name, e
            );
        }
    }
}

/// Handle to one node of a logger tree
///
/// Cloning is cheap and every clone addresses the same node. A child keeps
/// its parent alive, never the other way around.
///
/// # Example
///
/// ```
/// use rust_logger_tree::prelude::*;
///
/// let app = Logger::new("app").unwrap();
/// let db = app.child("app.db").unwrap();
///
/// let seen = SinkHandle::new(MemorySink::new());
/// app.attach_sink(seen.clone());
///
/// db.debug("connecting").unwrap();
/// db.info("connected").unwrap();
/// db.flush().unwrap();
/// app.flush().unwrap();
/// ```
#[derive(Clone)]
pub struct Logger {
    node: Arc<Node>,
}

impl Logger {
    /// Create a root logger and wait for its worker to start.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        LoggerBuilder::new(name).build()
    }

    /// Create a logger whose parent is `self`.
    pub fn child(&self, name: impl Into<String>) -> Result<Self> {
        LoggerBuilder::new(name).parent(self).build()
    }

    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    fn start(builder: LoggerBuilder) -> Result<Self> {
        let LoggerBuilder {
            name,
            parent,
            min_level,
            sinks,
            filters,
            on_sink_error,
        } = builder;

        let shared = Arc::new_cyclic(|weak: &Weak<Shared>| {
            let this = weak.clone();
            let level_filter = Filter::new(move |message| {
                this.upgrade()
                    .map_or(true, |shared| message.level() >= shared.effective_min_level())
            });

            let mut chain = Vec::with_capacity(filters.len() + 1);
            chain.push(level_filter.clone());
            chain.extend(filters);

            let name: Arc<str> = Arc::from(name);
            Shared {
                fan_out: FanOut::new(Arc::clone(&name)),
                name,
                parent,
                min_level: RwLock::new(min_level),
                level_filter,
                filters: SnapshotList::new(chain),
                sinks: SnapshotList::new(sinks),
                metrics: LoggerMetrics::new(),
                on_sink_error,
                worker_thread: RwLock::new(None),
            }
        });

        let (sender, receiver) = unbounded();
        let handle = spawn_worker(&shared, receiver)?;

        Ok(Self {
            node: Arc::new(Node {
                shared,
                queue: RwLock::new(Some(sender)),
                worker: Mutex::new(Some(handle)),
                disposed: AtomicBool::new(false),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.node.shared.name
    }

    pub fn parent(&self) -> Option<&Logger> {
        self.node.shared.parent.as_ref()
    }

    /// Whether both handles address the same node.
    pub fn same_node(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Queue a new message at `level`. Fails only if the logger was disposed.
    pub fn log<P: Payload>(&self, level: LogLevel, payload: P) -> Result<()> {
        self.enqueue(LogMessage::new(level, payload))
    }

    /// Queue an already built message, pushing this logger's name onto its trail.
    pub fn log_message(&self, message: LogMessage) -> Result<()> {
        self.enqueue(message)
    }

    fn enqueue(&self, mut message: LogMessage) -> Result<()> {
        let shared = &self.node.shared;
        let queue = self.node.queue.read();
        let sender = queue
            .as_ref()
            .ok_or_else(|| LoggerError::disposed(self.name()))?;

        let previous = message.position();
        message.push_sender(Arc::clone(&shared.name));
        if let Err(SendError(mut rejected)) = sender.send(message) {
            // Never accepted here, so the name leaves the trail again
            rejected.retract_sender(previous);
            return Err(LoggerError::worker_stopped(self.name()));
        }
        shared.metrics.record_enqueued();
        Ok(())
    }

    #[inline]
    pub fn debug<P: Payload>(&self, payload: P) -> Result<()> {
        self.log(LogLevel::DEBUG, payload)
    }

    #[inline]
    pub fn info<P: Payload>(&self, payload: P) -> Result<()> {
        self.log(LogLevel::INFO, payload)
    }

    #[inline]
    pub fn warning<P: Payload>(&self, payload: P) -> Result<()> {
        self.log(LogLevel::WARNING, payload)
    }

    #[inline]
    pub fn error<P: Payload>(&self, payload: P) -> Result<()> {
        self.log(LogLevel::ERROR, payload)
    }

    #[inline]
    pub fn fatal<P: Payload>(&self, payload: P) -> Result<()> {
        self.log(LogLevel::FATAL, payload)
    }

    /// Log past a minimum level of [`LogLevel::ALWAYS`].
    #[inline]
    pub fn always<P: Payload>(&self, payload: P) -> Result<()> {
        self.log(LogLevel::ALWAYS, payload)
    }

    /// Attach a sink. Messages already being fanned out are not affected.
    pub fn attach_sink(&self, sink: SinkHandle) {
        self.node.shared.sinks.push(sink);
    }

    /// Wrap `sink` in a handle, attach it, and return the handle.
    pub fn add_sink<S: Sink + 'static>(&self, sink: S) -> SinkHandle {
        let handle = SinkHandle::new(sink);
        self.attach_sink(handle.clone());
        handle
    }

    pub fn detach_sink(&self, sink: &SinkHandle) -> bool {
        self.node.shared.sinks.remove(sink)
    }

    pub fn sinks(&self) -> Vec<SinkHandle> {
        self.node.shared.sinks.load().to_vec()
    }

    /// Append a filter to the chain. Every filter must accept a message for
    /// it to be forwarded and delivered.
    pub fn add_filter(&self, filter: Filter) {
        self.node.shared.filters.push(filter);
    }

    pub fn remove_filter(&self, filter: &Filter) -> bool {
        self.node.shared.filters.remove(filter)
    }

    pub fn filters(&self) -> Vec<Filter> {
        self.node.shared.filters.load().to_vec()
    }

    /// The filter installed at construction that compares a message against
    /// [`min_level`](Logger::min_level). Remove it to let every level through.
    pub fn level_filter(&self) -> Filter {
        self.node.shared.level_filter.clone()
    }

    /// Effective minimum level: this node's override, else the nearest
    /// ancestor's, else [`LogLevel::INFO`].
    pub fn min_level(&self) -> LogLevel {
        self.node.shared.effective_min_level()
    }

    pub fn min_level_override(&self) -> Option<LogLevel> {
        *self.node.shared.min_level.read()
    }

    /// Override the minimum level for this node and every descendant that has
    /// no override of its own.
    pub fn set_min_level(&self, level: LogLevel) {
        *self.node.shared.min_level.write() = Some(level);
    }

    pub fn clear_min_level(&self) {
        *self.node.shared.min_level.write() = None;
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.node.shared.metrics
    }

    pub fn is_disposed(&self) -> bool {
        self.node.disposed.load(Ordering::Acquire)
    }

    /// Drain every message queued so far, flush the sinks and resume.
    ///
    /// Messages logged while the drain is running wait on a fresh queue and
    /// are picked up by the restarted worker. Parent loggers are not flushed.
    pub fn flush(&self) -> Result<()> {
        let node = &self.node;
        node.check_not_worker("flush")?;

        let mut worker = node.worker.lock();
        if self.is_disposed() {
            return Err(LoggerError::disposed(self.name()));
        }

        let (sender, receiver) = unbounded();
        // Dropping the old sender closes the old queue.
        drop(node.queue.write().replace(sender));
        let drained = node.join_worker(&mut worker);

        *worker = Some(spawn_worker(&node.shared, receiver)?);
        drop(worker);

        drained?;
        node.shared.flush_sinks()
    }

    /// Stop accepting messages, drain the backlog, flush the sinks and mark
    /// the logger disposed. Calling it again is a no-op.
    pub fn dispose(&self) -> Result<()> {
        let node = &self.node;
        node.check_not_worker("dispose")?;

        let mut worker = node.worker.lock();
        if self.is_disposed() {
            return Ok(());
        }

        drop(node.queue.write().take());
        let drained = node.join_worker(&mut worker);
        node.disposed.store(true, Ordering::Release);
        drop(worker);

        drained?;
        node.shared.flush_sinks()
    }

    /// [`flush`](Logger::flush) on tokio's blocking pool
    #[cfg(feature = "async-sinks")]
    pub async fn flush_async(&self) -> Result<()> {
        let logger = self.clone();
        tokio::task::spawn_blocking(move || logger.flush())
            .await
            .map_err(|e| LoggerError::worker_failed(self.name(), e.to_string()))?
    }

    /// [`dispose`](Logger::dispose) on tokio's blocking pool
    #[cfg(feature = "async-sinks")]
    pub async fn dispose_async(&self) -> Result<()> {
        let logger = self.clone();
        tokio::task::spawn_blocking(move || logger.dispose())
            .await
            .map_err(|e| LoggerError::worker_failed(self.name(), e.to_string()))?
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("parent", &self.parent().map(Logger::name))
            .field("min_level", &self.min_level())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use rust_logger_tree::prelude::*;
/// use std::sync::Arc;
///
/// let root = Logger::new("app").unwrap();
/// let logger = Logger::builder("app.http")
///     .parent(&root)
///     .min_level(LogLevel::DEBUG)
///     .sink(MemorySink::new())
///     .filter(Filter::max_level(LogLevel::ERROR))
///     .on_sink_error(Arc::new(|err: &LoggerError| eprintln!("sink failed: {}", err)))
///     .build()
///     .unwrap();
/// assert_eq!(logger.parent().map(Logger::name), Some("app"));
/// ```
pub struct LoggerBuilder {
    name: String,
    parent: Option<Logger>,
    min_level: Option<LogLevel>,
    sinks: Vec<SinkHandle>,
    filters: Vec<Filter>,
    on_sink_error: Option<SinkErrorCallback>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            min_level: None,
            sinks: Vec::new(),
            filters: Vec::new(),
            on_sink_error: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn parent(mut self, parent: &Logger) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Set the node's minimum level override
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(SinkHandle::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink_handle(mut self, sink: SinkHandle) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a filter after the default level filter
    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a callback for sink failures
    ///
    /// The callback runs on the worker thread once per failed sink
    /// invocation, after the failure has been counted in the metrics.
    #[must_use = "builder methods return a new value"]
    pub fn on_sink_error(mut self, callback: SinkErrorCallback) -> Self {
        self.on_sink_error = Some(callback);
        self
    }

    /// Build the Logger, returning once its worker is running
    pub fn build(self) -> Result<Logger> {
        Logger::start(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_builder_basic() {
        let logger = Logger::builder("app")
            .min_level(LogLevel::DEBUG)
            .build()
            .unwrap();

        assert_eq!(logger.name(), "app");
        assert!(logger.parent().is_none());
        assert_eq!(logger.min_level(), LogLevel::DEBUG);
        assert_eq!(logger.filters().len(), 1);
    }

    #[test]
    fn test_builder_full_configuration() {
        let root = Logger::new("app").unwrap();
        let logger = Logger::builder("app.cache")
            .parent(&root)
            .sink(MemorySink::new())
            .filter(Filter::max_level(LogLevel::ERROR))
            .build()
            .unwrap();

        assert!(logger.parent().unwrap().same_node(&root));
        assert_eq!(logger.sinks().len(), 1);
        assert_eq!(logger.filters().len(), 2);
        assert_eq!(logger.filters()[0], logger.level_filter());
    }

    #[test]
    fn test_default_minimum_is_info() {
        let logger = Logger::new("app").unwrap();
        assert_eq!(logger.min_level(), LogLevel::INFO);
        assert_eq!(logger.min_level_override(), None);
    }

    #[test]
    fn test_min_level_inherits_from_nearest_ancestor() {
        let root = Logger::new("app").unwrap();
        let mid = root.child("app.db").unwrap();
        let leaf = mid.child("app.db.pool").unwrap();

        root.set_min_level(LogLevel::ERROR);
        assert_eq!(leaf.min_level(), LogLevel::ERROR);

        mid.set_min_level(LogLevel::DEBUG);
        assert_eq!(leaf.min_level(), LogLevel::DEBUG);
        assert_eq!(root.min_level(), LogLevel::ERROR);

        mid.clear_min_level();
        assert_eq!(leaf.min_level(), LogLevel::ERROR);
    }

    #[test]
    fn test_log_after_dispose_fails() {
        let logger = Logger::new("app").unwrap();
        logger.dispose().unwrap();

        assert!(logger.is_disposed());
        assert!(matches!(
            logger.info("too late"),
            Err(LoggerError::Disposed { .. })
        ));
        assert!(matches!(logger.flush(), Err(LoggerError::Disposed { .. })));
        // Disposing twice is fine
        logger.dispose().unwrap();
    }

    #[test]
    fn test_flush_drains_and_resumes() {
        let memory = Arc::new(MemorySink::new());
        let logger = Logger::new("app").unwrap();
        logger.attach_sink(SinkHandle::from(Arc::clone(&memory)));

        for i in 0..10 {
            logger.info(format!("message {}", i)).unwrap();
        }
        logger.flush().unwrap();
        assert_eq!(memory.len(), 10);

        logger.info("after flush").unwrap();
        logger.flush().unwrap();
        assert_eq!(memory.len(), 11);
        assert_eq!(logger.metrics().enqueued(), 11);
        assert_eq!(logger.metrics().delivered(), 11);
    }

    #[test]
    fn test_removing_level_filter_lets_everything_through() {
        let memory = Arc::new(MemorySink::new());
        let logger = Logger::new("app").unwrap();
        logger.attach_sink(SinkHandle::from(Arc::clone(&memory)));

        assert!(logger.remove_filter(&logger.level_filter()));
        logger.log(LogLevel::ANY, "anything").unwrap();
        logger.flush().unwrap();

        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_panicking_filter_drops_message() {
        let memory = Arc::new(MemorySink::new());
        let logger = Logger::new("app").unwrap();
        logger.attach_sink(SinkHandle::from(Arc::clone(&memory)));
        logger.add_filter(Filter::new(|m| {
            if m.payload().to_string() == "explode" {
                panic!("filter exploded");
            }
            true
        }));

        logger.info("explode").unwrap();
        logger.info("fine").unwrap();
        logger.flush().unwrap();

        assert_eq!(memory.len(), 1);
        assert_eq!(logger.metrics().filtered(), 1);
    }

    #[test]
    fn test_flush_from_worker_thread_is_rejected() {
        let logger = Logger::new("app").unwrap();
        let outcome = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let inner = logger.clone();
        let seen = Arc::clone(&outcome);
        let counter = Arc::clone(&calls);
        let filter = Filter::new(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                *seen.lock() = Some(inner.flush());
            }
            true
        });
        logger.add_filter(filter.clone());

        logger.info("trigger").unwrap();
        logger.flush().unwrap();
        // Break the logger -> filter -> logger cycle
        logger.remove_filter(&filter);

        assert!(matches!(
            outcome.lock().take(),
            Some(Err(LoggerError::ReentrantLifecycle { .. }))
        ));
    }

    struct FlushingSink {
        logger: Logger,
        outcome: Mutex<Option<Result<()>>>,
    }

    impl Sink for FlushingSink {
        fn emit(&self, _message: &LogMessage) -> Result<()> {
            let mut outcome = self.outcome.lock();
            if outcome.is_none() {
                *outcome = Some(self.logger.flush());
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "flushing"
        }
    }

    #[test]
    fn test_flush_from_sink_thread_is_rejected() {
        let logger = Logger::new("app").unwrap();
        let flushing = Arc::new(FlushingSink {
            logger: logger.clone(),
            outcome: Mutex::new(None),
        });
        logger.add_sink(MemorySink::new());
        // Second sink, so it runs on a sink thread rather than the worker
        let handle = SinkHandle::from(Arc::clone(&flushing));
        logger.attach_sink(handle.clone());

        logger.info("trigger").unwrap();
        logger.flush().unwrap();
        logger.detach_sink(&handle);

        assert!(matches!(
            flushing.outcome.lock().take(),
            Some(Err(LoggerError::ReentrantLifecycle { .. }))
        ));
    }

    #[test]
    fn test_log_message_keeps_existing_trail() {
        let memory = Arc::new(MemorySink::new());
        let logger = Logger::new("app").unwrap();
        logger.attach_sink(SinkHandle::from(Arc::clone(&memory)));

        let mut message = LogMessage::new(LogLevel::WARNING, "relayed");
        message.push_sender("external");
        logger.log_message(message).unwrap();
        logger.flush().unwrap();

        let received = memory.messages();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].sender(), "app");
        assert_eq!(received[0].trail(), vec!["external", "app"]);
    }

    #[test]
    fn test_refused_message_leaves_trail_untouched() {
        let logger = Logger::new("app").unwrap();
        // A queue whose receiving end is already gone
        *logger.node.queue.write() = Some(unbounded::<LogMessage>().0);

        let mut message = LogMessage::new(LogLevel::INFO, "lost");
        message.push_sender("external");
        let view = message.clone();

        assert!(matches!(
            logger.log_message(message),
            Err(LoggerError::WorkerStopped { .. })
        ));
        assert_eq!(view.trail(), vec!["external"]);
        assert_eq!(view.sender(), "external");
        assert_eq!(logger.metrics().enqueued(), 0);
        logger.dispose().unwrap();
    }

    #[test]
    fn test_debug_output() {
        let logger = Logger::new("app").unwrap();
        let rendered = format!("{:?}", logger);
        assert!(rendered.contains("\"app\""));
        assert!(rendered.contains("disposed: false"));
    }
}
