//! Sink delivery for one logger node
//!
//! The worker runs the first sink itself and queues the remaining sinks for
//! a set of long-lived helper threads, then waits until every sink has
//! answered. Helpers are started on demand, never more than the number of
//! sinks handled at once minus one, and live as long as their node.

use super::{
    error::{panic_message, LoggerError, Result},
    log_message::LogMessage,
    sink::SinkHandle,
};
use crossbeam_channel::{bounded, unbounded, Receiver, SendError, Sender};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

struct Job {
    sink: SinkHandle,
    message: LogMessage,
    reply: Sender<Result<()>>,
}

pub(crate) struct FanOut {
    name: Arc<str>,
    /// `None` only while dropping; disconnecting it stops the helpers.
    jobs: Option<Sender<Job>>,
    receiver: Receiver<Job>,
    helpers: Mutex<Vec<JoinHandle<()>>>,
    helper_ids: RwLock<Vec<ThreadId>>,
}

impl FanOut {
    pub(crate) fn new(name: Arc<str>) -> Self {
        let (jobs, receiver) = unbounded();
        Self {
            name,
            jobs: Some(jobs),
            receiver,
            helpers: Mutex::new(Vec::new()),
            helper_ids: RwLock::new(Vec::new()),
        }
    }

    /// Hand `message` to every sink concurrently and collect the failures.
    pub(crate) fn deliver_all(
        &self,
        sinks: &[SinkHandle],
        message: &LogMessage,
    ) -> Vec<LoggerError> {
        let (first, rest) = match sinks {
            [] => return Vec::new(),
            [first, rest @ ..] => (first, rest),
        };

        let mut failures = Vec::new();
        let (reply_tx, reply_rx) = bounded(rest.len());
        let mut pending = 0;

        if !rest.is_empty() && self.ensure_helpers(rest.len()) {
            for sink in rest {
                let job = Job {
                    sink: sink.clone(),
                    message: message.clone(),
                    reply: reply_tx.clone(),
                };
                match self.submit(job) {
                    Ok(()) => pending += 1,
                    Err(SendError(job)) => {
                        failures.extend(deliver(&job.sink, &job.message).err());
                    }
                }
            }
        } else {
            // No helper available: deliver in order on this thread.
            failures.extend(rest.iter().filter_map(|sink| deliver(sink, message).err()));
        }
        drop(reply_tx);

        failures.extend(deliver(first, message).err());

        for _ in 0..pending {
            match reply_rx.recv() {
                Ok(result) => failures.extend(result.err()),
                // Every outstanding job was dropped unprocessed
                Err(_) => break,
            }
        }
        failures
    }

    /// Whether `id` is one of this node's helper threads.
    pub(crate) fn runs_on(&self, id: ThreadId) -> bool {
        self.helper_ids.read().contains(&id)
    }

    #[cfg(test)]
    pub(crate) fn helper_count(&self) -> usize {
        self.helpers.lock().len()
    }

    fn submit(&self, job: Job) -> std::result::Result<(), SendError<Job>> {
        match &self.jobs {
            Some(jobs) => jobs.send(job),
            None => Err(SendError(job)),
        }
    }

    /// Start helpers until there are `wanted` of them. Returns whether at
    /// least one is running.
    fn ensure_helpers(&self, wanted: usize) -> bool {
        let mut helpers = self.helpers.lock();
        while helpers.len() < wanted {
            let receiver = self.receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("logger-{}-sink-{}", self.name, helpers.len() + 1))
                .spawn(move || run_helper(receiver));

            match spawned {
                Ok(handle) => {
                    self.helper_ids.write().push(handle.thread().id());
                    helpers.push(handle);
                }
                Err(e) => {
                    eprintln!(
                        "[LOGGER WARNING] Logger '{}' could not start a sink thread: {}",
                        self.name, e
                    );
                    break;
                }
            }
        }
        !helpers.is_empty()
    }
}

impl Drop for FanOut {
    fn drop(&mut self) {
        drop(self.jobs.take());

        let current = thread::current().id();
        for handle in self.helpers.get_mut().drain(..) {
            if handle.thread().id() != current {
                let _ = handle.join();
            }
        }
    }
}

fn run_helper(jobs: Receiver<Job>) {
    while let Ok(Job {
        sink,
        message,
        reply,
    }) = jobs.recv()
    {
        let result = deliver(&sink, &message);
        // Nothing of the job may outlive the reply the worker waits on
        drop((sink, message));
        let _ = reply.send(result);
    }
}

/// Invoke one sink with panic isolation.
fn deliver(sink: &SinkHandle, message: &LogMessage) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| sink.emit(message))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) if e.is_sink_fault() => Err(e),
        Ok(Err(e)) => Err(LoggerError::sink_failed(sink.name(), e.to_string())),
        Err(panic_info) => Err(LoggerError::sink_panicked(
            sink.name(),
            panic_message(&*panic_info),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, Sink};
    use std::collections::HashSet;

    struct ThreadRecorder {
        seen: Mutex<HashSet<ThreadId>>,
        fail: bool,
    }

    impl ThreadRecorder {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(HashSet::new()),
                fail,
            })
        }
    }

    impl Sink for ThreadRecorder {
        fn emit(&self, _message: &LogMessage) -> Result<()> {
            self.seen.lock().insert(thread::current().id());
            if self.fail {
                return Err(LoggerError::other("refused"));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "thread-recorder"
        }
    }

    #[test]
    fn test_helpers_are_reused_across_messages() {
        let fan_out = FanOut::new(Arc::from("app"));
        let recorders: Vec<_> = (0..3).map(|_| ThreadRecorder::new(false)).collect();
        let sinks: Vec<SinkHandle> = recorders.iter().cloned().map(SinkHandle::from).collect();

        for i in 0..500 {
            let message = LogMessage::new(LogLevel::INFO, i);
            assert!(fan_out.deliver_all(&sinks, &message).is_empty());
        }

        assert_eq!(fan_out.helper_count(), 2);
        let threads: HashSet<ThreadId> = recorders
            .iter()
            .flat_map(|r| r.seen.lock().clone())
            .collect();
        assert!(threads.len() <= 3, "used {} threads", threads.len());
        // The first sink always runs on the calling thread
        assert_eq!(
            *recorders[0].seen.lock(),
            HashSet::from([thread::current().id()])
        );
    }

    #[test]
    fn test_failures_from_helpers_are_collected() {
        let fan_out = FanOut::new(Arc::from("app"));
        let sinks = vec![
            SinkHandle::from(ThreadRecorder::new(false)),
            SinkHandle::from(ThreadRecorder::new(true)),
            SinkHandle::from(ThreadRecorder::new(true)),
        ];

        let failures = fan_out.deliver_all(&sinks, &LogMessage::new(LogLevel::INFO, "x"));
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(LoggerError::is_sink_fault));
    }

    #[test]
    fn test_helper_threads_are_recognized() {
        let fan_out = FanOut::new(Arc::from("app"));
        let helper = ThreadRecorder::new(false);
        let sinks = vec![
            SinkHandle::from(ThreadRecorder::new(false)),
            SinkHandle::from(Arc::clone(&helper)),
        ];
        fan_out.deliver_all(&sinks, &LogMessage::new(LogLevel::INFO, "x"));

        let helper_thread = *helper.seen.lock().iter().next().unwrap();
        assert!(fan_out.runs_on(helper_thread));
        assert!(!fan_out.runs_on(thread::current().id()));
    }
}
