//! # Per-consumer FIFO executor.
//!
//! [`QueueExecutor`] owns a bounded queue and a dedicated worker task. Submitting never
//! blocks the provider's notifying thread.
//!
//! ## Architecture
//! ```text
//! execute(job)
//!     │ try_send
//!     ├──► [bounded queue] ──► worker ──► job()
//!     │                           └────► panic → DispatchPanicked
//!     └──► full / closed ──► DispatchOverflow (job dropped)
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `execute()` returns immediately (uses `try_send`)
//! - **FIFO**: jobs run one at a time in submission order
//! - **Overflow**: the job is dropped and `DispatchOverflow` is published
//! - **Isolation**: a panicking job is reported; the worker keeps going
//!
//! ## Example
//! ```rust
//! use windowvisor::{Bus, Executor, QueueExecutor};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let exec = QueueExecutor::new("ui", 64, Bus::new(16));
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     exec.execute(Box::new(move || { let _ = tx.send("done"); }));
//!     assert_eq!(rx.await.unwrap(), "done");
//!     exec.shutdown().await;
//! }
//! ```

use std::borrow::Cow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::dispatch::{Executor, Job};
use crate::events::{Bus, Event, panic_message};

/// Bounded FIFO executor backed by a tokio worker task.
pub struct QueueExecutor {
    name: Cow<'static, str>,
    sender: mpsc::Sender<Job>,
    worker: Mutex<Option<JoinHandle<()>>>,
    stop: CancellationToken,
    bus: Bus,
}

impl QueueExecutor {
    /// Creates the executor and spawns its worker.
    ///
    /// Must be called from within a tokio runtime. Capacity is clamped to at least 1.
    pub fn new(name: impl Into<Cow<'static, str>>, capacity: usize, bus: Bus) -> Arc<Self> {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<Job>(capacity.max(1));
        let stop = CancellationToken::new();
        let handle = tokio::spawn(run_worker(name.clone(), rx, stop.clone(), bus.clone()));

        Arc::new(Self {
            name,
            sender: tx,
            worker: Mutex::new(Some(handle)),
            stop,
            bus,
        })
    }

    /// Creates the executor with [`Config::queue_capacity`].
    pub fn with_config(name: impl Into<Cow<'static, str>>, cfg: &Config, bus: Bus) -> Arc<Self> {
        Self::new(name, cfg.queue_capacity_clamped(), bus)
    }

    /// Stops accepting jobs, runs everything already queued, then waits for the worker.
    ///
    /// Jobs submitted after this call are dropped and reported as `"closed"`.
    pub async fn shutdown(&self) {
        self.stop.cancel();
        let handle = self.worker.lock().take();
        if let Some(h) = handle {
            let _ = h.await;
        }
    }

    /// Returns `true` once the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Executor for QueueExecutor {
    fn execute(&self, job: Job) {
        match self.sender.try_send(job) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.bus.publish(Event::dispatch_overflow(&self.name, "full"));
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.bus
                    .publish(Event::dispatch_overflow(&self.name, "closed"));
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

async fn run_worker(
    name: Cow<'static, str>,
    mut rx: mpsc::Receiver<Job>,
    stop: CancellationToken,
    bus: Bus,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => run_job(&name, job, &bus),
                None => return,
            },
        }
    }

    // Drain what was accepted before the stop.
    rx.close();
    while let Some(job) = rx.recv().await {
        run_job(&name, job, &bus);
    }
}

fn run_job(name: &str, job: Job, bus: &Bus) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
        bus.publish(Event::dispatch_panicked(name, panic_message(&*payload)));
    }
}
