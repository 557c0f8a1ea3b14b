//! # Non-blocking fan-out of bus events to observers.
//!
//! ## Architecture
//! ```text
//! Bus ──► listener ──► emit_arc(event)
//!                        ├──► [queue 1] ──► worker 1 ──► observer1.on_event()
//!                        │    (bounded)        └──────► panic → ObserverPanicked
//!                        └──► [queue N] ──► worker N ──► observerN.on_event()
//! ```
//!
//! ## Rules
//! - **No cross-observer ordering**: observer A may process event N while B processes N+5
//! - **Overflow**: event dropped for that observer only, `ObserverOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Per-observer FIFO**: each observer sees events in order
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind`: the panic becomes `ObserverPanicked`, the worker
//! moves on to the next event.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if an observer panics while holding a lock.

use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, panic_message};
use crate::observers::Observe;

/// Per-observer channel metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for diagnostics observers.
///
/// Manages per-observer queues and worker tasks, providing:
/// - **Concurrent delivery**: events sent to all observers simultaneously
/// - **Isolation**: each observer has a dedicated queue and worker
/// - **Panic safety**: panics caught and reported
/// - **Overflow handling**: dropped events reported via `ObserverOverflow`
pub struct ObserverSet {
    channels: Vec<ObserverChannel>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    stop: CancellationToken,
    bus: Bus,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker task per observer.
    ///
    /// Must be called from within a tokio runtime. Nothing is read from the bus until
    /// [`spawn_listener`](Self::spawn_listener) is called.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>, bus: Bus) -> Arc<Self> {
        let stop = CancellationToken::new();
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().max(1);
            let name = obs.name();
            let (tx, rx) = mpsc::channel::<Arc<Event>>(cap);
            let handle = tokio::spawn(run_worker(obs, rx, stop.clone(), bus.clone()));

            channels.push(ObserverChannel { name, sender: tx });
            workers.push(handle);
        }

        Arc::new(Self {
            channels,
            workers: Mutex::new(workers),
            stop,
            bus,
        })
    }

    /// Forwards bus events to the observers until [`shutdown`](Self::shutdown) or the bus closes.
    ///
    /// Only events published after this call are seen. A lagging listener reports
    /// `ObserverOverflow` with reason `"lagged"`.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let me = Arc::clone(self);
        let stop = self.stop.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => me.emit_arc(Arc::new(ev)),
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            me.bus.publish(Event::observer_overflow("listener", "lagged"));
                        }
                    }
                }
            }
        })
    }

    /// Emits an event to all observers (clones the event).
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a pre-allocated `Arc<Event>` to all observers.
    ///
    /// Overflow events that themselves overflow are not re-published.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow_evt = event.is_observer_overflow();

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_overflow_evt {
                        self.bus.publish(Event::observer_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_overflow_evt {
                        self.bus
                            .publish(Event::observer_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Number of observers in the set.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Stops the listener, lets every worker drain its queue, and waits for them.
    pub async fn shutdown(&self) {
        self.stop.cancel();
        let workers = std::mem::take(&mut *self.workers.lock());
        for h in workers {
            let _ = h.await;
        }
    }
}

async fn run_worker(
    obs: Arc<dyn Observe>,
    mut rx: mpsc::Receiver<Arc<Event>>,
    stop: CancellationToken,
    bus: Bus,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            ev = rx.recv() => match ev {
                Some(ev) => deliver(&obs, &ev, &bus).await,
                None => return,
            },
        }
    }

    rx.close();
    while let Some(ev) = rx.recv().await {
        deliver(&obs, &ev, &bus).await;
    }
}

async fn deliver(obs: &Arc<dyn Observe>, ev: &Event, bus: &Bus) {
    let fut = obs.on_event(ev);
    if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        bus.publish(Event::observer_panicked(obs.name(), panic_message(&*payload)));
    }
}
