//! # Non-blocking update fan-out to multiple observers.
//!
//! Provides [`ObserverSet`] — distributes updates to every registered
//! observer without blocking the notifier actor.
//!
//! ## Architecture
//! ```text
//! emit(update)                      (called from the actor, registration order)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► observer1.on_update()
//!     │    (bounded)         └──────► panic → ObserverPanicked command
//!     ├──► [queue 2] ──► worker 2 ──► observer2.on_update()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► observerN.on_update()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **Per-observer FIFO**: each observer sees updates in publish order
//! - **No cross-observer sync**: observer A may process update N while B processes N+5
//! - **Overflow**: update dropped for that observer only, reported back to the actor
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: a slow or panicking observer doesn't affect others
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind` to isolate panics:
//! - Panic is caught and folded back into the update stream as `ObserverPanicked`
//! - Worker continues processing the next update
//! - Other observers unaffected
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if an observer uses `Arc<Mutex<T>>` and panics while holding
//! the lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::core::command::Command;
use crate::notifications::Update;
use crate::observers::Observe;

/// Opaque registration key for one observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ObserverId(pub(crate) u64);

/// Per-observer channel metadata.
struct ObserverChannel {
    id: ObserverId,
    name: &'static str,
    sender: mpsc::Sender<Arc<Update>>,
}

/// Fan-out coordinator for registered observers.
///
/// Manages per-observer queues and worker tasks, providing:
/// - **Concurrent delivery**: updates queued for all observers in registration order
/// - **Isolation**: each observer has a dedicated queue and worker
/// - **Panic safety**: panics caught and reported, never crash the notifier
/// - **Overflow handling**: dropped updates surface as `ObserverOverflow`
pub(crate) struct ObserverSet {
    channels: Vec<ObserverChannel>,
    workers: Vec<(ObserverId, JoinHandle<()>)>,
}

impl ObserverSet {
    /// Creates an empty set; observers are added as they register.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            channels: Vec::new(),
            workers: Vec::new(),
        }
    }

    /// Registers an observer and spawns its worker task.
    ///
    /// ### Per-observer setup
    /// - Bounded mpsc queue (capacity from [`Observe::queue_capacity`])
    /// - Dedicated worker task (runs until its queue is closed)
    /// - Panic isolation via `catch_unwind`; panics are reported through
    ///   `faults` so the actor can publish them as updates
    ///
    /// ### Notes
    /// - Minimum queue capacity is 1 (enforced)
    /// - Registration order is delivery order for `emit`
    pub(crate) fn add(
        &mut self,
        id: ObserverId,
        observer: Arc<dyn Observe>,
        faults: mpsc::UnboundedSender<Command>,
    ) {
        let cap = observer.queue_capacity().max(1);
        let name = observer.name();
        let (tx, mut rx) = mpsc::channel::<Arc<Update>>(cap);

        let handle = tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                let fut = observer.on_update(update.as_ref());

                if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                    let info = {
                        let any = &*panic_err;
                        if let Some(msg) = any.downcast_ref::<&'static str>() {
                            (*msg).to_string()
                        } else if let Some(msg) = any.downcast_ref::<String>() {
                            msg.clone()
                        } else {
                            "unknown panic".to_string()
                        }
                    };
                    let _ = faults.send(Command::ObserverPanicked {
                        observer: observer.name(),
                        info,
                    });
                }
            }
        });

        self.channels.push(ObserverChannel {
            id,
            name,
            sender: tx,
        });
        self.workers.push((id, handle));
    }

    /// Deregisters an observer.
    ///
    /// Dropping the sender closes the queue; the worker drains what was
    /// already queued and exits on its own. Unknown ids are ignored.
    pub(crate) fn remove(&mut self, id: ObserverId) {
        self.channels.retain(|c| c.id != id);
        self.workers.retain(|(wid, _)| *wid != id);
    }

    /// Queues an update for every observer, in registration order.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: update dropped for that observer, `("name", "full")` returned
    /// - On queue closed: `("name", "closed")` returned
    ///
    /// ### Overflow prevention
    /// Fault reports that themselves fail to queue are not reported again,
    /// so a saturated observer cannot feed itself.
    pub(crate) fn emit(&self, update: &Arc<Update>) -> Vec<(&'static str, &'static str)> {
        let is_fault_report = update.kind.is_fault();
        let mut dropped = Vec::new();

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(update)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_fault_report {
                        dropped.push((channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_fault_report {
                        dropped.push((channel.name, "closed"));
                    }
                }
            }
        }
        dropped
    }

    /// Queues an update for a single observer.
    ///
    /// Used for the initial snapshot right after registration, when the
    /// queue is guaranteed empty.
    pub(crate) fn emit_to(&self, id: ObserverId, update: Arc<Update>) {
        if let Some(channel) = self.channels.iter().find(|c| c.id == id) {
            let _ = channel.sender.try_send(update);
        }
    }

    /// Gracefully shuts down all observer workers.
    ///
    /// 1. Drops all channel senders (workers see their queue closed)
    /// 2. Awaits all worker tasks to finish draining
    pub(crate) async fn shutdown(self) {
        drop(self.channels);

        for (_, h) in self.workers {
            let _ = h.await;
        }
    }
}
