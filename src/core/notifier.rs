//! # Notifier: public handle over the actor-owned active set.
//!
//! The [`Notifier`] owns the command queue, the runtime cancellation token,
//! and the two background tasks (actor and source). It spawns them at build
//! time and tears them down deterministically in [`Notifier::shutdown`].
//!
//! ## Key responsibilities
//! - spawn the actor loop and hand the injected [`EventSource`] its [`Ingress`]
//! - expose the manager operations: ingest, dismiss, subscribe, active
//! - deterministic shutdown: cancel, then join actor, source, and workers
//!
//! ## High-level architecture
//! ```text
//! Notifier::builder(cfg).with_observer(..).spawn(source)
//!     ├─► unbounded command queue
//!     ├─► tokio::spawn(NotifierActor::run)          (owns the active set)
//!     ├─► Subscribe commands for builder observers  (registered before any feed signal)
//!     └─► tokio::spawn(source.run(Ingress, child))  (child of the runtime token)
//!
//! Update flow:
//!   source ─► Ingress ─► queue ─► actor ─► ObserverSet ─► observer workers
//!   handle calls (ingest/dismiss/subscribe/active) enter the same queue
//!
//! Shutdown path:
//!   shutdown() ─► token.cancel()
//!       ├─► actor loop exits, timers die with their child tokens
//!       ├─► source honors its child token and returns
//!       └─► observer workers drain their queues and join
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//! use salert::{Config, Ingress, Notifier, ScriptSource, SourceError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = Config::default();
//!     cfg.ttl = Duration::from_millis(100);
//!
//!     let feed = ScriptSource::arc("burst", |feed: Ingress, _ctx: CancellationToken| async move {
//!         feed.connected();
//!         feed.event(json!({"product": "mug", "amount": 12.5, "user": "ada"}));
//!         Ok::<_, SourceError>(())
//!     });
//!
//!     let notifier = Notifier::builder(cfg).spawn(feed);
//!
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     assert_eq!(notifier.active().await.len(), 1);
//!
//!     tokio::time::sleep(Duration::from_millis(150)).await;
//!     assert!(notifier.active().await.is_empty());
//!
//!     notifier.shutdown().await;
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::actor::NotifierActor;
use crate::core::command::{Command, Ingress};
use crate::notifications::{Notification, NotificationId};
use crate::observers::{Observe, ObserverId};
use crate::source::SourceRef;

/// Builder for constructing a [`Notifier`].
pub struct NotifierBuilder {
    cfg: Config,
    observers: Vec<Arc<dyn Observe>>,
}

impl NotifierBuilder {
    /// Adds one observer registered before the feed starts.
    ///
    /// Builder observers live for the notifier's lifetime; use
    /// [`Notifier::subscribe`] when you need to deregister later.
    pub fn with_observer(mut self, observer: Arc<dyn Observe>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Adds a batch of observers registered before the feed starts.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers.extend(observers);
        self
    }

    /// Spawns the runtime and starts the given source.
    ///
    /// Must be called within a tokio runtime. Builder observers are
    /// registered (and receive their `Subscribed` snapshot) before the
    /// source can deliver its first signal.
    pub fn spawn(self, source: SourceRef) -> Notifier {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let actor = NotifierActor::new(self.cfg, rx, tx.clone(), token.clone());
        let actor_handle = tokio::spawn(actor.run());

        let mut next_observer: u64 = 0;
        for observer in self.observers {
            let id = ObserverId(next_observer);
            next_observer += 1;
            let _ = tx.send(Command::Subscribe { id, observer });
        }

        let feed = Ingress::new(tx.clone());
        let reporter = feed.clone();
        let child = token.child_token();
        let source_handle = tokio::spawn(async move {
            if let Err(err) = source.run(feed, child).await {
                reporter.disconnected(err.as_message());
            }
        });

        Notifier {
            tx,
            token,
            next_observer: AtomicU64::new(next_observer),
            actor: actor_handle,
            source: source_handle,
        }
    }
}

/// Handle to a running notification runtime.
///
/// All operations are non-blocking enqueues into the actor (queries await
/// their reply). The handle is not `Clone`; share it behind an `Arc` if
/// several parts of the application ingest or subscribe, and keep sole
/// ownership where [`Notifier::shutdown`] will be called.
pub struct Notifier {
    tx: mpsc::UnboundedSender<Command>,
    token: CancellationToken,
    next_observer: AtomicU64,
    actor: JoinHandle<()>,
    source: JoinHandle<()>,
}

impl Notifier {
    /// Starts building a notifier with the given configuration.
    pub fn builder(cfg: Config) -> NotifierBuilder {
        NotifierBuilder {
            cfg,
            observers: Vec::new(),
        }
    }

    /// Ingests one event payload by hand, as if the feed had delivered it.
    ///
    /// Returns the id the resulting notification will carry. The id is
    /// allocated immediately; the notification itself appears once the
    /// actor processes the command.
    pub fn ingest(&self, payload: Value) -> NotificationId {
        let id = NotificationId::next();
        let _ = self.tx.send(Command::Ingest { id, payload });
        id
    }

    /// Removes a notification before its deadline.
    ///
    /// Unknown or already-removed ids are ignored.
    pub fn dismiss(&self, id: NotificationId) {
        let _ = self.tx.send(Command::Dismiss(id));
    }

    /// Registers an observer; it receives a `Subscribed` snapshot first.
    ///
    /// The returned [`Subscription`] deregisters the observer when consumed.
    pub fn subscribe(&self, observer: Arc<dyn Observe>) -> Subscription {
        let id = ObserverId(self.next_observer.fetch_add(1, AtomicOrdering::Relaxed));
        let _ = self.tx.send(Command::Subscribe { id, observer });
        Subscription {
            id,
            tx: self.tx.clone(),
        }
    }

    /// Returns the current active set, oldest first.
    ///
    /// The snapshot reflects every command the actor has processed so far;
    /// after shutdown it is empty.
    pub async fn active(&self) -> Arc<[Notification]> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Query(reply)).is_err() {
            return Arc::from([]);
        }
        rx.await.unwrap_or_else(|_| Arc::from([]))
    }

    /// Stops the runtime and waits for it to finish.
    ///
    /// Cancels the runtime token, which stops the actor loop, every armed
    /// timer, and the source. Observer workers drain updates already queued
    /// to them; once this returns, no observer will be called again.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.actor.await;
        let _ = self.source.await;
    }
}

/// Ticket for a dynamically registered observer.
///
/// Dropping the ticket without calling [`Subscription::unsubscribe`] leaves
/// the observer registered for the notifier's lifetime.
pub struct Subscription {
    id: ObserverId,
    tx: mpsc::UnboundedSender<Command>,
}

impl Subscription {
    /// Deregisters the observer.
    ///
    /// Updates already queued to it still drain; nothing new is delivered.
    pub fn unsubscribe(self) {
        let _ = self.tx.send(Command::Unsubscribe(self.id));
    }
}
