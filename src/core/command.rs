//! # Commands serialized through the notifier actor.
//!
//! Everything that touches the active set flows through one unbounded queue:
//! handle calls, feed signals, timer firings, worker fault reports. The actor
//! consumes commands one at a time, so no lock guards the set and updates
//! leave in a single global order. The queue is unbounded because producers
//! are either user calls or one command per timer/frame; losing a command
//! here would silently lose a sale.
//!
//! [`Ingress`] is the narrow, cloneable face of that queue handed to event
//! sources: connectivity edges and event payloads go in, nothing comes out.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::notifications::{Notification, NotificationId};
use crate::observers::{Observe, ObserverId};

/// One unit of work for the notifier actor.
pub(crate) enum Command {
    /// Stamp a fresh notification from an event payload and add it.
    Ingest { id: NotificationId, payload: Value },
    /// A notification's timer fired; remove it if still present.
    Expire(NotificationId),
    /// Remove a notification early on user request.
    Dismiss(NotificationId),
    /// The feed established a connection.
    SourceConnected,
    /// The feed lost an established connection.
    SourceDisconnected { reason: Arc<str> },
    /// Register an observer and deliver its initial snapshot.
    Subscribe {
        id: ObserverId,
        observer: Arc<dyn Observe>,
    },
    /// Deregister an observer.
    Unsubscribe(ObserverId),
    /// An observer worker caught a panic.
    ObserverPanicked {
        observer: &'static str,
        info: String,
    },
    /// Read-only query of the active set.
    Query(oneshot::Sender<Arc<[Notification]>>),
}

/// Restricted handle for pushing feed signals into a notifier.
///
/// Handed to an [`EventSource`](crate::EventSource) when the notifier is
/// spawned. Cloning is cheap; every method is a non-blocking enqueue, and
/// after shutdown the sends turn into no-ops.
#[derive(Clone)]
pub struct Ingress {
    tx: mpsc::UnboundedSender<Command>,
}

impl Ingress {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self { tx }
    }

    /// Reports that the feed established a connection.
    pub fn connected(&self) {
        let _ = self.tx.send(Command::SourceConnected);
    }

    /// Reports that the feed lost an established connection.
    pub fn disconnected(&self, reason: impl Into<Arc<str>>) {
        let _ = self.tx.send(Command::SourceDisconnected {
            reason: reason.into(),
        });
    }

    /// Pushes one event payload; the notifier stamps and tracks it.
    ///
    /// Returns the id the resulting notification will carry.
    pub fn event(&self, payload: Value) -> NotificationId {
        let id = NotificationId::next();
        let _ = self.tx.send(Command::Ingest { id, payload });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_event_enqueues_ingest_with_returned_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let feed = Ingress::new(tx);

        let id = feed.event(json!({"product": "mug"}));

        match rx.recv().await {
            Some(Command::Ingest { id: got, payload }) => {
                assert_eq!(got, id);
                assert_eq!(payload["product"], "mug");
            }
            _ => panic!("expected an ingest command"),
        }
    }

    #[tokio::test]
    async fn test_connectivity_signals() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let feed = Ingress::new(tx);

        feed.connected();
        feed.disconnected("stream failed: reset");

        assert!(matches!(rx.recv().await, Some(Command::SourceConnected)));
        match rx.recv().await {
            Some(Command::SourceDisconnected { reason }) => {
                assert_eq!(&*reason, "stream failed: reset");
            }
            _ => panic!("expected a disconnect command"),
        }
    }

    #[tokio::test]
    async fn test_sends_after_shutdown_are_noops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = Ingress::new(tx);
        drop(rx);

        feed.connected();
        let _ = feed.event(json!({}));
    }
}
