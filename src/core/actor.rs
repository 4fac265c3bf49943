//! # NotifierActor: single owner of the active set.
//!
//! Consumes [`Command`]s from one queue and applies them in order. Nothing
//! else ever mutates the set, so expiry, dismissal, eviction, and ingest can
//! interleave freely without locks and observers still see one coherent
//! history.
//!
//! ## Architecture
//! ```text
//! Notifier / Ingress / timers / workers ──► [unbounded queue] ──► actor loop
//!
//! loop {
//!   ├─► Ingest      → evict to cap → stamp → arm timer → publish Added
//!   ├─► Expire      → due-prefix sweep → publish Expired (per removal)
//!   ├─► Dismiss     → cancel timer → publish Dismissed
//!   ├─► Subscribe   → add to ObserverSet → deliver Subscribed snapshot
//!   ├─► Unsubscribe → drop the observer queue (worker drains and exits)
//!   ├─► Source*     → publish connectivity update (set untouched)
//!   ├─► Panicked    → publish ObserverPanicked
//!   └─► Query       → reply with the current snapshot
//! }
//! ```
//!
//! ## Timers
//! Each notification arms a detached sleep task holding a child token of the
//! runtime token. The task sends `Expire(id)` when the deadline passes, or
//! exits silently if the token was cancelled first (dismissal, eviction,
//! sweep removal, shutdown). A timer that fires late finds its id gone and
//! the expire is a no-op. A ttl too large to yield a deadline arms no timer
//! at all; that notification only leaves by dismissal or eviction.
//!
//! ## Rules
//! - Commands are applied **sequentially** (one global order of updates)
//! - An expire for an absent id is a **no-op**, never an error
//! - Removals publish **one update each**, snapshots taken after the removal
//! - The active set stays **arrival-ordered**; uniform ttl keeps it
//!   deadline-sorted as well

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::command::Command;
use crate::notifications::{Notification, NotificationId, Update, UpdateKind};
use crate::observers::{Observe, ObserverId, ObserverSet};

/// One active notification plus its expiry machinery.
///
/// `deadline` is `None` when the ttl overflows the clock; such entries have
/// no timer and never become due.
struct Armed {
    notification: Notification,
    deadline: Option<Instant>,
    timer: CancellationToken,
}

/// Owns the active set and fans updates out to observers.
pub(crate) struct NotifierActor {
    cfg: Config,
    rx: mpsc::UnboundedReceiver<Command>,
    tx: mpsc::UnboundedSender<Command>,
    token: CancellationToken,
    observers: ObserverSet,
    active: Vec<Armed>,
}

impl NotifierActor {
    pub(crate) fn new(
        cfg: Config,
        rx: mpsc::UnboundedReceiver<Command>,
        tx: mpsc::UnboundedSender<Command>,
        token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            rx,
            tx,
            token,
            observers: ObserverSet::new(),
            active: Vec::new(),
        }
    }

    /// Runs the actor until shutdown.
    ///
    /// Exits when the runtime token is cancelled or every sender is gone.
    /// Cancelling the runtime token also stops every armed timer (they hold
    /// child tokens), so no expire can arrive after the loop ends. Observer
    /// workers drain what was already queued to them before the join.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
            }
        }
        self.observers.shutdown().await;
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Ingest { id, payload } => self.ingest(id, payload),
            Command::Expire(id) => self.expire(id),
            Command::Dismiss(id) => self.dismiss(id),
            Command::SourceConnected => {
                self.publish(Update::new(UpdateKind::SourceConnected, self.snapshot()));
            }
            Command::SourceDisconnected { reason } => {
                let update = Update::new(UpdateKind::SourceDisconnected, self.snapshot())
                    .with_reason(reason);
                self.publish(update);
            }
            Command::Subscribe { id, observer } => self.subscribe(id, observer),
            Command::Unsubscribe(id) => self.observers.remove(id),
            Command::ObserverPanicked { observer, info } => {
                self.publish(Update::observer_panicked(observer, info, self.snapshot()));
            }
            Command::Query(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Admits one notification: evicts to cap, stamps, arms, publishes.
    fn ingest(&mut self, id: NotificationId, payload: serde_json::Value) {
        if self.cfg.max_active > 0 {
            while self.active.len() >= self.cfg.max_active {
                self.remove_at(0, UpdateKind::Evicted);
            }
        }

        let notification = Notification::new(id, payload, self.cfg.ttl);
        let deadline = Instant::now().checked_add(self.cfg.ttl);
        let timer = self.arm(id, deadline);

        self.active.push(Armed {
            notification,
            deadline,
            timer,
        });
        self.publish(Update::new(UpdateKind::Added, self.snapshot()).with_id(id));
    }

    /// Spawns the expiry timer for one notification.
    ///
    /// With no deadline (ttl past the end of the clock) nothing is spawned;
    /// the returned token is then never waited on, only cancelled.
    fn arm(&self, id: NotificationId, deadline: Option<Instant>) -> CancellationToken {
        let token = self.token.child_token();
        let Some(deadline) = deadline else {
            return token;
        };
        let timer = token.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = time::sleep_until(deadline) => {
                    let _ = tx.send(Command::Expire(id));
                }
            }
        });
        token
    }

    /// Removes a due notification, sweeping out anything older that is at
    /// least as due first.
    ///
    /// Uniform ttl keeps the set deadline-sorted, so when one timer fires,
    /// every earlier arrival still present has already reached its own
    /// deadline too. Sweeping them in arrival order keeps removal order
    /// deterministic even when timer wakeups race.
    fn expire(&mut self, id: NotificationId) {
        let Some(pos) = self.position(id) else {
            return; // dismissed, evicted, or already swept
        };
        let Some(due) = self.active[pos].deadline else {
            return; // never armed, so never due
        };

        while let Some(front) = self.active.first() {
            if front.notification.id == id || !front.deadline.is_some_and(|d| d <= due) {
                break;
            }
            self.remove_at(0, UpdateKind::Expired);
        }
        if let Some(pos) = self.position(id) {
            self.remove_at(pos, UpdateKind::Expired);
        }
    }

    /// Removes a notification early; unknown ids are ignored.
    fn dismiss(&mut self, id: NotificationId) {
        if let Some(pos) = self.position(id) {
            self.remove_at(pos, UpdateKind::Dismissed);
        }
    }

    /// Removes one entry, cancels its timer, and publishes the removal.
    fn remove_at(&mut self, pos: usize, kind: UpdateKind) {
        let armed = self.active.remove(pos);
        armed.timer.cancel();
        let update = Update::new(kind, self.snapshot()).with_id(armed.notification.id);
        self.publish(update);
    }

    /// Registers an observer and hands it the current state.
    fn subscribe(&mut self, id: ObserverId, observer: Arc<dyn Observe>) {
        self.observers.add(id, observer, self.tx.clone());
        let hello = Arc::new(Update::new(UpdateKind::Subscribed, self.snapshot()));
        self.observers.emit_to(id, hello);
    }

    /// Fans an update out; dropped deliveries fold back in as overflow
    /// reports. Reports are themselves guarded against re-reporting, so the
    /// recursion stops after one level.
    fn publish(&mut self, update: Update) {
        let update = Arc::new(update);
        for (observer, reason) in self.observers.emit(&update) {
            let report = Update::observer_overflow(observer, reason, Arc::clone(&update.active));
            self.publish(report);
        }
    }

    fn snapshot(&self) -> Arc<[Notification]> {
        self.active.iter().map(|a| a.notification.clone()).collect()
    }

    fn position(&self, id: NotificationId) -> Option<usize> {
        self.active.iter().position(|a| a.notification.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn test_actor(max_active: usize) -> NotifierActor {
        let cfg = Config {
            max_active,
            ..Config::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        NotifierActor::new(cfg, rx, tx, CancellationToken::new())
    }

    fn ids(actor: &NotifierActor) -> Vec<NotificationId> {
        actor.active.iter().map(|a| a.notification.id).collect()
    }

    fn push(actor: &mut NotifierActor) -> NotificationId {
        let id = NotificationId::next();
        actor.handle(Command::Ingest {
            id,
            payload: json!({"n": id.as_u64()}),
        });
        id
    }

    #[tokio::test]
    async fn test_ingest_appends_in_arrival_order() {
        let mut actor = test_actor(0);
        let a = push(&mut actor);
        let b = push(&mut actor);
        let c = push(&mut actor);
        assert_eq!(ids(&actor), vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_expire_unknown_id_is_noop() {
        let mut actor = test_actor(0);
        let a = push(&mut actor);
        actor.handle(Command::Expire(NotificationId::next()));
        assert_eq!(ids(&actor), vec![a]);

        actor.handle(Command::Expire(a));
        actor.handle(Command::Expire(a));
        assert!(ids(&actor).is_empty());
    }

    #[tokio::test]
    async fn test_expire_sweeps_older_entries_first() {
        let mut actor = test_actor(0);
        let a = push(&mut actor);
        let b = push(&mut actor);
        let c = push(&mut actor);

        // b's timer wins the race: a is older and leaves with it, c stays.
        actor.handle(Command::Expire(b));
        assert_eq!(ids(&actor), vec![c]);
        let _ = a;
    }

    #[tokio::test]
    async fn test_dismiss_removes_and_repeats_are_noops() {
        let mut actor = test_actor(0);
        let a = push(&mut actor);
        let b = push(&mut actor);

        actor.handle(Command::Dismiss(a));
        assert_eq!(ids(&actor), vec![b]);

        actor.handle(Command::Dismiss(a));
        assert_eq!(ids(&actor), vec![b]);
    }

    #[tokio::test]
    async fn test_dismissed_id_does_not_expire_later() {
        let mut actor = test_actor(0);
        let a = push(&mut actor);
        let b = push(&mut actor);

        actor.handle(Command::Dismiss(a));
        actor.handle(Command::Expire(a));
        assert_eq!(ids(&actor), vec![b]);
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let mut actor = test_actor(2);
        let a = push(&mut actor);
        let b = push(&mut actor);
        let c = push(&mut actor);

        assert_eq!(ids(&actor), vec![b, c]);
        let _ = a;
    }

    #[tokio::test]
    async fn test_max_ttl_arms_no_timer() {
        let cfg = Config {
            ttl: Duration::MAX,
            ..Config::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let mut actor = NotifierActor::new(cfg, rx, tx, CancellationToken::new());

        let a = push(&mut actor);
        assert_eq!(ids(&actor), vec![a]);
        assert!(actor.active[0].deadline.is_none());

        // No timer exists to send this, and even a stray expire is a no-op.
        actor.handle(Command::Expire(a));
        assert_eq!(ids(&actor), vec![a]);

        actor.handle(Command::Dismiss(a));
        assert!(ids(&actor).is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_clones_current_state() {
        let mut actor = test_actor(0);
        let a = push(&mut actor);
        let snap = actor.snapshot();
        push(&mut actor);

        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].id, a);
        assert_eq!(actor.snapshot().len(), 2);
    }
}
