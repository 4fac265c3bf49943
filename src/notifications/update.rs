//! # Updates delivered to observers.
//!
//! The [`UpdateKind`] enum classifies updates across four categories:
//! - **Registration**: the observer's own initial snapshot
//! - **Lifecycle updates**: the active set changed (added, expired, dismissed, evicted)
//! - **Feed updates**: the push connection came up or went down
//! - **Observer updates**: a registered observer misbehaved (overflow, panic)
//!
//! Every [`Update`] carries an ordered, read-only snapshot of the active
//! set taken at the moment the update was published, so an observer can
//! always re-render from the snapshot alone without tracking deltas.
//!
//! ## Ordering guarantees
//! Each update has a globally unique sequence number (`seq`) that increases
//! monotonically. Within one observer, updates arrive in publish order;
//! `seq` restores the global order across observers.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use salert::{Update, UpdateKind};
//!
//! let up = Update::new(UpdateKind::SourceDisconnected, Arc::from([]))
//!     .with_reason("stream reset");
//!
//! assert_eq!(up.kind, UpdateKind::SourceDisconnected);
//! assert_eq!(up.reason.as_deref(), Some("stream reset"));
//! assert!(up.active.is_empty());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::notifications::{Notification, NotificationId};

/// Global sequence counter for update ordering.
static UPDATE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of observer updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    // === Registration ===
    /// First update an observer receives after registration.
    ///
    /// Sets:
    /// - `active`: the current set, so a late subscriber starts complete
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Subscribed,

    // === Lifecycle of the active set ===
    /// A notification entered the active set.
    ///
    /// Sets:
    /// - `id`: the new notification (present in `active`)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Added,

    /// A notification reached its deadline and left the set.
    ///
    /// Sets:
    /// - `id`: the expired notification (absent from `active`)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Expired,

    /// A notification was dismissed before its deadline.
    ///
    /// Sets:
    /// - `id`: the dismissed notification (absent from `active`)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Dismissed,

    /// The oldest notification was evicted to make room for a new one.
    ///
    /// Emitted only when `max_active` is set and the cap is hit.
    ///
    /// Sets:
    /// - `id`: the evicted notification (absent from `active`)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Evicted,

    // === Feed connectivity ===
    /// The event source established a connection.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourceConnected,

    /// The event source lost its connection.
    ///
    /// Active notifications are unaffected; their timers keep running.
    ///
    /// Sets:
    /// - `reason`: disconnect cause (e.g. "connection closed: going away")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourceDisconnected,

    // === Observer faults ===
    /// An observer dropped an update (queue full or worker closed).
    ///
    /// Sets:
    /// - `observer`: observer name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ObserverOverflow,

    /// An observer panicked while handling an update.
    ///
    /// Sets:
    /// - `observer`: observer name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ObserverPanicked,
}

impl UpdateKind {
    /// `true` for updates that report observer faults.
    ///
    /// Faults raised while delivering a fault report are not re-reported,
    /// which keeps a saturated observer from feeding itself.
    #[inline]
    pub fn is_fault(&self) -> bool {
        matches!(self, UpdateKind::ObserverOverflow | UpdateKind::ObserverPanicked)
    }
}

/// Observer update with an attached snapshot of the active set.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `active`: ordered, read-only snapshot taken when the update was published
/// - other optional fields are set depending on the [`UpdateKind`]
#[derive(Clone)]
pub struct Update {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Update classification.
    pub kind: UpdateKind,

    /// Notification this update is about, if applicable.
    pub id: Option<NotificationId>,
    /// Name of the observer at fault, if applicable.
    pub observer: Option<&'static str>,
    /// Human-readable reason (disconnects, faults).
    pub reason: Option<Arc<str>>,

    /// Snapshot of the active set, oldest first.
    pub active: Arc<[Notification]>,
}

impl Update {
    /// Creates a new update of the given kind with current timestamp and next sequence number.
    pub fn new(kind: UpdateKind, active: Arc<[Notification]>) -> Self {
        Self {
            seq: UPDATE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            id: None,
            observer: None,
            reason: None,
            active,
        }
    }

    /// Attaches the notification this update is about.
    #[inline]
    pub fn with_id(mut self, id: NotificationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attaches the name of the observer at fault.
    #[inline]
    pub fn with_observer(mut self, observer: &'static str) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates an observer overflow report.
    #[inline]
    pub fn observer_overflow(
        observer: &'static str,
        reason: &'static str,
        active: Arc<[Notification]>,
    ) -> Self {
        Update::new(UpdateKind::ObserverOverflow, active)
            .with_observer(observer)
            .with_reason(reason)
    }

    /// Creates an observer panic report.
    #[inline]
    pub fn observer_panicked(
        observer: &'static str,
        info: String,
        active: Arc<[Notification]>,
    ) -> Self {
        Update::new(UpdateKind::ObserverPanicked, active)
            .with_observer(observer)
            .with_reason(info)
    }

    /// Looks up the subject notification inside the attached snapshot.
    ///
    /// Present for [`UpdateKind::Added`] and [`UpdateKind::Subscribed`];
    /// removal updates carry snapshots the subject has already left.
    #[inline]
    pub fn subject(&self) -> Option<&Notification> {
        let id = self.id?;
        self.active.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Arc<[Notification]> {
        Arc::from([])
    }

    #[test]
    fn test_seq_increases_monotonically() {
        let a = Update::new(UpdateKind::Subscribed, empty());
        let b = Update::new(UpdateKind::SourceConnected, empty());
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let id = crate::notifications::NotificationId::next();
        let up = Update::new(UpdateKind::Dismissed, empty())
            .with_id(id)
            .with_reason("user action");
        assert_eq!(up.id, Some(id));
        assert_eq!(up.reason.as_deref(), Some("user action"));
        assert!(up.observer.is_none());
    }

    #[test]
    fn test_fault_kinds() {
        let over = Update::observer_overflow("renderer", "full", empty());
        let panic = Update::observer_panicked("cue", "boom".into(), empty());
        assert!(over.kind.is_fault());
        assert!(panic.kind.is_fault());
        assert!(!UpdateKind::Added.is_fault());
        assert_eq!(over.observer, Some("renderer"));
        assert_eq!(panic.reason.as_deref(), Some("boom"));
    }

    #[test]
    fn test_subject_absent_after_removal() {
        let up = Update::new(UpdateKind::Expired, empty())
            .with_id(crate::notifications::NotificationId::next());
        assert!(up.subject().is_none());
    }
}
