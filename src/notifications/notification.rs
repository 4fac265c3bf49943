//! # Notification records.
//!
//! A [`Notification`] is created once when an event is ingested and never
//! mutated afterwards. Observers only ever see it inside read-only
//! snapshots, so the struct is cheap to clone and carries everything a
//! renderer needs: identity, the original payload, and both ends of its
//! lifetime.
//!
//! ## Identity
//! Ids come from a process-wide monotonic counter, so two events ingested
//! in the same instant with identical payloads still produce two distinct
//! notifications, and a later id always means a later ingest.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde_json::Value;

/// Global sequence counter for notification identity.
static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Unique, monotonically increasing identity of a notification.
///
/// Opaque to callers: the only supported uses are equality, ordering,
/// and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Allocates the next id.
    pub(crate) fn next() -> Self {
        Self(NOTIFICATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric form, for logs and external renderers.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One active notification.
///
/// - `id`: unique identity, assigned at ingest
/// - `payload`: the event data, passed through untouched
/// - `created_at`: wall-clock ingest time
/// - `expires_at`: `created_at` plus the configured ttl
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Unique identity of this notification.
    pub id: NotificationId,
    /// Opaque event payload (e.g. product, amount, user fields).
    pub payload: Value,
    /// When the notification was ingested.
    pub created_at: SystemTime,
    /// When the notification is due to expire.
    pub expires_at: SystemTime,
}

impl Notification {
    /// Stamps a fresh record with its lifetime.
    pub(crate) fn new(id: NotificationId, payload: Value, ttl: Duration) -> Self {
        let created_at = SystemTime::now();
        let expires_at = created_at.checked_add(ttl).unwrap_or(created_at);
        Self {
            id,
            payload,
            created_at,
            expires_at,
        }
    }
}
