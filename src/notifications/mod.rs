//! # Notification records and the updates that describe them.
//!
//! - [`Notification`] — an immutable record of one ingested event, stamped
//!   with a unique id and its expiry deadline.
//! - [`Update`] — what observers receive: a classification ([`UpdateKind`])
//!   plus an ordered snapshot of the active set.

mod notification;
mod update;

pub use notification::{Notification, NotificationId};
pub use update::{Update, UpdateKind};
