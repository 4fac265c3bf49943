//! # Simple logging observer for debugging and demos.
//!
//! [`LogWriter`] prints updates to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [subscribed] active=0
//! [added] id=3 active=2
//! [expired] id=3 active=1
//! [dismissed] id=4 active=1
//! [evicted] id=1 active=7
//! [source-connected]
//! [source-disconnected] reason="stream failed: reset"
//! [observer-overflow] observer=renderer reason="full"
//! [observer-panicked] observer=cue reason="boom"
//! ```

use async_trait::async_trait;

use crate::notifications::{Update, UpdateKind};
use crate::observers::Observe;

/// Simple stdout logging observer.
///
/// Enabled via the `logging` feature. Prints human-readable update
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Observe`] for
/// structured logging or a real rendering surface.
pub struct LogWriter;

#[async_trait]
impl Observe for LogWriter {
    async fn on_update(&self, update: &Update) {
        let active = update.active.len();
        match update.kind {
            UpdateKind::Subscribed => {
                println!("[subscribed] active={active}");
            }
            UpdateKind::Added => {
                if let Some(id) = update.id {
                    println!("[added] id={id} active={active}");
                }
            }
            UpdateKind::Expired => {
                if let Some(id) = update.id {
                    println!("[expired] id={id} active={active}");
                }
            }
            UpdateKind::Dismissed => {
                if let Some(id) = update.id {
                    println!("[dismissed] id={id} active={active}");
                }
            }
            UpdateKind::Evicted => {
                if let Some(id) = update.id {
                    println!("[evicted] id={id} active={active}");
                }
            }
            UpdateKind::SourceConnected => {
                println!("[source-connected]");
            }
            UpdateKind::SourceDisconnected => {
                println!(
                    "[source-disconnected] reason={:?}",
                    update.reason.as_deref().unwrap_or("")
                );
            }
            UpdateKind::ObserverOverflow => {
                println!(
                    "[observer-overflow] observer={} reason={:?}",
                    update.observer.unwrap_or("?"),
                    update.reason.as_deref().unwrap_or("")
                );
            }
            UpdateKind::ObserverPanicked => {
                println!(
                    "[observer-panicked] observer={} reason={:?}",
                    update.observer.unwrap_or("?"),
                    update.reason.as_deref().unwrap_or("")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
