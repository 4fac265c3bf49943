//! # Sound cue observer.
//!
//! [`AlertCue`] fires a user-supplied cue exactly once per added
//! notification. It is the recommended home for audio or haptic side
//! effects: the cue runs on the observer's own worker, so a slow or
//! panicking cue can never stall ingestion, delay expiry, or disturb
//! other observers. A panic inside the cue is caught by the worker and
//! folded back into the update stream as `ObserverPanicked`.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use salert::AlertCue;
//!
//! // Terminal bell on every sale.
//! let cue = Arc::new(AlertCue::new(|_notification| {
//!     print!("\x07");
//! }));
//! ```

use async_trait::async_trait;

use crate::notifications::{Notification, Update, UpdateKind};
use crate::observers::Observe;

/// Observer that runs a cue for each newly added notification.
///
/// Reacts to [`UpdateKind::Added`] only; every other update is ignored.
pub struct AlertCue<F> {
    cue: F,
}

impl<F> AlertCue<F>
where
    F: Fn(&Notification) + Send + Sync + 'static,
{
    /// Wraps a cue closure.
    ///
    /// The closure receives the freshly added notification. Keep it quick;
    /// long playback belongs on a channel to a dedicated task.
    pub fn new(cue: F) -> Self {
        Self { cue }
    }
}

#[async_trait]
impl<F> Observe for AlertCue<F>
where
    F: Fn(&Notification) + Send + Sync + 'static,
{
    async fn on_update(&self, update: &Update) {
        if update.kind != UpdateKind::Added {
            return;
        }
        if let Some(added) = update.subject() {
            (self.cue)(added);
        }
    }

    fn name(&self) -> &'static str {
        "alert-cue"
    }
}
