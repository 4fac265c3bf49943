//! # Core observer trait
//!
//! `Observe` is the extension point for plugging custom surfaces into a
//! notifier. Each observer is driven by a dedicated worker loop fed by a
//! bounded queue owned by the notifier's internal fan-out.
//!
//! ## Contract
//! - Implementations may be slow (paint, I/O, batching) – they do **not**
//!   block the notifier nor other observers.
//! - The snapshot in each update is complete; an observer that skips or
//!   loses an update can fully recover from the next one.
//! - Each observer **declares** its preferred queue capacity via
//!   [`Observe::queue_capacity`]. If a queue overflows, updates for that
//!   observer are **dropped** and an `ObserverOverflow` update is published.
//!
//! ## Example
//! ```rust
//! use salert::{Observe, Update};
//!
//! struct Ticker;
//!
//! #[async_trait::async_trait]
//! impl Observe for Ticker {
//!     async fn on_update(&self, update: &Update) {
//!         // redraw from update.active
//!         let _ = update.active.len();
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "ticker"
//!     }
//!
//!     fn queue_capacity(&self) -> usize {
//!         128
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::notifications::Update;

/// Contract for update observers.
///
/// Called from an observer-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handle a single update for this observer.
    ///
    /// # Parameters
    /// - `update`: Reference to the update (does not transfer ownership)
    async fn on_update(&self, update: &Update);

    /// Human-readable name (for logs and fault reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this observer's queue.
    ///
    /// On overflow, updates for this observer are **dropped** and reported.
    fn queue_capacity(&self) -> usize {
        64
    }
}
