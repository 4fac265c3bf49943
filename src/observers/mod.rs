//! # Observers of the active notification set.
//!
//! This module provides the [`Observe`] trait and built-in implementations
//! for reacting to [`Update`](crate::Update)s published by a
//! [`Notifier`](crate::Notifier).
//!
//! ## Architecture
//! ```text
//! Update flow:
//!   notifier actor ── publish(Update) ──► ObserverSet ──► per-observer queues
//!                                              │
//!                                              ├──► [queue] ─► worker ─► Observe::on_update(&Update)
//!                                              │                   │
//!                                              │              ┌────┴─────┬─────────┐
//!                                              │              ▼          ▼         ▼
//!                                              │          renderer   AlertCue  LogWriter
//!                                              │
//!                                              └──► overflow/panic reports fold back into updates
//! ```
//!
//! ## Observer types
//! - **Renderers** - redraw a surface from the snapshot carried by each update
//! - **Side effects** - react to specific kinds only ([`AlertCue`] plays a cue on `Added`)
//!
//! ## Implementing custom observers
//! ```no_run
//! use salert::{Observe, Update, UpdateKind};
//! use async_trait::async_trait;
//!
//! struct BadgeCounter;
//!
//! #[async_trait]
//! impl Observe for BadgeCounter {
//!     async fn on_update(&self, update: &Update) {
//!         match update.kind {
//!             UpdateKind::Added | UpdateKind::Expired | UpdateKind::Dismissed => {
//!                 // repaint badge with update.active.len()
//!             }
//!             _ => {}
//!         }
//!     }
//! }
//! ```

mod cue;
mod observe;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use cue::AlertCue;
pub use observe::Observe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

pub(crate) use set::{ObserverId, ObserverSet};
