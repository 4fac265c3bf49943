//! # salert
//!
//! **Salert** is a lightweight real-time notification runtime for Rust.
//!
//! It keeps a set of transient, self-expiring notifications fed by a
//! persistent push connection (live sales, alerts, tickers) and fans every
//! change out to observers as ordered, read-only snapshots. The crate is
//! designed as a building block for dashboards, overlays, and bots that
//! need "toast"-style state without owning timers or sockets themselves.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌────────────────┐      ┌────────────────┐
//!   │    WsSource    │      │  ScriptSource  │   (any EventSource)
//!   │ (live ws feed) │      │ (replay/tests) │
//!   └───────┬────────┘      └───────┬────────┘
//!           │  Ingress: connected / disconnected / event(payload)
//!           ▼                       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                 command queue (unbounded, lossless)               │
//! │   Ingest • Expire • Dismiss • Subscribe • Source* • Query • ...   │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  NotifierActor (single owner of the active set)                   │
//! │  - stamps notifications (id, created_at, expires_at)              │
//! │  - arms one timer task per notification (child tokens)            │
//! │  - evicts oldest at max_active, sweeps due prefixes on expiry     │
//! │  - publishes one Update per change, snapshot attached             │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                            ObserverSet
//!                          (per-observer queues)
//!                       ┌─────────┼─────────┐
//!                       ▼         ▼         ▼
//!                    worker1   worker2   workerN
//!                       ▼         ▼         ▼
//!                  renderer   AlertCue   LogWriter
//!                  .on_update(&Update)  (each isolated)
//! ```
//!
//! ### Lifecycle
//! ```text
//! feed.event(payload) ──► queue ──► actor
//!
//! Ingest:
//!   ├─► max_active reached? evict oldest ─► publish Evicted
//!   ├─► stamp Notification{ id, payload, created_at, expires_at = created_at + ttl }
//!   ├─► arm timer (sleep until deadline, then send Expire(id))
//!   └─► publish Added{ id } + snapshot
//!
//! Expire(id):
//!   ├─► id absent? no-op (dismissed, evicted, or already swept)
//!   ├─► sweep older entries that are at least as due ─► publish Expired each
//!   └─► remove id ─► publish Expired{ id } + snapshot
//!
//! Dismiss(id):
//!   └─► cancel timer, remove ─► publish Dismissed{ id } + snapshot
//!
//! Subscribe:
//!   └─► register observer ─► deliver Subscribed + current snapshot
//!
//! Source edges:
//!   └─► publish SourceConnected / SourceDisconnected (set untouched;
//!       active notifications keep expiring on schedule)
//! ```
//!
//! ## Features
//! | Area              | Description                                                             | Key types / traits                    |
//! |-------------------|-------------------------------------------------------------------------|---------------------------------------|
//! | **Observer API**  | React to every change with an ordered snapshot (render, log, side-fx).  | [`Observe`], [`Update`]               |
//! | **Sources**       | Feed the notifier from a socket, a script, or anything cancelable.      | [`EventSource`], [`WsSource`], [`ScriptSource`] |
//! | **Lifecycle**     | Unique ids, uniform ttl, idempotent expiry, dismissal, eviction.        | [`Notifier`], [`Notification`]        |
//! | **Policies**      | Pace reconnects while a feed endpoint is unreachable.                   | [`BackoffPolicy`], [`JitterPolicy`]   |
//! | **Errors**        | Typed feed errors with retryability.                                    | [`SourceError`]                       |
//! | **Configuration** | Centralize runtime settings (ttl, cap).                                 | [`Config`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//! use salert::{AlertCue, Config, Ingress, Notifier, ScriptSource, SourceError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = Config::default();
//!     cfg.ttl = Duration::from_millis(200);
//!
//!     // A scripted feed standing in for a live socket.
//!     let feed = ScriptSource::arc("demo", |feed: Ingress, _ctx: CancellationToken| async move {
//!         feed.connected();
//!         feed.event(json!({"product": "mug", "amount": 12.5, "user": "ada"}));
//!         feed.event(json!({"product": "tee", "amount": 29.0, "user": "kim"}));
//!         Ok::<_, SourceError>(())
//!     });
//!
//!     let notifier = Notifier::builder(cfg)
//!         .with_observer(Arc::new(AlertCue::new(|_sale| print!("\x07"))))
//!         .spawn(feed);
//!
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//!     assert_eq!(notifier.active().await.len(), 2);
//!
//!     // Both expire on their own.
//!     tokio::time::sleep(Duration::from_millis(250)).await;
//!     assert!(notifier.active().await.is_empty());
//!
//!     notifier.shutdown().await;
//! }
//! ```

mod config;
mod core;
mod error;
mod notifications;
mod observers;
mod policies;
mod source;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Ingress, Notifier, NotifierBuilder, Subscription};
pub use error::SourceError;
pub use notifications::{Notification, NotificationId, Update, UpdateKind};
pub use observers::{AlertCue, Observe};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use source::{Envelope, EventSource, ScriptSource, SourceRef, WsConfig, WsSource};

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
