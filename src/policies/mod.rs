//! Reconnect pacing policies.
//!
//! This module groups the knobs that control **how long** a source waits
//! between connection attempts.
//!
//! ## Contents
//! - [`BackoffPolicy`] how reconnect delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid reconnect storms
//!
//! ## Quick wiring
//! ```text
//! WsConfig { reconnect: BackoffPolicy, .. }
//!      └─► source::WsSource uses:
//!           - reconnect.next(attempt) to pace the next dial
//!           - a successful session resets the attempt counter
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=500ms, factor=2.0, max=30s, jitter=None.
//! - `JitterPolicy::None` by default; consider `Equal` when many clients share one feed.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
