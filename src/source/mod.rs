//! # Event sources that feed a notifier.
//!
//! This module provides the source-side types:
//! - [`EventSource`] - trait for implementing async cancelable feeds
//! - [`ScriptSource`] - function-backed feed (closures, tests, replays)
//! - [`WsSource`] - persistent WebSocket feed with reconnect pacing
//! - [`SourceRef`] - shared reference to a source (`Arc<dyn EventSource>`)
//! - [`Envelope`] - the JSON frame format [`WsSource`] understands

mod script;
mod source;
mod wire;
mod ws;

pub use script::ScriptSource;
pub use source::{EventSource, SourceRef};
pub use wire::Envelope;
pub use ws::{WsConfig, WsSource};
