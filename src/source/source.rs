//! # Source abstraction.
//!
//! This module defines the [`EventSource`] trait (async, cancelable) and the
//! common handle type [`SourceRef`], an `Arc<dyn EventSource>` suitable for
//! handing to a [`Notifier`](crate::Notifier) at build time.
//!
//! A source receives an [`Ingress`] for pushing signals into the notifier and
//! a [`CancellationToken`] it should watch to stop cooperatively during
//! shutdown.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::Ingress;
use crate::error::SourceError;

/// Shared reference to an event source.
pub type SourceRef = Arc<dyn EventSource>;

/// # Asynchronous, cancelable event feed.
///
/// An `EventSource` has a stable [`name`](EventSource::name) and an async
/// [`run`](EventSource::run) method that drives the feed: it reports
/// connectivity edges and pushes event payloads through the [`Ingress`].
/// Implementors should regularly check cancellation and exit promptly
/// during shutdown.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use serde_json::json;
/// use salert::{EventSource, Ingress, SourceError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl EventSource for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&self, feed: Ingress, ctx: CancellationToken) -> Result<(), SourceError> {
///         feed.connected();
///         feed.event(json!({"product": "mug", "amount": 9.5, "user": "ada"}));
///         ctx.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventSource: Send + Sync + 'static {
    /// Returns a stable, human-readable source name.
    fn name(&self) -> &str;

    /// Drives the feed until it ends or cancellation is requested.
    ///
    /// Returning `Ok(())` means the feed ended on its own terms (or honored
    /// cancellation). Returning an error marks the feed as unrecoverable;
    /// the notifier reports it as a disconnect and the source is not
    /// restarted.
    async fn run(&self, feed: Ingress, ctx: CancellationToken) -> Result<(), SourceError>;
}
