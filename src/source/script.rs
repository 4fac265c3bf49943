//! # Function-backed source (`ScriptSource`)
//!
//! [`ScriptSource`] wraps a closure `F: Fn(Ingress, CancellationToken) -> Fut`,
//! producing a fresh future per run. This keeps scripted feeds free of shared
//! mutable state: anything the script needs lives inside the closure.
//!
//! Scripted feeds are the workhorse for demos and tests, and the natural
//! seam for replaying recorded traffic.
//!
//! ## Example
//! ```rust
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//! use salert::{Ingress, ScriptSource, SourceError, SourceRef};
//!
//! let s: SourceRef = ScriptSource::arc("replay", |feed: Ingress, _ctx: CancellationToken| async move {
//!     feed.connected();
//!     feed.event(json!({"product": "poster", "amount": 14.0, "user": "kim"}));
//!     Ok::<_, SourceError>(())
//! });
//!
//! assert_eq!(s.name(), "replay");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::Ingress;
use crate::error::SourceError;
use crate::source::EventSource;

/// Function-backed source implementation.
///
/// Wraps a closure that *creates* a new future per run.
#[derive(Debug)]
pub struct ScriptSource<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ScriptSource<F> {
    /// Creates a new function-backed source.
    ///
    /// Prefer [`ScriptSource::arc`] when you immediately need a [`SourceRef`](crate::SourceRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the source and returns it as a shared handle (`Arc<dyn EventSource>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> EventSource for ScriptSource<F>
where
    F: Fn(Ingress, CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), SourceError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, feed: Ingress, ctx: CancellationToken) -> Result<(), SourceError> {
        (self.f)(feed, ctx).await
    }
}
