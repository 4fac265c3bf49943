//! # WebSocket event source.
//!
//! [`WsSource`] keeps one persistent connection to a push feed and turns
//! matching frames into notifications.
//!
//! ## Frame format
//! Text frames carrying JSON envelopes (see [`Envelope`]):
//! ```json
//! {"event": "sale_created", "data": {"product": "mug", "amount": 12.5, "user": "ada"}}
//! ```
//!
//! ## Rules
//! - **Reconnects forever**: [`WsConfig::reconnect`] paces attempts while the
//!   endpoint is unreachable; a successful session resets the pacing.
//! - **Edge-triggered connectivity**: `connected` fires once per completed
//!   handshake, `disconnected` once when an established connection drops.
//!   Failed handshakes during an outage produce no extra signals.
//! - **Selective intake**: frames whose `event` differs from
//!   [`WsConfig::event`], and frames that don't parse, are skipped.
//! - **Opaque payloads**: `data` passes through to the notification untouched.
//!
//! ## Example
//! ```no_run
//! use salert::{Config, Notifier, WsConfig, WsSource};
//!
//! # async fn demo() {
//! let notifier = Notifier::builder(Config::default()).spawn(WsSource::arc(WsConfig {
//!     endpoint: "wss://feed.example.com/live".into(),
//!     ..WsConfig::default()
//! }));
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::time;
use tokio_tungstenite::{connect_async, tungstenite};
use tokio_util::sync::CancellationToken;

use crate::core::Ingress;
use crate::error::SourceError;
use crate::policies::{BackoffPolicy, JitterPolicy};
use crate::source::{Envelope, EventSource};

/// Connection settings for a [`WsSource`].
#[derive(Clone, Debug)]
pub struct WsConfig {
    /// Feed endpoint (`ws://` or `wss://`).
    pub endpoint: String,
    /// Envelope event name that becomes a notification.
    pub event: String,
    /// Pacing for reconnect attempts while the endpoint is unreachable.
    pub reconnect: BackoffPolicy,
}

impl Default for WsConfig {
    /// Provides a default configuration:
    /// - `endpoint = "ws://127.0.0.1:8000/ws"`
    /// - `event = "sale_created"`
    /// - `reconnect = BackoffPolicy::default()` with equal jitter
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:8000/ws".into(),
            event: "sale_created".into(),
            reconnect: BackoffPolicy {
                jitter: JitterPolicy::Equal,
                ..BackoffPolicy::default()
            },
        }
    }
}

/// How one connected session ended.
enum SessionEnd {
    /// Cancellation was requested; the source should stop.
    Cancelled,
    /// The connection dropped; the source should redial.
    Lost,
}

/// Persistent WebSocket feed.
///
/// Owns no explicit connection state: connectivity is reported through the
/// [`Ingress`] as it changes, and the redial loop runs until cancelled.
pub struct WsSource {
    cfg: WsConfig,
}

impl WsSource {
    /// Creates a source for the given connection settings.
    pub fn new(cfg: WsConfig) -> Self {
        Self { cfg }
    }

    /// Creates the source and returns it as a shared handle.
    pub fn arc(cfg: WsConfig) -> Arc<Self> {
        Arc::new(Self::new(cfg))
    }

    /// Dials once and pumps frames until the connection ends.
    ///
    /// Emits `connected` after the handshake and `disconnected` when an
    /// established connection drops. A handshake failure returns an error
    /// without touching connectivity signals.
    async fn session(
        &self,
        feed: &Ingress,
        ctx: &CancellationToken,
    ) -> Result<SessionEnd, SourceError> {
        let mut stream = tokio::select! {
            _ = ctx.cancelled() => return Ok(SessionEnd::Cancelled),
            conn = connect_async(self.cfg.endpoint.as_str()) => match conn {
                Ok((stream, _response)) => stream,
                Err(err) => return Err(classify_dial_error(err)),
            },
        };
        feed.connected();

        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Ok(SessionEnd::Cancelled),
                msg = stream.next() => match msg {
                    Some(Ok(tungstenite::Message::Text(text))) => self.accept(feed, &text),
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                        let err = SourceError::Closed { reason };
                        feed.disconnected(err.as_message());
                        return Ok(SessionEnd::Lost);
                    }
                    // Binary frames are not part of the feed; ping/pong is
                    // serviced by the protocol during read polling.
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        let err = SourceError::Stream { error: err.to_string() };
                        feed.disconnected(err.as_message());
                        return Ok(SessionEnd::Lost);
                    }
                    None => {
                        let err = SourceError::Closed { reason: String::new() };
                        feed.disconnected(err.as_message());
                        return Ok(SessionEnd::Lost);
                    }
                },
            }
        }
    }

    /// Routes one text frame. Non-matching and malformed frames are skipped.
    fn accept(&self, feed: &Ingress, text: &str) {
        if let Ok(env) = Envelope::parse(text) {
            if env.event == self.cfg.event {
                feed.event(env.data);
            }
        }
    }
}

#[async_trait]
impl EventSource for WsSource {
    fn name(&self) -> &str {
        "ws-source"
    }

    async fn run(&self, feed: Ingress, ctx: CancellationToken) -> Result<(), SourceError> {
        let mut attempt: u32 = 0;

        loop {
            if ctx.is_cancelled() {
                return Ok(());
            }

            match self.session(&feed, &ctx).await {
                Ok(SessionEnd::Cancelled) => return Ok(()),
                Ok(SessionEnd::Lost) => {
                    // A live session means the endpoint works; pace from the start.
                    attempt = 0;
                }
                Err(err) => {
                    if !err.is_retryable() {
                        return Err(err);
                    }
                }
            }

            let delay = self.cfg.reconnect.next(attempt);
            attempt = attempt.saturating_add(1);

            tokio::select! {
                _ = ctx.cancelled() => return Ok(()),
                _ = time::sleep(delay) => {}
            }
        }
    }
}

/// Maps a handshake failure onto [`SourceError`].
///
/// URL problems are permanent; everything else is worth redialing.
fn classify_dial_error(err: tungstenite::Error) -> SourceError {
    match err {
        tungstenite::Error::Url(url) => SourceError::Endpoint {
            error: url.to_string(),
        },
        other => SourceError::Connect {
            error: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = WsConfig::default();
        assert_eq!(cfg.event, "sale_created");
        assert!(cfg.endpoint.starts_with("ws://"));
        assert_eq!(cfg.reconnect.jitter, JitterPolicy::Equal);
    }

    #[test]
    fn test_dial_error_classification() {
        let bad_url = classify_dial_error(tungstenite::Error::Url(
            tungstenite::error::UrlError::UnsupportedUrlScheme,
        ));
        assert!(!bad_url.is_retryable());
        assert_eq!(bad_url.as_label(), "source_endpoint");

        let io = classify_dial_error(tungstenite::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(io.is_retryable());
        assert_eq!(io.as_label(), "source_connect");
    }
}
