//! # Wire format for WebSocket feeds.
//!
//! Feeds speak newline-free JSON text frames, one envelope per frame:
//!
//! ```json
//! {"event": "sale_created", "data": {"product": "mug", "amount": 12.5, "user": "ada"}}
//! ```
//!
//! The `event` field routes the frame; `data` is carried through opaque and
//! becomes the notification payload. Unknown extra fields are ignored, and a
//! missing `data` defaults to `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One feed frame: an event name plus an opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, e.g. `"sale_created"`.
    pub event: String,
    /// Opaque payload forwarded as the notification payload.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Builds an envelope (mostly useful for test servers and replays).
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Parses a text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
