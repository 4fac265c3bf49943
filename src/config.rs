//! # Global runtime configuration.
//!
//! [`Config`] defines a notifier's behavior: how long notifications live
//! and how large the active set may grow.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use salert::Config;
//!
//! let mut cfg = Config::default();
//! cfg.ttl = Duration::from_secs(3);
//! cfg.max_active = 8;
//!
//! assert_eq!(cfg.max_active, 8);
//! ```

use std::time::Duration;

/// Configuration for a [`Notifier`](crate::Notifier) instance.
///
/// Controls notification lifetime and active-set growth.
#[derive(Clone, Debug)]
pub struct Config {
    /// How long a notification stays active before it expires (applies
    /// uniformly to every notification this instance ingests).
    pub ttl: Duration,
    /// Maximum number of simultaneously active notifications (0 = unlimited).
    ///
    /// When the set is full, ingesting evicts the oldest notification first.
    pub max_active: usize,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `ttl = 5s`
    /// - `max_active = 0` (unlimited)
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(5000),
            max_active: 0,
        }
    }
}
