//! # Example: sale_feed
//!
//! Connects to a live WebSocket sale feed and renders notifications until
//! interrupted.
//!
//! Shows how to:
//! - Wire a [`WsSource`] with its reconnect pacing.
//! - Attach the built-in [`LogWriter`] plus a sound-style [`AlertCue`].
//! - Shut down cleanly on ctrl-c.
//!
//! ## Flow
//! ```text
//! ws://…/ws ──► WsSource ──► Ingress ──► Notifier (actor)
//!                                            ├─► timers (ttl = 5s)
//!                                            ├─► LogWriter.on_update()
//!                                            └─► AlertCue (prints a ding)
//! ```
//!
//! The feed is any server pushing JSON text frames shaped like:
//! ```json
//! {"event": "sale_created", "data": {"product": "mug", "amount": 12.5, "user": "ada"}}
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! cargo run --example sale_feed --features logging
//! SALE_FEED_URL=ws://localhost:9001/ws cargo run --example sale_feed --features logging
//! ```

use std::sync::Arc;

use salert::{AlertCue, Config, LogWriter, Notifier, WsConfig, WsSource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let endpoint =
        std::env::var("SALE_FEED_URL").unwrap_or_else(|_| "ws://127.0.0.1:8000/ws".to_owned());
    println!("sale_feed demo: watching {endpoint} (ctrl-c to stop)\n");

    let source = WsSource::arc(WsConfig {
        endpoint,
        ..WsConfig::default()
    });

    let notifier = Notifier::builder(Config::default())
        .with_observer(Arc::new(LogWriter))
        .with_observer(Arc::new(AlertCue::new(|n: &salert::Notification| {
            println!("[cue] ding! sale #{}", n.id);
        })))
        .spawn(source);

    tokio::signal::ctrl_c().await?;
    println!("\nshutting down");
    notifier.shutdown().await;
    Ok(())
}
