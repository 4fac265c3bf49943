//! # Example: scripted_feed
//!
//! Drives a notifier from a scripted source, no network required.
//!
//! Shows how to:
//! - Implement the [`Observe`] trait for a console renderer.
//! - Feed sales through a [`ScriptSource`].
//! - Ingest and dismiss notifications by hand.
//!
//! ## Flow
//! ```text
//! ScriptSource ──► Ingress ──► Notifier (actor)
//!                                  ├─► timers (ttl = 1500ms)
//!                                  ├─► ConsoleObserver.on_update()
//!                                  └─► AlertCue (prints a ding)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example scripted_feed
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use salert::{
    AlertCue, Config, Ingress, Notifier, Observe, ScriptSource, SourceError, Update, UpdateKind,
};

/// Console renderer: one line per update, plus the surviving set.
struct ConsoleObserver;

#[async_trait::async_trait]
impl Observe for ConsoleObserver {
    async fn on_update(&self, update: &Update) {
        let products: Vec<_> = update
            .active
            .iter()
            .map(|n| n.payload["product"].as_str().unwrap_or("?").to_owned())
            .collect();

        match update.kind {
            UpdateKind::Subscribed => {
                println!("[obs] watching ({} already active)", update.active.len());
            }
            UpdateKind::Added => {
                let sale = update.subject().expect("added updates carry their sale");
                println!(
                    "[obs] sale:      {} for {} by {} | showing {:?}",
                    sale.payload["product"], sale.payload["amount"], sale.payload["user"], products
                );
            }
            UpdateKind::Expired => {
                println!("[obs] expired:   id={} | showing {:?}", fmt_id(update), products);
            }
            UpdateKind::Dismissed => {
                println!("[obs] dismissed: id={} | showing {:?}", fmt_id(update), products);
            }
            UpdateKind::Evicted => {
                println!("[obs] evicted:   id={} | showing {:?}", fmt_id(update), products);
            }
            UpdateKind::SourceConnected => println!("[obs] feed up"),
            UpdateKind::SourceDisconnected => {
                println!(
                    "[obs] feed down: {}",
                    update.reason.as_deref().unwrap_or("<none>")
                );
            }
            UpdateKind::ObserverOverflow | UpdateKind::ObserverPanicked => {
                println!(
                    "[obs] fault:     observer={} reason={}",
                    update.observer.unwrap_or("<unknown>"),
                    update.reason.as_deref().unwrap_or("<none>")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

fn fmt_id(update: &Update) -> String {
    update
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "<none>".to_owned())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("scripted_feed demo\n");

    let replay = ScriptSource::arc(
        "storefront-replay",
        |feed: Ingress, ctx: CancellationToken| async move {
            feed.connected();
            for (product, amount, user) in [
                ("mug", 12.5, "ada"),
                ("tee", 30.0, "kim"),
                ("poster", 14.0, "lou"),
            ] {
                if ctx.is_cancelled() {
                    return Ok(());
                }
                feed.event(json!({"product": product, "amount": amount, "user": user}));
                tokio::time::sleep(Duration::from_millis(400)).await;
            }
            Ok::<_, SourceError>(())
        },
    );

    let cfg = Config {
        ttl: Duration::from_millis(1500),
        max_active: 4,
    };
    let notifier = Notifier::builder(cfg)
        .with_observer(Arc::new(ConsoleObserver))
        .with_observer(Arc::new(AlertCue::new(|n: &salert::Notification| {
            println!("[cue] ding! sale #{}", n.id);
        })))
        .spawn(replay);

    // Let the replay land a couple of sales first.
    tokio::time::sleep(Duration::from_millis(700)).await;

    // Manual path: ingest one and change our mind right away.
    let id = notifier.ingest(json!({"product": "sticker", "amount": 2.0, "user": "pat"}));
    tokio::time::sleep(Duration::from_millis(300)).await;
    notifier.dismiss(id);

    // Wait out the remaining timers.
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!("\nstill active at the end: {}", notifier.active().await.len());

    notifier.shutdown().await;
    println!("finished");
    Ok(())
}
