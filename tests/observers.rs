//! Observer semantics: initial snapshots, subscription lifecycle, delivery
//! order, and fault isolation (panics, overflow).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use salert::{
    AlertCue, Config, Ingress, Notifier, Observe, ScriptSource, SourceError, SourceRef, Update,
    UpdateKind,
};

#[derive(Clone, Debug)]
struct Seen {
    seq: u64,
    kind: UpdateKind,
    id: Option<u64>,
    observer: Option<&'static str>,
    reason: Option<String>,
    active_len: usize,
}

#[derive(Default)]
struct Probe {
    seen: Mutex<Vec<Seen>>,
}

impl Probe {
    fn arc() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn snapshot(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn of_kind(&self, kind: UpdateKind) -> Vec<Seen> {
        self.snapshot().into_iter().filter(|s| s.kind == kind).collect()
    }

    fn count(&self, kind: UpdateKind) -> usize {
        self.of_kind(kind).len()
    }
}

#[async_trait]
impl Observe for Probe {
    async fn on_update(&self, update: &Update) {
        self.seen.lock().unwrap().push(Seen {
            seq: update.seq,
            kind: update.kind,
            id: update.id.map(|i| i.as_u64()),
            observer: update.observer,
            reason: update.reason.as_deref().map(str::to_owned),
            active_len: update.active.len(),
        });
    }

    fn name(&self) -> &'static str {
        "probe"
    }

    fn queue_capacity(&self) -> usize {
        256
    }
}

/// Sits on every update long enough to back its tiny queue up.
struct Sloth;

#[async_trait]
impl Observe for Sloth {
    async fn on_update(&self, _update: &Update) {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    fn name(&self) -> &'static str {
        "sloth"
    }

    fn queue_capacity(&self) -> usize {
        1
    }
}

fn idle_source() -> SourceRef {
    ScriptSource::arc("idle", |_feed: Ingress, ctx: CancellationToken| async move {
        ctx.cancelled().await;
        Ok::<_, SourceError>(())
    })
}

fn cfg(ttl_ms: u64) -> Config {
    Config {
        ttl: Duration::from_millis(ttl_ms),
        ..Config::default()
    }
}

async fn wait_until(mut cond: impl FnMut() -> bool, what: &str) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test]
async fn test_late_subscriber_gets_snapshot_before_anything_else() {
    let notifier = Notifier::builder(cfg(5_000)).spawn(idle_source());

    notifier.ingest(json!({"n": 1}));
    notifier.ingest(json!({"n": 2}));
    wait_until_active(&notifier, 2).await;

    let probe = Probe::arc();
    let _sub = notifier.subscribe(probe.clone());

    wait_until(|| !probe.snapshot().is_empty(), "the initial update").await;
    let first = &probe.snapshot()[0];
    assert_eq!(first.kind, UpdateKind::Subscribed);
    assert_eq!(first.id, None);
    assert_eq!(first.active_len, 2);

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_builder_observer_sees_the_feed_from_the_start() {
    let probe = Probe::arc();
    let feed = ScriptSource::arc("one-shot", |feed: Ingress, _ctx: CancellationToken| async move {
        feed.connected();
        feed.event(json!({"product": "mug"}));
        Ok::<_, SourceError>(())
    });
    let notifier = Notifier::builder(cfg(5_000))
        .with_observer(probe.clone())
        .spawn(feed);

    wait_until(|| probe.count(UpdateKind::Added) == 1, "the addition").await;

    // Registration happens before the source starts, so the observer sees
    // the empty initial snapshot, then the connect edge, then the sale.
    let kinds: Vec<_> = probe.snapshot().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            UpdateKind::Subscribed,
            UpdateKind::SourceConnected,
            UpdateKind::Added,
        ]
    );
    assert_eq!(probe.snapshot()[0].active_len, 0);

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_builder_registers_a_batch_of_observers() {
    let first = Probe::arc();
    let second = Probe::arc();
    let notifier = Notifier::builder(cfg(5_000))
        .with_observers(vec![first.clone(), second.clone()])
        .spawn(idle_source());

    notifier.ingest(json!({"n": 1}));

    // Every observer in the batch gets its empty initial snapshot, then the
    // same feed as any singly-registered observer.
    for probe in [&first, &second] {
        wait_until(|| probe.count(UpdateKind::Added) == 1, "the addition").await;
        let kinds: Vec<_> = probe.snapshot().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![UpdateKind::Subscribed, UpdateKind::Added]);
        assert_eq!(probe.snapshot()[0].active_len, 0);
    }

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let leaver = Probe::arc();
    let stayer = Probe::arc();
    let notifier = Notifier::builder(cfg(5_000))
        .with_observer(stayer.clone())
        .spawn(idle_source());

    let sub = notifier.subscribe(leaver.clone());
    notifier.ingest(json!({"n": 1}));
    wait_until(|| leaver.count(UpdateKind::Added) == 1, "delivery to both").await;

    sub.unsubscribe();
    notifier.ingest(json!({"n": 2}));

    wait_until(|| stayer.count(UpdateKind::Added) == 2, "the second addition").await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(leaver.count(UpdateKind::Added), 1, "no delivery past unsubscribe");

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_panicking_cue_is_isolated_and_reported() {
    let probe = Probe::arc();
    let cue = Arc::new(AlertCue::new(|_n: &salert::Notification| {
        panic!("cue failed");
    }));
    let notifier = Notifier::builder(cfg(5_000))
        .with_observer(probe.clone())
        .with_observer(cue)
        .spawn(idle_source());

    let id = notifier.ingest(json!({"product": "mug"}));

    // The cue's panic is contained in its worker and surfaced as an update.
    wait_until(
        || probe.count(UpdateKind::ObserverPanicked) == 1,
        "the panic report",
    )
    .await;
    let report = &probe.of_kind(UpdateKind::ObserverPanicked)[0];
    assert_eq!(report.observer, Some("alert-cue"));
    assert!(report.reason.as_deref().unwrap().contains("cue failed"));

    // Set and delivery shrug it off: the notification is live, and further
    // traffic reaches everyone (the cue panics again, once per sale).
    let active = notifier.active().await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);

    notifier.ingest(json!({"product": "tee"}));
    wait_until(|| probe.count(UpdateKind::Added) == 2, "the second addition").await;
    wait_until(
        || probe.count(UpdateKind::ObserverPanicked) == 2,
        "the second panic report",
    )
    .await;

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_slow_observer_overflows_without_slowing_others() {
    let probe = Probe::arc();
    let notifier = Notifier::builder(cfg(5_000))
        .with_observer(probe.clone())
        .with_observer(Arc::new(Sloth))
        .spawn(idle_source());

    for n in 1..=4 {
        notifier.ingest(json!({"n": n}));
    }

    // The fast observer gets all four immediately; the backed-up one is
    // reported by name instead of stalling the dispatch.
    wait_until(|| probe.count(UpdateKind::Added) == 4, "four additions").await;
    wait_until(
        || {
            probe
                .of_kind(UpdateKind::ObserverOverflow)
                .iter()
                .any(|s| s.observer == Some("sloth"))
        },
        "the overflow report",
    )
    .await;

    let report = probe
        .of_kind(UpdateKind::ObserverOverflow)
        .into_iter()
        .find(|s| s.observer == Some("sloth"))
        .unwrap();
    assert_eq!(report.reason.as_deref(), Some("full"));

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_updates_arrive_in_order_with_rising_seq() {
    let probe = Probe::arc();
    let notifier = Notifier::builder(cfg(5_000))
        .with_observer(probe.clone())
        .spawn(idle_source());

    let ids: Vec<_> = (1..=5)
        .map(|n| notifier.ingest(json!({"n": n})).as_u64())
        .collect();

    wait_until(|| probe.count(UpdateKind::Added) == 5, "five additions").await;

    let seen = probe.snapshot();
    assert_eq!(seen[0].kind, UpdateKind::Subscribed);
    let added: Vec<_> = seen
        .iter()
        .filter(|s| s.kind == UpdateKind::Added)
        .filter_map(|s| s.id)
        .collect();
    assert_eq!(added, ids);

    for pair in seen.windows(2) {
        assert!(pair[0].seq < pair[1].seq, "per-observer order follows seq");
    }

    notifier.shutdown().await;
}

async fn wait_until_active(notifier: &Notifier, n: usize) {
    for _ in 0..200 {
        if notifier.active().await.len() == n {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("timed out waiting for {n} active notifications");
}
