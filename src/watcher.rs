//! Listing watcher service
//!
//! Drives the polling loop: fetch a listings snapshot, normalize each
//! record, evaluate the trait/price filter, and raise one alert per
//! never-before-seen matching listing.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::{
    constants::{DEFAULT_COLLECTION_SYMBOL, POLL_INTERVAL_SECS},
    error::WatchError,
    feed::ListingFeed,
    feeds::MagicEdenFeed,
    filter::matches,
    history::AlertStore,
    kv::KvStore,
    ledger::SeenLedger,
    metrics::{MetricsCollector, WatchMetrics},
    normalize::{listing_id, normalize},
    notify::{LogNotifier, Notifier},
    types::{Alert, ComponentHealth, FilterConfig, HealthStatus},
};

/// Mutable session state owned by the watcher: the current filter, the
/// dedup ledger, and the alert history. One lock guards all three, so a
/// cycle holds single-writer access for its full duration.
struct WatchSession {
    filter: FilterConfig,
    ledger: SeenLedger,
    store: AlertStore,
}

/// The armed polling loop plus its disarm signal
struct PollTask {
    _handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Listing watcher
///
/// Polls a marketplace feed for one collection and raises a notification
/// the first time a listing matches the configured trait filter and price
/// ceiling. Idle until [`start`](Self::start) is called.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use listing_watch_sdk::{kv::FileKvStore, ListingWatcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let kv = Arc::new(FileKvStore::new("./watch-state"));
/// let watcher = ListingWatcher::with_defaults(kv).await?;
/// watcher.start().await;
/// # Ok(())
/// # }
/// ```
pub struct ListingWatcher {
    collection: String,
    feed: Arc<dyn ListingFeed>,
    notifier: Arc<dyn Notifier>,
    session: Arc<Mutex<WatchSession>>,
    metrics: Arc<MetricsCollector>,
    poll_task: Mutex<Option<PollTask>>,
}

impl ListingWatcher {
    /// Creates a watcher over the given feed and collaborators
    ///
    /// Loads the persisted alert history, seeds the dedup ledger from it
    /// (alerts shown in a previous session are never re-raised), and runs
    /// the notifier's one-time registration step.
    pub async fn new(
        collection: impl Into<String>,
        feed: Arc<dyn ListingFeed>,
        kv: Arc<dyn KvStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, WatchError> {
        let store = AlertStore::load(kv).await?;
        let mut ledger = SeenLedger::new();
        ledger.seed(store.alerts());
        tracing::info!(
            history = store.len(),
            seen = ledger.len(),
            "Loaded alert history"
        );

        notifier.register().await;

        let metrics = Arc::new(MetricsCollector::new(feed.feed_name()));
        let session = Arc::new(Mutex::new(WatchSession {
            filter: FilterConfig::default(),
            ledger,
            store,
        }));

        Ok(Self {
            collection: collection.into(),
            feed,
            notifier,
            session,
            metrics,
            poll_task: Mutex::new(None),
        })
    }

    /// Creates a watcher for the default collection over the Magic Eden
    /// feed, with notifications going to the tracing pipeline
    pub async fn with_defaults(kv: Arc<dyn KvStore>) -> Result<Self, WatchError> {
        let feed = Arc::new(MagicEdenFeed::new()?);
        Self::new(DEFAULT_COLLECTION_SYMBOL, feed, kv, Arc::new(LogNotifier::new())).await
    }

    /// Starts monitoring
    ///
    /// Runs one cycle immediately so the user gets instant feedback, then
    /// arms a repeating timer at [`POLL_INTERVAL_SECS`]. No-op when
    /// already monitoring. The loop is a single task that awaits each
    /// cycle to completion, so cycles never overlap.
    pub async fn start(&self) {
        let mut task = self.poll_task.lock().await;
        if task.is_some() {
            tracing::debug!("Already monitoring, start ignored");
            return;
        }

        Self::poll_cycle(
            &self.feed,
            &self.notifier,
            &self.session,
            &self.metrics,
            &self.collection,
        )
        .await;

        let feed = self.feed.clone();
        let notifier = self.notifier.clone();
        let session = self.session.clone();
        let metrics = self.metrics.clone();
        let collection = self.collection.clone();
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sleep(Duration::from_secs(POLL_INTERVAL_SECS)) => {
                        Self::poll_cycle(&feed, &notifier, &session, &metrics, &collection).await;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            tracing::debug!("Polling loop stopped");
        });

        *task = Some(PollTask {
            _handle: handle,
            shutdown,
        });

        tracing::info!(
            collection = %self.collection,
            interval_secs = POLL_INTERVAL_SECS,
            feed = self.feed.feed_name(),
            "Started monitoring"
        );
    }

    /// Stops monitoring
    ///
    /// Disarms the timer; a cycle already in flight completes naturally
    /// before the loop exits. No-op when idle.
    pub async fn stop(&self) {
        let mut task = self.poll_task.lock().await;
        match task.take() {
            Some(poll_task) => {
                let _ = poll_task.shutdown.send(true);
                tracing::info!(collection = %self.collection, "Stopped monitoring");
            }
            None => {
                tracing::debug!("Not monitoring, stop ignored");
            }
        }
    }

    /// Returns true while the polling timer is armed
    pub async fn is_monitoring(&self) -> bool {
        self.poll_task.lock().await.is_some()
    }

    /// Replaces the trait/price filter
    ///
    /// Takes effect on the next cycle; an in-flight cycle keeps the
    /// filter it read at its start.
    pub async fn set_filter(&self, filter: FilterConfig) {
        let mut session = self.session.lock().await;
        tracing::info!(
            trait_name = %filter.trait_name,
            trait_value = %filter.trait_value,
            threshold = %filter.threshold,
            "Filter updated"
        );
        session.filter = filter;
    }

    /// Current filter
    pub async fn filter(&self) -> FilterConfig {
        self.session.lock().await.filter.clone()
    }

    /// Snapshot of the alert history, newest first
    pub async fn alerts(&self) -> Vec<Alert> {
        self.session.lock().await.store.alerts().to_vec()
    }

    /// Forces one immediate polling cycle, regardless of monitoring state
    pub async fn poll_now(&self) {
        Self::poll_cycle(
            &self.feed,
            &self.notifier,
            &self.session,
            &self.metrics,
            &self.collection,
        )
        .await;
    }

    /// Current session metrics
    pub async fn metrics(&self) -> WatchMetrics {
        self.metrics.snapshot().await
    }

    /// One polling cycle: fetch, normalize, evaluate, dedup, alert
    ///
    /// Fetch failures abort the cycle with a warning and no state change;
    /// the next tick retries. Listings are never marked seen on a failed
    /// cycle. A malformed record degrades to default field values and
    /// never stops the rest of the batch.
    async fn poll_cycle(
        feed: &Arc<dyn ListingFeed>,
        notifier: &Arc<dyn Notifier>,
        session: &Arc<Mutex<WatchSession>>,
        metrics: &Arc<MetricsCollector>,
        collection: &str,
    ) {
        let start = Instant::now();

        let listings = match feed.fetch_listings(collection).await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::warn!(error = %e, collection, "Fetch failed, retrying next cycle");
                metrics.record_cycle(start.elapsed(), false).await;
                return;
            }
        };

        // Single-writer: the session lock is held for the rest of the cycle
        let mut session = session.lock().await;
        // Filter is read fresh each cycle; mid-cycle updates apply next time
        let filter = session.filter.clone();
        let mut new_alerts = 0u32;

        for raw in &listings {
            let listing = normalize(raw);
            if !matches(&listing, &filter) {
                continue;
            }

            let id = listing_id(raw, &listing);
            if session.ledger.has_seen(&id) {
                continue;
            }
            session.ledger.mark_seen(&id);

            let alert = Alert::new(&listing, id);
            let body = format!(
                "#{} listed at {}",
                alert.token_id.as_deref().unwrap_or("?"),
                alert.price
            );
            tracing::info!(
                listing_id = %alert.listing_id,
                price = alert.price,
                "New matching listing"
            );

            if let Err(e) = session.store.append(alert).await {
                // The alert stays in memory and stays suppressed; only the
                // durable copy is behind
                tracing::warn!(error = %e, "Failed to persist alert history");
            }
            metrics.record_alert().await;
            notifier.notify("Listing matched", &body).await;
            new_alerts += 1;
        }

        metrics.record_cycle(start.elapsed(), true).await;
        tracing::debug!(
            listings = listings.len(),
            new_alerts,
            latency_ms = start.elapsed().as_millis() as u64,
            "Cycle complete"
        );
    }

    /// Perform a health check on the watcher
    pub async fn health_check(&self) -> ComponentHealth {
        let mut details = std::collections::HashMap::new();

        let monitoring = self.is_monitoring().await;
        let metrics = self.metrics.snapshot().await;
        let last_ok = self.metrics.last_cycle_succeeded().await;

        details.insert("monitoring".to_string(), serde_json::json!(monitoring));
        details.insert(
            "cycles_total".to_string(),
            serde_json::json!(metrics.cycles_total),
        );
        details.insert(
            "cycles_failed".to_string(),
            serde_json::json!(metrics.cycles_failed),
        );
        details.insert(
            "alerts_raised".to_string(),
            serde_json::json!(metrics.alerts_raised),
        );
        {
            let session = self.session.lock().await;
            details.insert(
                "history_len".to_string(),
                serde_json::json!(session.store.len()),
            );
            details.insert(
                "seen_ids".to_string(),
                serde_json::json!(session.ledger.len()),
            );
        }

        let all_failed = metrics.cycles_total > 0 && metrics.cycles_failed == metrics.cycles_total;
        let (status, message) = if !monitoring {
            (HealthStatus::Unhealthy, "Watcher is idle".to_string())
        } else if all_failed {
            (
                HealthStatus::Unhealthy,
                format!("All {} recorded cycles failed", metrics.cycles_total),
            )
        } else {
            match last_ok {
                Some(true) => (
                    HealthStatus::Healthy,
                    "Watcher is polling with fresh data".to_string(),
                ),
                Some(false) => (
                    HealthStatus::Degraded,
                    format!("Last cycle failed ({} total failures)", metrics.cycles_failed),
                ),
                None => (
                    HealthStatus::Degraded,
                    "No cycles recorded yet".to_string(),
                ),
            }
        };

        ComponentHealth {
            name: "listing_watcher".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: chrono::Utc::now(),
        }
    }
}
