//! Watcher health metrics collection and reporting
//!
//! Tracks cycle latency histograms, fetch success rates, and the number of
//! alerts raised.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Metrics for a watcher session
#[derive(Debug, Clone)]
pub struct WatchMetrics {
    /// Name of the feed
    pub feed_name: String,
    /// 50th percentile cycle latency in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile cycle latency in milliseconds
    pub latency_p99_ms: f64,
    /// Cycle success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of cycles run
    pub cycles_total: u64,
    /// Number of cycles that failed to fetch
    pub cycles_failed: u64,
    /// Total number of alerts raised
    pub alerts_raised: u64,
}

impl WatchMetrics {
    /// Creates metrics with no data
    pub fn empty(feed_name: &str) -> Self {
        Self {
            feed_name: feed_name.to_string(),
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            cycles_total: 0,
            cycles_failed: 0,
            alerts_raised: 0,
        }
    }
}

/// Internal sample for latency tracking
#[derive(Debug, Clone)]
struct CycleSample {
    duration_ms: f64,
    success: bool,
}

/// Collects and computes metrics for a watcher session
pub struct MetricsCollector {
    /// Feed name
    feed_name: String,
    /// Rolling window of cycle samples
    samples: Arc<RwLock<VecDeque<CycleSample>>>,
    /// Total cycles (lifetime)
    cycles_total: Arc<RwLock<u64>>,
    /// Failed cycles (lifetime)
    cycles_failed: Arc<RwLock<u64>>,
    /// Alerts raised (lifetime)
    alerts_raised: Arc<RwLock<u64>>,
}

impl MetricsCollector {
    /// Creates a new metrics collector for a feed
    pub fn new(feed_name: &str) -> Self {
        Self {
            feed_name: feed_name.to_string(),
            samples: Arc::new(RwLock::new(VecDeque::with_capacity(MAX_SAMPLES))),
            cycles_total: Arc::new(RwLock::new(0)),
            cycles_failed: Arc::new(RwLock::new(0)),
            alerts_raised: Arc::new(RwLock::new(0)),
        }
    }

    /// Records one polling cycle with its duration and fetch outcome
    pub async fn record_cycle(&self, duration: Duration, success: bool) {
        let duration_ms = duration.as_secs_f64() * 1000.0;

        {
            let mut total = self.cycles_total.write().await;
            *total += 1;
        }

        if !success {
            let mut failed = self.cycles_failed.write().await;
            *failed += 1;
        }

        {
            let mut samples = self.samples.write().await;
            if samples.len() >= MAX_SAMPLES {
                samples.pop_front();
            }
            samples.push_back(CycleSample {
                duration_ms,
                success,
            });
        }
    }

    /// Records one raised alert
    pub async fn record_alert(&self) {
        let mut raised = self.alerts_raised.write().await;
        *raised += 1;
    }

    /// Outcome of the most recent recorded cycle, if any
    pub async fn last_cycle_succeeded(&self) -> Option<bool> {
        self.samples.read().await.back().map(|s| s.success)
    }

    /// Computes current metrics from collected samples
    pub async fn snapshot(&self) -> WatchMetrics {
        let samples = self.samples.read().await;
        let total = *self.cycles_total.read().await;
        let failed = *self.cycles_failed.read().await;
        let raised = *self.alerts_raised.read().await;

        if samples.is_empty() {
            let mut metrics = WatchMetrics::empty(&self.feed_name);
            metrics.alerts_raised = raised;
            return metrics;
        }

        // Extract successful latencies for percentile calculation
        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let p50 = percentile(&latencies, 50.0);
        let p99 = percentile(&latencies, 99.0);

        let success_rate = if total > 0 {
            (total - failed) as f64 / total as f64
        } else {
            1.0
        };

        WatchMetrics {
            feed_name: self.feed_name.clone(),
            latency_p50_ms: p50,
            latency_p99_ms: p99,
            success_rate,
            cycles_total: total,
            cycles_failed: failed,
            alerts_raised: raised,
        }
    }
}

/// Calculate percentile from sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
    sorted_values[idx.min(sorted_values.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collector_tracks_cycles_and_alerts() {
        let collector = MetricsCollector::new("mock");

        collector.record_cycle(Duration::from_millis(100), true).await;
        collector.record_cycle(Duration::from_millis(200), true).await;
        collector.record_cycle(Duration::from_millis(150), false).await;
        collector.record_alert().await;

        let metrics = collector.snapshot().await;

        assert_eq!(metrics.feed_name, "mock");
        assert_eq!(metrics.cycles_total, 3);
        assert_eq!(metrics.cycles_failed, 1);
        assert_eq!(metrics.alerts_raised, 1);
        assert!(metrics.success_rate > 0.6 && metrics.success_rate < 0.7);
        assert_eq!(collector.last_cycle_succeeded().await, Some(false));
    }

    #[test]
    fn percentile_of_sorted_values() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(percentile(&values, 50.0), 5.0);
        assert_eq!(percentile(&values, 99.0), 10.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }
}
