//! Alert store
//!
//! Bounded, newest-first append log of alerts. The full (truncated)
//! history is persisted through the key-value collaborator before `append`
//! returns, so a crash right after an append either has the alert durably
//! recorded or not at all.

use std::sync::Arc;

use crate::constants::{ALERTS_KEY, MAX_ALERT_HISTORY};
use crate::error::StoreError;
use crate::kv::KvStore;
use crate::types::Alert;

/// Owner of the persisted alert history
pub struct AlertStore {
    alerts: Vec<Alert>,
    kv: Arc<dyn KvStore>,
}

impl AlertStore {
    /// Loads the persisted history, once, at startup
    ///
    /// An absent blob hydrates an empty history. The result both feeds the
    /// displayed history and seeds the dedup ledger.
    pub async fn load(kv: Arc<dyn KvStore>) -> Result<Self, StoreError> {
        let alerts = match kv.get(ALERTS_KEY).await? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => Vec::new(),
        };
        Ok(Self { alerts, kv })
    }

    /// Prepends an alert, truncates to the most recent
    /// [`MAX_ALERT_HISTORY`], and persists the truncated history
    ///
    /// On persistence failure the in-memory history keeps the alert and
    /// the error propagates; the caller decides whether that is fatal.
    pub async fn append(&mut self, alert: Alert) -> Result<(), StoreError> {
        self.alerts.insert(0, alert);
        self.alerts.truncate(MAX_ALERT_HISTORY);

        let blob = serde_json::to_string(&self.alerts)?;
        self.kv.set(ALERTS_KEY, &blob).await
    }

    /// Current history, newest first
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Number of alerts in the history
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Returns true if no alerts have been recorded
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
