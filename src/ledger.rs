//! Dedup ledger
//!
//! Set of listing ids already alerted on. Seeded once at startup from the
//! persisted alert history so alerts shown in a previous session are never
//! re-raised after a restart. The set only grows during a session; it is
//! deliberately not reconciled against history eviction (once seen, always
//! suppressed for the life of the process).

use std::collections::HashSet;

use crate::types::Alert;

/// In-memory set of listing ids that have already produced an alert
#[derive(Debug, Default)]
pub struct SeenLedger {
    ids: HashSet<String>,
}

impl SeenLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the ledger from persisted alerts
    pub fn seed(&mut self, alerts: &[Alert]) {
        for alert in alerts {
            self.ids.insert(alert.listing_id.clone());
        }
    }

    /// Returns true if the listing id has already been alerted on
    pub fn has_seen(&self, listing_id: &str) -> bool {
        self.ids.contains(listing_id)
    }

    /// Marks a listing id as alerted
    ///
    /// Idempotent; returns true only when the id was newly inserted.
    pub fn mark_seen(&mut self, listing_id: &str) -> bool {
        self.ids.insert(listing_id.to_string())
    }

    /// Number of ids tracked
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no ids have been tracked yet
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Listing;

    fn alert(listing_id: &str) -> Alert {
        let listing = Listing {
            token_id: Some("t1".to_string()),
            price: 1.0,
            seller: None,
            attributes: vec![],
        };
        Alert::new(&listing, listing_id.to_string())
    }

    #[test]
    fn mark_seen_is_idempotent() {
        let mut ledger = SeenLedger::new();
        assert!(ledger.mark_seen("x"));
        assert!(!ledger.mark_seen("x"));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.has_seen("x"));
    }

    #[test]
    fn seed_from_history() {
        let mut ledger = SeenLedger::new();
        ledger.seed(&[alert("a"), alert("b")]);
        assert!(ledger.has_seen("a"));
        assert!(ledger.has_seen("b"));
        assert!(!ledger.has_seen("c"));
        assert_eq!(ledger.len(), 2);
    }
}
