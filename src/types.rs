//! Types for the listing watcher

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THRESHOLD, DEFAULT_TRAIT_NAME, DEFAULT_TRAIT_VALUE};

/// A single marketplace offer, normalized from a raw feed record
///
/// Transient: rebuilt from the feed snapshot every poll cycle and never
/// mutated once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Token identifier, if the feed provided one under any known field
    pub token_id: Option<String>,

    /// Listed price in the feed's native currency (degrades to 0.0 on
    /// malformed price data)
    pub price: f64,

    /// Seller address, if present
    pub seller: Option<String>,

    /// Trait (name, value) pairs, compared case-insensitively downstream
    pub attributes: Vec<(String, String)>,
}

/// An alert raised for a listing that first satisfied the filter
///
/// Created exactly once per distinct listing id; immutable after creation.
/// Serialized with the same camelCase keys the persisted history has always
/// used, so histories written by earlier versions load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub token_id: Option<String>,
    pub price: f64,
    pub seller: Option<String>,
    /// Deduplication key, see [`crate::normalize::listing_id`]
    pub listing_id: String,
    /// When the alert was raised
    pub time: DateTime<Utc>,
}

impl Alert {
    /// Creates an alert for a matching listing, timestamped now
    pub fn new(listing: &Listing, listing_id: String) -> Self {
        Self {
            token_id: listing.token_id.clone(),
            price: listing.price,
            seller: listing.seller.clone(),
            listing_id,
            time: Utc::now(),
        }
    }
}

/// User-configurable trait + price filter
///
/// The threshold is kept as the raw user text; parsing happens at
/// evaluation time so malformed input never blocks a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Trait name to match (case-insensitive)
    pub trait_name: String,

    /// Trait value to match (case-insensitive)
    pub trait_value: String,

    /// Price ceiling as entered by the user
    pub threshold: String,
}

impl FilterConfig {
    /// Creates a filter config
    pub fn new(
        trait_name: impl Into<String>,
        trait_value: impl Into<String>,
        threshold: impl Into<String>,
    ) -> Self {
        Self {
            trait_name: trait_name.into(),
            trait_value: trait_value.into(),
            threshold: threshold.into(),
        }
    }

    /// Price ceiling to evaluate against
    ///
    /// Parses the configured threshold text, substituting
    /// [`DEFAULT_THRESHOLD`] when the text is not a number.
    pub fn effective_threshold(&self) -> f64 {
        self.threshold
            .trim()
            .parse::<f64>()
            .unwrap_or(DEFAULT_THRESHOLD)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            trait_name: DEFAULT_TRAIT_NAME.to_string(),
            trait_value: DEFAULT_TRAIT_VALUE.to_string(),
            threshold: DEFAULT_THRESHOLD.to_string(),
        }
    }
}

/// Overall watcher health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Watcher is monitoring with fresh successful cycles
    Healthy,
    /// Watcher is degraded but still polling
    Degraded,
    /// Watcher has no successful cycles to report
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_parses_numeric_text() {
        let filter = FilterConfig::new("Clothing", "Saudi", "150.5");
        assert_eq!(filter.effective_threshold(), 150.5);
    }

    #[test]
    fn threshold_falls_back_on_garbage() {
        let filter = FilterConfig::new("Clothing", "Saudi", "abc");
        assert_eq!(filter.effective_threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn alert_round_trips_camel_case() {
        let listing = Listing {
            token_id: Some("1234".to_string()),
            price: 42.0,
            seller: Some("0xabc".to_string()),
            attributes: vec![],
        };
        let alert = Alert::new(&listing, "lst-1".to_string());
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["tokenId"], "1234");
        assert_eq!(json["listingId"], "lst-1");

        let back: Alert = serde_json::from_value(json).unwrap();
        assert_eq!(back.listing_id, alert.listing_id);
        assert_eq!(back.price, 42.0);
    }
}
