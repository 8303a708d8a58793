//! Magic Eden listings feed implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::constants::{MAGICEDEN_API_URL, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::FeedError;
use crate::feed::ListingFeed;

/// Magic Eden listings feed
///
/// Unauthenticated, unpaginated: one GET per cycle against the
/// per-collection listings endpoint.
pub struct MagicEdenFeed {
    client: Client,
    base_url: String,
}

impl MagicEdenFeed {
    /// Creates a new Magic Eden feed
    pub fn new() -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FeedError::NetworkError)?;

        Ok(Self {
            client,
            base_url: MAGICEDEN_API_URL.to_string(),
        })
    }

    /// Creates a feed against a custom base URL (testing, mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FeedError> {
        let mut feed = Self::new()?;
        feed.base_url = base_url.into();
        Ok(feed)
    }

    /// Builds the listings URL for a collection
    fn build_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/listings", self.base_url, collection)
    }
}

/// Extracts the listings array from a response body
///
/// The endpoint has returned both a bare array and an object carrying the
/// array under `listings`; both shapes are accepted.
fn extract_listings(body: Value) -> Result<Vec<Value>, FeedError> {
    match body {
        Value::Array(listings) => Ok(listings),
        Value::Object(mut obj) => match obj.remove("listings") {
            Some(Value::Array(listings)) => Ok(listings),
            _ => Err(FeedError::InvalidResponse(
                "Object response missing listings array".to_string(),
            )),
        },
        other => Err(FeedError::InvalidResponse(format!(
            "Unexpected response shape: {other}"
        ))),
    }
}

#[async_trait]
impl ListingFeed for MagicEdenFeed {
    async fn fetch_listings(&self, collection: &str) -> Result<Vec<Value>, FeedError> {
        let url = self.build_url(collection);
        tracing::debug!(url = %url, "Fetching listings from Magic Eden");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FeedError::NetworkError)?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(FeedError::RateLimitExceeded);
        }

        // Check for other errors
        if !response.status().is_success() {
            return Err(FeedError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: Value = response.json().await.map_err(FeedError::NetworkError)?;
        let listings = extract_listings(body)?;

        tracing::debug!(count = listings.len(), "Fetched listings snapshot");
        Ok(listings)
    }

    fn feed_name(&self) -> &'static str {
        "magiceden"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_collection_url() {
        let feed = MagicEdenFeed::new().unwrap();
        assert_eq!(
            feed.build_url("steadyteddys"),
            "https://api-mainnet.magiceden.io/v2/collections/steadyteddys/listings"
        );
    }

    #[test]
    fn accepts_bare_array() {
        let listings = extract_listings(json!([{ "tokenId": "1" }, { "tokenId": "2" }])).unwrap();
        assert_eq!(listings.len(), 2);
    }

    #[test]
    fn accepts_wrapped_listings_field() {
        let listings =
            extract_listings(json!({ "listings": [{ "tokenId": "1" }] })).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0]["tokenId"], "1");
    }

    #[test]
    fn rejects_object_without_listings() {
        assert!(extract_listings(json!({ "error": "nope" })).is_err());
    }

    #[test]
    fn rejects_scalar_body() {
        assert!(extract_listings(json!("oops")).is_err());
    }
}
