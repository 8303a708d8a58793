//! Feed abstraction for fetching listing snapshots from marketplaces
//!
//! Records come back as raw JSON values; the normalizer deals with the
//! shape differences between feeds and endpoint versions.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FeedError;

/// Trait for marketplace listing feeds
///
/// Implementations fetch the current listing snapshot for a collection
/// (Magic Eden, OpenSea, etc.)
#[async_trait]
pub trait ListingFeed: Send + Sync {
    /// Fetches the current listing snapshot for a collection
    ///
    /// # Arguments
    /// * `collection` - The collection symbol to fetch listings for
    ///
    /// # Returns
    /// The raw listing records, or an error if the fetch fails
    async fn fetch_listings(&self, collection: &str) -> Result<Vec<Value>, FeedError>;

    /// Returns the name of this feed
    fn feed_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock feed for testing
    ///
    /// Returns scripted responses in order; once the script is exhausted
    /// the last pushed snapshot is repeated (an empty snapshot if none).
    pub struct MockFeed {
        script: Mutex<VecDeque<Result<Vec<Value>, FeedError>>>,
        last_snapshot: Mutex<Vec<Value>>,
        call_count: Mutex<usize>,
    }

    impl Default for MockFeed {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockFeed {
        pub fn new() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                last_snapshot: Mutex::new(Vec::new()),
                call_count: Mutex::new(0),
            }
        }

        /// Queues a successful snapshot
        pub fn push_snapshot(&self, listings: Vec<Value>) {
            *self.last_snapshot.lock().unwrap() = listings.clone();
            self.script.lock().unwrap().push_back(Ok(listings));
        }

        /// Queues a failed fetch
        pub fn push_error(&self, error: FeedError) {
            self.script.lock().unwrap().push_back(Err(error));
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ListingFeed for MockFeed {
        async fn fetch_listings(&self, _collection: &str) -> Result<Vec<Value>, FeedError> {
            *self.call_count.lock().unwrap() += 1;
            match self.script.lock().unwrap().pop_front() {
                Some(response) => response,
                None => Ok(self.last_snapshot.lock().unwrap().clone()),
            }
        }

        fn feed_name(&self) -> &'static str {
            "mock"
        }
    }
}
