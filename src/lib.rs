//! # Listing Watch SDK
//!
//! Watches a marketplace listings feed for one digital-collectible
//! collection and raises a notification the first time a listing matches a
//! user-defined trait filter and price ceiling.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use listing_watch_sdk::{kv::FileKvStore, FilterConfig, ListingWatcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let kv = Arc::new(FileKvStore::new("./watch-state"));
//! let watcher = ListingWatcher::with_defaults(kv).await?;
//!
//! watcher
//!     .set_filter(FilterConfig::new("Clothing", "Saudi", "200"))
//!     .await;
//! watcher.start().await;
//!
//! // ... later
//! for alert in watcher.alerts().await {
//!     println!("#{:?} at {}", alert.token_id, alert.price);
//! }
//! watcher.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ListingWatcher::start()
//!     ↓
//! Polling loop (one cycle every 30s, cycles never overlap)
//!     ↓
//! ListingFeed (Magic Eden)  →  normalize  →  filter  →  SeenLedger
//!     ↓ (new match)
//! AlertStore (bounded history, persisted via KvStore)  +  Notifier
//! ```
//!
//! ## Error handling
//!
//! Recoverable failures are absorbed at the smallest scope: a malformed
//! field degrades to a default, a malformed record never aborts its batch,
//! and a failed fetch aborts only that cycle (the next tick retries). The
//! watcher never stops polling on its own.

pub mod constants;
pub mod error;
pub mod feed;
pub mod feeds;
pub mod filter;
pub mod history;
pub mod kv;
pub mod ledger;
pub mod metrics;
pub mod normalize;
pub mod notify;
pub mod types;
pub mod watcher;

// Re-export commonly used types
pub use error::{FeedError, StoreError, WatchError};
pub use feed::ListingFeed;
pub use kv::KvStore;
pub use metrics::WatchMetrics;
pub use notify::Notifier;
pub use types::{Alert, ComponentHealth, FilterConfig, HealthStatus, Listing};
pub use watcher::ListingWatcher;
