//! Constants for the listing watcher
//!
//! All configuration for the watcher is centralized here.
//! No runtime configuration (config.yml) is used - the system operates
//! transparently with these compile-time constants.

/// Collection to watch by default
pub const DEFAULT_COLLECTION_SYMBOL: &str = "steadyteddys";

/// Default trait filter: name
pub const DEFAULT_TRAIT_NAME: &str = "Clothing";

/// Default trait filter: value
pub const DEFAULT_TRAIT_VALUE: &str = "Saudi";

/// Price ceiling used when the configured threshold text does not parse
pub const DEFAULT_THRESHOLD: f64 = 200.0;

/// How often to poll the listings feed (in seconds)
pub const POLL_INTERVAL_SECS: u64 = 30;

/// HTTP request timeout when fetching listings (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum number of alerts kept in the persisted history
pub const MAX_ALERT_HISTORY: usize = 200;

/// Key under which the serialized alert history is persisted
pub const ALERTS_KEY: &str = "alerts";

/// Magic Eden API base URL
pub const MAGICEDEN_API_URL: &str = "https://api-mainnet.magiceden.io/v2";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "listing-watch-sdk/0.1.0";
