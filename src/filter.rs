//! Predicate evaluator
//!
//! Decides whether a canonical [`Listing`] satisfies the current filter.
//! Pure and deterministic; threshold parsing never raises (see
//! [`FilterConfig::effective_threshold`]).

use crate::types::{FilterConfig, Listing};

/// Returns true iff the listing carries the configured trait
/// (case-insensitive on both name and value) and its price is at or below
/// the effective threshold
pub fn matches(listing: &Listing, filter: &FilterConfig) -> bool {
    // Full Unicode lowercasing, not just ASCII: trait values like "ÜBER"
    // must match a configured "über"
    let trait_name = filter.trait_name.to_lowercase();
    let trait_value = filter.trait_value.to_lowercase();
    let has_trait = listing.attributes.iter().any(|(name, value)| {
        name.to_lowercase() == trait_name && value.to_lowercase() == trait_value
    });

    has_trait && listing.price <= filter.effective_threshold()
}
