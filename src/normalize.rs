//! Listing normalizer
//!
//! Maps an arbitrary upstream listing record into a canonical [`Listing`].
//! Upstream responses nest fields differently depending on the endpoint
//! version, so each field is read through an ordered table of alternative
//! spellings. Malformed fields degrade to defaults; normalization never
//! fails, so one bad record cannot abort a batch.

use serde_json::Value;

use crate::types::Listing;

/// Alternative field names for the token identifier, in priority order
const TOKEN_ID_FIELDS: &[&str] = &["tokenId", "tokenMint", "token", "itemId"];

/// Alternative containers for the trait metadata, in priority order
/// (falling back to the record itself)
const METADATA_FIELDS: &[&str] = &["extra", "metadata"];

/// Alternative keys for the nested trait list
const TRAIT_LIST_FIELDS: &[&str] = &["attributes", "traits"];

/// Alternative keys for a trait entry's name
const TRAIT_NAME_KEYS: &[&str] = &["trait_type", "traitType", "type"];

/// Alternative keys for a trait entry's value
const TRAIT_VALUE_KEYS: &[&str] = &["value", "val", "trait_value"];

/// Smallest-native-unit price field used when no plain price is present
const LAMPORTS_FIELD: &str = "priceInLamports";

/// Normalizes one raw feed record into a canonical listing
pub fn normalize(raw: &Value) -> Listing {
    Listing {
        token_id: first_text(raw, TOKEN_ID_FIELDS),
        price: extract_price(raw),
        seller: raw.get("seller").and_then(coerce_text),
        attributes: extract_attributes(raw),
    }
}

/// Stable deduplication key for a listing
///
/// The feed-provided `listingId` when present, else
/// `"{token_id}-{seller}"` with `"s"` standing in for a missing seller.
/// An absent token id renders as `"null"` so that ids stay stable across
/// histories persisted by earlier versions of the watcher.
pub fn listing_id(raw: &Value, listing: &Listing) -> String {
    if let Some(id) = raw.get("listingId").and_then(coerce_text) {
        return id;
    }
    format!(
        "{}-{}",
        listing.token_id.as_deref().unwrap_or("null"),
        listing.seller.as_deref().unwrap_or("s"),
    )
}

/// Returns the first present field from `fields` coerced to text
fn first_text(raw: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| raw.get(*field).and_then(coerce_text))
}

/// Coerces a scalar JSON value to text (None for null, arrays, objects)
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extracts the listed price
///
/// A numeric `price` field wins; a numeric-string `price` is parsed; else
/// the smallest-native-unit field is used. Malformed data degrades to 0.0.
fn extract_price(raw: &Value) -> f64 {
    match raw.get("price") {
        Some(Value::Number(n)) => return n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            if let Ok(price) = s.trim().parse::<f64>() {
                return price;
            }
        }
        _ => {}
    }

    match raw.get(LAMPORTS_FIELD) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Extracts trait (name, value) pairs from whichever container holds them
fn extract_attributes(raw: &Value) -> Vec<(String, String)> {
    let metadata = METADATA_FIELDS
        .iter()
        .find_map(|field| raw.get(*field).filter(|v| v.is_object()))
        .unwrap_or(raw);

    let entries = TRAIT_LIST_FIELDS
        .iter()
        .find_map(|field| metadata.get(*field).and_then(Value::as_array));

    let Some(entries) = entries else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| {
            let name = first_text(entry, TRAIT_NAME_KEYS).unwrap_or_default();
            let value = first_text(entry, TRAIT_VALUE_KEYS).unwrap_or_default();
            (name, value)
        })
        .collect()
}
