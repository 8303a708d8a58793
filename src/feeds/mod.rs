//! Marketplace feed implementations

pub mod magiceden;

pub use magiceden::MagicEdenFeed;
