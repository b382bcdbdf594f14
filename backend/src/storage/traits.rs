//! # Storage Traits
//!
//! This module defines the storage port that allows different persistence
//! substrates to be used interchangeably underneath the repositories.

use anyhow::Result;

/// Textual key-value substrate holding one serialized table per key.
///
/// Implementations only need to store and return strings; they know nothing
/// about rows or tables. Swapping the in-memory store for the file store
/// changes no repository or service logic.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
