//! Ledger store
//!
//! The ledger persists through a byte-oriented [`KvStore`]. Typed access goes
//! through [`Item`] (singletons) and [`Map`] (string-keyed tables), which
//! namespace keys with a one-byte prefix and encode values with bincode.
//!
//! Lookups return `Ok(None)` for absent keys; a present key whose value fails
//! to decode is an error, never an absence.

pub mod collections;
pub mod keys;
pub mod memory;

pub use collections::{Item, Map};
pub use memory::MemoryKv;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to decode {namespace} value: {source}")]
    Decode {
        namespace: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to encode {namespace} value: {source}")]
    Encode {
        namespace: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("malformed key in {namespace}")]
    InvalidKey { namespace: &'static str },

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Ordered byte-level key-value persistence
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in key order
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
