//! Typed views over a [`KvStore`]

use super::{KvStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

fn encode<T: Serialize>(namespace: &'static str, value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|source| StoreError::Encode { namespace, source })
}

fn decode<T: DeserializeOwned>(namespace: &'static str, bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|source| StoreError::Decode { namespace, source })
}

/// Singleton value stored under a one-byte key
pub struct Item<T> {
    prefix: u8,
    namespace: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Item<T> {
    pub const fn new(prefix: u8, namespace: &'static str) -> Self {
        Self {
            prefix,
            namespace,
            _value: PhantomData,
        }
    }

    pub fn get<S: KvStore + ?Sized>(&self, store: &S) -> Result<Option<T>, StoreError> {
        store
            .get(&[self.prefix])?
            .map(|bytes| decode(self.namespace, &bytes))
            .transpose()
    }

    pub fn set<S: KvStore + ?Sized>(&self, store: &mut S, value: &T) -> Result<(), StoreError> {
        store.set(&[self.prefix], encode(self.namespace, value)?)
    }
}

/// String-keyed table stored under a one-byte namespace prefix
pub struct Map<T> {
    prefix: u8,
    namespace: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Map<T> {
    pub const fn new(prefix: u8, namespace: &'static str) -> Self {
        Self {
            prefix,
            namespace,
            _value: PhantomData,
        }
    }

    fn key(&self, key: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + key.len());
        out.push(self.prefix);
        out.extend_from_slice(key.as_bytes());
        out
    }

    pub fn get<S: KvStore + ?Sized>(&self, store: &S, key: &str) -> Result<Option<T>, StoreError> {
        store
            .get(&self.key(key))?
            .map(|bytes| decode(self.namespace, &bytes))
            .transpose()
    }

    pub fn set<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        store.set(&self.key(key), encode(self.namespace, value)?)
    }

    pub fn remove<S: KvStore + ?Sized>(&self, store: &mut S, key: &str) -> Result<(), StoreError> {
        store.delete(&self.key(key))
    }

    /// Every entry in key order
    pub fn entries<S: KvStore + ?Sized>(&self, store: &S) -> Result<Vec<(String, T)>, StoreError> {
        store
            .scan_prefix(&[self.prefix])?
            .into_iter()
            .map(|(raw_key, bytes)| {
                let key = String::from_utf8(raw_key[1..].to_vec()).map_err(|_| {
                    StoreError::InvalidKey {
                        namespace: self.namespace,
                    }
                })?;
                Ok((key, decode(self.namespace, &bytes)?))
            })
            .collect()
    }
}
