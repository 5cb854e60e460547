//! # Store Collaborator — Transactional Key-Value Contract
//!
//! The host ledger owns persistence. Registries in `ssi-did` and `ssi-vc`
//! see it only through [`KvStore`]: get, set, delete and iterate by prefix.
//!
//! ## Commit boundary
//!
//! Every mutating registry operation stages its writes in a [`CacheStore`]
//! layered over the underlying store and calls [`CacheStore::commit()`] only
//! after all validation has passed. Dropping the cache without committing
//! discards the staged writes, so a failed operation never leaves a partial
//! mutation behind.
//!
//! ## Key layout
//!
//! | Entity                | Key                       |
//! |-----------------------|---------------------------|
//! | DID document          | `0x61 ‖ utf8(DID)`        |
//! | DID metadata          | `0x62 ‖ utf8(DID)`        |
//! | Verifiable credential | `0x63 ‖ utf8(credential)` |
//! | Credential metadata   | `0x64 ‖ utf8(credential)` |
//!
//! Values are JSON.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the store collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached. The only retryable error
    /// class; callers decide whether to resubmit.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be encoded or decoded.
    #[error("store codec error for key {key}: {reason}")]
    Codec {
        /// Hex rendering of the offending key.
        key: String,
        /// Underlying serde error.
        reason: String,
    },
}

/// Key prefixes for every persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StorePrefix {
    /// DID documents.
    DidDocument = 0x61,
    /// DID metadata.
    DidMetadata = 0x62,
    /// Verifiable credentials.
    Credential = 0x63,
    /// Credential metadata.
    CredentialMetadata = 0x64,
}

impl StorePrefix {
    /// The single prefix byte.
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Full store key for `id`: the prefix byte followed by the UTF-8 id.
    pub fn key(self, id: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + id.len());
        key.push(self.byte());
        key.extend_from_slice(id.as_bytes());
        key
    }
}

/// Transactional key-value store owned by the host.
pub trait KvStore {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value.
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Returns true if `key` holds a value.
    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        (**self).iter_prefix(prefix)
    }
}

/// Decode the JSON value stored under `key`, if any.
pub fn load<T: DeserializeOwned>(
    store: &impl KvStore,
    key: &[u8],
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| codec_error(key, e)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and stage it under `key`.
pub fn save<T: Serialize>(
    store: &mut impl KvStore,
    key: &[u8],
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value).map_err(|e| codec_error(key, e))?;
    store.set(key, bytes)
}

/// Decode every JSON value under `prefix`.
pub fn load_prefix<T: DeserializeOwned>(
    store: &impl KvStore,
    prefix: StorePrefix,
) -> Result<Vec<T>, StoreError> {
    store
        .iter_prefix(&[prefix.byte()])?
        .into_iter()
        .map(|(key, bytes)| serde_json::from_slice(&bytes).map_err(|e| codec_error(&key, e)))
        .collect()
}

fn codec_error(key: &[u8], e: serde_json::Error) -> StoreError {
    StoreError::Codec {
        key: hex::encode(key),
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Ordered in-memory store for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        Ok(self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// CacheStore
// ---------------------------------------------------------------------------

/// Write-buffering layer over a parent store.
///
/// Reads see staged writes. Nothing reaches the parent until
/// [`CacheStore::commit()`].
#[derive(Debug)]
pub struct CacheStore<'a, S: KvStore + ?Sized> {
    parent: &'a mut S,
    // `None` marks a staged delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> CacheStore<'a, S> {
    /// Open a cache over `parent`.
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            pending: BTreeMap::new(),
        }
    }

    /// Flush every staged write to the parent store.
    pub fn commit(mut self) -> Result<(), StoreError> {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for (key, value) in pending {
            match value {
                Some(v) => self.parent.set(&key, v)?,
                None => self.parent.delete(&key)?,
            }
        }
        tracing::trace!(writes = count, "store cache committed");
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for CacheStore<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.pending.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.pending.insert(key.to_vec(), None);
        Ok(())
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.iter_prefix(prefix)?.into_iter().collect();
        for (key, value) in self
            .pending
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(v) => {
                    merged.insert(key.clone(), v.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}
