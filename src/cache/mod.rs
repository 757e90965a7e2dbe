//! Bounded evaluation cache keyed by normalized position.
//!
//! Entries are evicted oldest-inserted first once the bound is exceeded.
//! Overwriting a key replaces its value but keeps its original insertion slot.
//! When opened with a path, every `put` hands a snapshot of the full cache to a
//! background writer; persistence failures are logged and never surface here.

pub mod key;
mod snapshot;

use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::eval::EvalResult;
use snapshot::{SnapshotRef, SnapshotStore};

pub use key::{normalize, PositionKey};

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug)]
pub struct EvalCache {
    entries: HashMap<PositionKey, EvalResult>,
    order: VecDeque<PositionKey>,
    capacity: usize,
    store: Option<SnapshotStore>,
}

impl Default for EvalCache {
    fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl EvalCache {
    /// In-memory cache, nothing is persisted.
    pub fn new(capacity: usize) -> Self {
        Self { entries: HashMap::new(), order: VecDeque::new(), capacity: capacity.max(1), store: None }
    }

    /// Seeds from the snapshot at `path` (missing or corrupt means empty) and persists to it.
    pub fn open<P: Into<PathBuf>>(path: P, capacity: usize) -> Self {
        let path = path.into();
        let mut cache = Self::new(capacity);
        for (k, v) in snapshot::read_snapshot(&path) { cache.insert(k, v); }
        info!("analysis cache: {} entries from {}", cache.len(), path.display());
        cache.store = Some(SnapshotStore::new(path));
        cache
    }

    pub fn capacity(&self) -> usize { self.capacity }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn path(&self) -> Option<&Path> { self.store.as_ref().map(|s| s.path()) }

    pub fn get(&self, key: &PositionKey) -> Option<&EvalResult> { self.entries.get(key) }

    pub fn contains(&self, key: &PositionKey) -> bool { self.entries.contains_key(key) }

    /// Lookup by full FEN.
    pub fn lookup(&self, fen: &str) -> Option<&EvalResult> { self.get(&normalize(fen)) }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> impl Iterator<Item = &PositionKey> { self.order.iter() }

    pub fn put(&mut self, key: PositionKey, result: EvalResult) {
        self.insert(key, result);
        self.persist();
    }

    /// Stores under the normalized form of a full FEN.
    pub fn put_fen(&mut self, fen: &str, result: EvalResult) { self.put(normalize(fen), result); }

    fn insert(&mut self, key: PositionKey, result: EvalResult) {
        if self.entries.insert(key.clone(), result).is_none() {
            self.order.push_back(key);
        }
        while self.order.len() > self.capacity {
            if let Some(old) = self.order.pop_front() {
                self.entries.remove(&old);
                debug!("analysis cache evicted {}", old);
            }
        }
    }

    /// JSON snapshot of the current contents, oldest first.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let entries = self.order.iter().filter_map(|k| self.entries.get(k).map(|v| (k, v))).collect();
        Ok(serde_json::to_vec(&SnapshotRef(entries))?)
    }

    fn persist(&mut self) {
        if self.store.is_none() { return; }
        let bytes = match self.to_json() {
            Ok(b) => b,
            Err(e) => { warn!("failed to encode analysis cache: {}", e); return; }
        };
        if let Some(store) = self.store.as_mut() { store.persist(bytes); }
    }
}
