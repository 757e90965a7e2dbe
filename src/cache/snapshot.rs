//! On-disk snapshot of the evaluation cache: one flat JSON object, key -> result,
//! written oldest-inserted first so the insertion order survives a restart.

use log::{debug, warn};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::cache::PositionKey;
use crate::error::Result;
use crate::eval::EvalResult;

pub(crate) struct SnapshotRef<'a>(pub(crate) Vec<(&'a PositionKey, &'a EvalResult)>);

impl Serialize for SnapshotRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 { map.serialize_entry(k, v)?; }
        map.end()
    }
}

/// Entries in document order.
pub(crate) struct Snapshot(pub(crate) Vec<(PositionKey, EvalResult)>);

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;
        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Snapshot;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str("a key/evaluation map") }
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Snapshot, A::Error> {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<PositionKey, EvalResult>()? { out.push((k, v)); }
                Ok(Snapshot(out))
            }
        }
        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Reads a snapshot; missing or corrupt files yield an empty list.
pub(crate) fn read_snapshot(path: &Path) -> Vec<(PositionKey, EvalResult)> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => { warn!("failed to read analysis cache {}: {}", path.display(), e); return Vec::new(); }
    };
    match serde_json::from_str::<Snapshot>(&text) {
        Ok(s) => s.0,
        Err(e) => { warn!("failed to load analysis cache {}: {}", path.display(), e); Vec::new() }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Background writer for cache snapshots. Writes are ordered by sequence number;
/// an older snapshot never overwrites a newer one.
#[derive(Debug)]
pub(crate) struct SnapshotStore {
    path: PathBuf,
    seq: u64,
    written: Arc<Mutex<u64>>,
}

impl SnapshotStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, seq: 0, written: Arc::new(Mutex::new(0)) }
    }

    pub(crate) fn path(&self) -> &Path { &self.path }

    pub(crate) fn persist(&mut self, bytes: Vec<u8>) {
        self.seq += 1;
        let seq = self.seq;
        let path = self.path.clone();
        let written = self.written.clone();
        let job = move || {
            let mut last = match written.lock() { Ok(g) => g, Err(poisoned) => poisoned.into_inner() };
            if *last > seq { return; }
            match write_atomic(&path, &bytes) {
                Ok(()) => { *last = seq; debug!("analysis cache snapshot {} written", seq); }
                Err(e) => warn!("failed to persist analysis cache {}: {}", path.display(), e),
            }
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => { handle.spawn_blocking(job); }
            Err(_) => job(),
        }
    }
}
