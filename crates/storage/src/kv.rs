//! Key-value store adapter.
//!
//! The engine persists everything through the [`KvStore`] trait. Two
//! backends are provided: [`MemoryStore`], whose clones share one map, and
//! [`FileStore`], which keeps a JSON snapshot on disk. A [`StoreHandle`]
//! scopes one acquisition of a store to one statement.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// An entry yielded by a scan.
pub type Entry = (Vec<u8>, Vec<u8>);

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or stored value could not be decoded.
    #[error("storage corrupted: {0}")]
    Corrupted(String),

    /// Value could not be encoded or decoded as JSON.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<StoreError> for kvsql_core::Error {
    fn from(err: StoreError) -> Self {
        kvsql_core::Error::storage(err.to_string())
    }
}

/// A byte-keyed store with point access and complete ordered scans.
pub trait KvStore {
    /// Returns the value stored under `key`.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Returns all entries in key order.
    fn scan(&self) -> StoreResult<Vec<Entry>>;

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns all entries whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Entry>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect())
    }

    /// Makes pending writes durable.
    fn flush(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

/// In-memory store. Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.entries.borrow_mut().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn scan(&self) -> StoreResult<Vec<Entry>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn contains(&self, key: &[u8]) -> StoreResult<bool> {
        Ok(self.entries.borrow().contains_key(key))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Entry>> {
        Ok(self
            .entries
            .borrow()
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// File-backed store.
///
/// The whole map is loaded on open and written back as a JSON list of
/// hex-encoded `[key, value]` pairs. A missing file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    dirty: bool,
}

impl FileStore {
    /// Opens the snapshot at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let bytes = fs::read(&path)?;
            let pairs: Vec<(String, String)> = serde_json::from_slice(&bytes)?;
            let mut entries = BTreeMap::new();
            for (k, v) in pairs {
                let key = hex::decode(&k).map_err(|e| StoreError::Corrupted(e.to_string()))?;
                let value = hex::decode(&v).map_err(|e| StoreError::Corrupted(e.to_string()))?;
                entries.insert(key, value);
            }
            entries
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "opened file store");
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if there are writes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.entries.insert(key.to_vec(), value.to_vec());
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        if self.entries.remove(key).is_some() {
            self.dirty = true;
        }
        Ok(())
    }

    fn scan(&self) -> StoreResult<Vec<Entry>> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    /// Writes the snapshot atomically: temp file, sync, rename.
    fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let pairs: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(k, v)| (hex::encode(k), hex::encode(v)))
            .collect();
        let bytes = serde_json::to_vec(&pairs)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &self.path)?;

        self.dirty = false;
        debug!(path = %self.path.display(), keys = self.entries.len(), "flushed file store");
        Ok(())
    }
}

/// A store acquired for the duration of one statement.
///
/// `close` flushes and reports failures. A handle dropped without `close`
/// still flushes, logging any failure.
pub struct StoreHandle<S: KvStore> {
    store: S,
    closed: bool,
}

impl<S: KvStore> StoreHandle<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            closed: false,
        }
    }

    /// Flushes and releases the store.
    pub fn close(mut self) -> StoreResult<()> {
        self.closed = true;
        self.store.flush()
    }
}

impl<S: KvStore> Deref for StoreHandle<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.store
    }
}

impl<S: KvStore> DerefMut for StoreHandle<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl<S: KvStore> Drop for StoreHandle<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.store.flush() {
            warn!(error = %err, "store handle dropped without close; flush failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let mut store = MemoryStore::new();
        store.put(b"a", b"1").unwrap();
        store.put(b"b", b"2").unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert!(store.contains(b"b").unwrap());
        assert!(!store.contains(b"c").unwrap());

        store.delete(b"a").unwrap();
        assert_eq!(store.get(b"a").unwrap(), None);
        store.delete(b"a").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_clones_share_data() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_scan_prefix_is_ordered_and_bounded() {
        let mut store = MemoryStore::new();
        store.put(b"t/emp/2", b"").unwrap();
        store.put(b"t/emp/1", b"").unwrap();
        store.put(b"t/employee/1", b"").unwrap();
        store.put(b"u", b"").unwrap();

        let keys: Vec<Vec<u8>> = store
            .scan_prefix(b"t/emp/")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"t/emp/1".to_vec(), b"t/emp/2".to_vec()]);
        assert_eq!(store.scan().unwrap().len(), 4);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json")).unwrap();
        assert!(store.scan().unwrap().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_file_store_persists_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let mut handle = StoreHandle::new(FileStore::open(&path).unwrap());
        handle.put(b"table_list", b"[\"person\"]").unwrap();
        handle.put(&[0xff, 0x00], b"bin").unwrap();
        handle.close().unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(b"table_list").unwrap(), Some(b"[\"person\"]".to_vec()));
        assert_eq!(store.get(&[0xff, 0x00]).unwrap(), Some(b"bin".to_vec()));
        assert!(!dir.path().join("db.json.tmp").exists());
    }

    #[test]
    fn test_file_store_path_ending_in_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.tmp");

        let mut handle = StoreHandle::new(FileStore::open(&path).unwrap());
        handle.put(b"k", b"v").unwrap();
        handle.close().unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(!dir.path().join("snapshot.tmp.tmp").exists());
    }

    #[test]
    fn test_file_store_flushes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        {
            let mut handle = StoreHandle::new(FileStore::open(&path).unwrap());
            handle.put(b"k", b"v").unwrap();
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_file_store_rejects_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, br#"[["zz","00"]]"#).unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Corrupted(_))));

        fs::write(&path, b"not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Codec(_))));
    }

    #[test]
    fn test_store_error_converts_to_storage_error() {
        let err: kvsql_core::Error = StoreError::Corrupted("bad".into()).into();
        assert_eq!(err.kind(), kvsql_core::ErrorKind::Storage);
    }
}
