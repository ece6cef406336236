use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use tracing::{debug, info};

use crate::domain::{Publisher, Specification};

use super::error::{Result, StoreError};
use super::partitions::{NEXT_ID_KEY, decode_publisher_key, encode_meta_key, encode_publisher_key};

const FIRST_ID: u64 = 1;

/// Fjall-backed persistent storage for publishers
#[derive(Clone)]
pub struct PublisherStore {
    keyspace: Keyspace,
    publishers: PartitionHandle,
    metadata: PartitionHandle,
    /// Next id to hand out; mirrored in the `metadata` partition
    next_id: Arc<Mutex<u64>>,
}

impl PublisherStore {
    /// Open or create a Fjall store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening publisher store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;

        let publishers = keyspace.open_partition("publishers", PartitionCreateOptions::default())?;
        let metadata = keyspace.open_partition("metadata", PartitionCreateOptions::default())?;

        // The counter may lag behind the data if the process died between
        // writing a record and persisting the counter.
        let stored_next = metadata
            .get(encode_meta_key(NEXT_ID_KEY))?
            .map(|bytes| u64::from_be_bytes(bytes.as_ref().try_into().unwrap_or([0u8; 8])))
            .unwrap_or(FIRST_ID);
        let after_last = match publishers.last_key_value()? {
            Some((key, _)) => decode_publisher_key(&key)
                .map(|id| id + 1)
                .ok_or_else(|| StoreError::InvalidKey(format!("{:?}", key.as_ref())))?,
            None => FIRST_ID,
        };
        let next_id = stored_next.max(after_last).max(FIRST_ID);

        info!(next_id, "Publisher store opened");
        Ok(Self {
            keyspace,
            publishers,
            metadata,
            next_id: Arc::new(Mutex::new(next_id)),
        })
    }

    /// Insert or overwrite a publisher, assigning a new id when it has none
    pub fn save(&self, mut publisher: Publisher) -> Result<Publisher> {
        let id = self.reserve_id(publisher.id)?;
        publisher.id = Some(id);

        let value = serde_json::to_vec(&publisher)?;
        self.publishers.insert(encode_publisher_key(id), value)?;

        debug!(id, "Saved publisher");
        Ok(publisher)
    }

    /// Get a publisher by id
    pub fn get(&self, id: u64) -> Result<Option<Publisher>> {
        match self.publishers.get(encode_publisher_key(id))? {
            Some(value) => Ok(Some(decode(id, &value)?)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, id: u64) -> Result<bool> {
        Ok(self.publishers.contains_key(encode_publisher_key(id))?)
    }

    /// Remove a publisher; removing a missing id is not an error
    pub fn remove(&self, id: u64) -> Result<()> {
        self.publishers.remove(encode_publisher_key(id))?;
        debug!(id, "Removed publisher");
        Ok(())
    }

    /// All publishers matching `spec`, in id order
    pub fn scan(&self, spec: &Specification) -> Result<Vec<Publisher>> {
        let mut matched = Vec::new();
        for item in self.publishers.iter() {
            let (key, value) = item?;
            let publisher = decode_entry(&key, &value)?;
            if spec.matches(&publisher) {
                matched.push(publisher);
            }
        }
        Ok(matched)
    }

    /// Number of publishers matching `spec`
    pub fn count(&self, spec: &Specification) -> Result<u64> {
        let mut total = 0;
        for item in self.publishers.iter() {
            let (key, value) = item?;
            if spec.is_unrestricted() || spec.matches(&decode_entry(&key, &value)?) {
                total += 1;
            }
        }
        Ok(total)
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    /// Get internal statistics (for health checks and debugging)
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            publisher_count: self.count(&Specification::all())?,
            next_id: *self.lock_next_id(),
        })
    }

    /// Picks the id for a save: `requested` when given, a fresh one otherwise.
    ///
    /// The counter is written while the lock is held, so the stored value
    /// only ever grows and a deleted id is never handed out again.
    fn reserve_id(&self, requested: Option<u64>) -> Result<u64> {
        let mut next = self.lock_next_id();
        let id = requested.unwrap_or(*next);
        let advanced = (*next).max(id.saturating_add(1));

        if advanced != *next {
            self.metadata
                .insert(encode_meta_key(NEXT_ID_KEY), advanced.to_be_bytes())?;
            *next = advanced;
        }
        Ok(id)
    }

    // A poisoned counter is still a valid u64
    fn lock_next_id(&self) -> MutexGuard<'_, u64> {
        self.next_id.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode_entry(key: &[u8], value: &[u8]) -> Result<Publisher> {
    let id = decode_publisher_key(key)
        .ok_or_else(|| StoreError::InvalidKey(format!("{:?}", key)))?;
    decode(id, value)
}

fn decode(id: u64, value: &[u8]) -> Result<Publisher> {
    let mut publisher: Publisher = serde_json::from_slice(value)?;
    publisher.id = Some(id);
    Ok(publisher)
}

#[derive(Debug, Clone)]
pub struct StoreStats {
    pub publisher_count: u64,
    pub next_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PublisherCriteria;
    use tempfile::TempDir;

    fn create_test_store() -> (PublisherStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = PublisherStore::open(temp_dir.path().join("test_store")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_open_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = PublisherStore::open(temp_dir.path().join("test_store"));
        assert!(store.is_ok());
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let (store, _temp) = create_test_store();

        let first = store.save(Publisher::new("Penguin")).unwrap();
        let second = store.save(Publisher::new("Vintage")).unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
    }

    #[test]
    fn test_save_and_get() {
        let (store, _temp) = create_test_store();
        let saved = store.save(Publisher::new("Penguin")).unwrap();

        let retrieved = store.get(saved.id.unwrap()).unwrap();
        assert_eq!(retrieved, Some(saved));
    }

    #[test]
    fn test_save_with_id_overwrites() {
        let (store, _temp) = create_test_store();
        let saved = store.save(Publisher::new("Penguin")).unwrap();

        let renamed = Publisher::new("Penguin Random House").with_id(saved.id.unwrap());
        store.save(renamed.clone()).unwrap();

        assert_eq!(store.get(1).unwrap(), Some(renamed));
        assert_eq!(store.stats().unwrap().publisher_count, 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get(99).unwrap(), None);
        assert!(!store.contains(99).unwrap());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (store, _temp) = create_test_store();
        let saved = store.save(Publisher::new("Penguin")).unwrap();
        let id = saved.id.unwrap();

        store.remove(id).unwrap();
        store.remove(id).unwrap();
        assert_eq!(store.get(id).unwrap(), None);
    }

    #[test]
    fn test_scan_and_count_apply_specification() {
        let (store, _temp) = create_test_store();
        for name in ["Penguin", "Vintage", "Pan Books"] {
            store.save(Publisher::new(name)).unwrap();
        }

        let criteria = PublisherCriteria::from_query_pairs([("name.contains", "pen")]).unwrap();
        let spec = criteria.to_specification();

        let matched = store.scan(&spec).unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Penguin");
        assert_eq!(store.count(&spec).unwrap(), 1);
        assert_eq!(store.count(&Specification::all()).unwrap(), 3);
    }

    #[test]
    fn test_ids_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test_store");

        {
            let store = PublisherStore::open(&path).unwrap();
            store.save(Publisher::new("Penguin")).unwrap();
            store.save(Publisher::new("Vintage")).unwrap();
            store.remove(2).unwrap();
            store.persist().unwrap();
        }

        let store = PublisherStore::open(&path).unwrap();
        let next = store.save(Publisher::new("Faber")).unwrap();
        assert_eq!(next.id, Some(3));
    }

    #[test]
    fn test_concurrent_saves_never_reuse_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test_store");

        {
            let store = PublisherStore::open(&path).unwrap();
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = store.clone();
                    std::thread::spawn(move || {
                        for _ in 0..25 {
                            store.save(Publisher::new("Penguin")).unwrap();
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let stored_next = store
                .metadata
                .get(encode_meta_key(NEXT_ID_KEY))
                .unwrap()
                .map(|bytes| u64::from_be_bytes(bytes.as_ref().try_into().unwrap()));
            assert_eq!(stored_next, Some(201));

            // Drop the highest record so only the counter remembers it
            store.remove(200).unwrap();
            store.persist().unwrap();
        }

        let store = PublisherStore::open(&path).unwrap();
        let next = store.save(Publisher::new("Faber")).unwrap();
        assert_eq!(next.id, Some(201));
    }
}
