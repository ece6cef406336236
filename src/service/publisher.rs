use std::sync::Arc;

use tracing::debug;

use crate::domain::{Publisher, PublisherPatch};
use crate::store::{PublisherStore, Result};

/// Write operations and lookups by id for [`Publisher`].
#[derive(Clone)]
pub struct PublisherService {
    store: Arc<PublisherStore>,
}

impl PublisherService {
    pub fn new(store: Arc<PublisherStore>) -> Self {
        Self { store }
    }

    /// Inserts a publisher without id or overwrites the one with the same id.
    pub fn save(&self, publisher: Publisher) -> Result<Publisher> {
        debug!(?publisher, "Request to save Publisher");
        self.store.save(publisher)
    }

    /// Applies `patch` to the stored publisher `id`, returning `None` when it does not exist.
    pub fn partial_update(&self, id: u64, patch: PublisherPatch) -> Result<Option<Publisher>> {
        debug!(id, ?patch, "Request to partially update Publisher");
        let Some(mut existing) = self.store.get(id)? else {
            return Ok(None);
        };
        existing.merge(patch);
        self.store.save(existing).map(Some)
    }

    pub fn exists(&self, id: u64) -> Result<bool> {
        self.store.contains(id)
    }

    pub fn find_one(&self, id: u64) -> Result<Option<Publisher>> {
        debug!(id, "Request to get Publisher");
        self.store.get(id)
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        debug!(id, "Request to delete Publisher");
        self.store.remove(id)
    }
}
