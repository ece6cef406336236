use std::sync::Arc;

use tracing::debug;

use crate::domain::{Page, Pageable, Publisher, PublisherCriteria};
use crate::store::{PublisherStore, Result};

/// Read-only criteria queries over publishers.
#[derive(Clone)]
pub struct PublisherQueryService {
    store: Arc<PublisherStore>,
}

impl PublisherQueryService {
    pub fn new(store: Arc<PublisherStore>) -> Self {
        Self { store }
    }

    /// Returns the requested page of publishers matching `criteria`.
    ///
    /// Without an explicit sort the page follows id order.
    pub fn find_by_criteria(
        &self,
        criteria: &PublisherCriteria,
        pageable: &Pageable,
    ) -> Result<Page<Publisher>> {
        debug!(%criteria, page = pageable.page, size = pageable.size, "find by criteria");

        let mut matched = self.store.scan(&criteria.to_specification())?;
        if !pageable.sort.is_unsorted() {
            matched.sort_by(|a, b| pageable.sort.compare(a, b));
        }

        let total = matched.len() as u64;
        let content = matched
            .into_iter()
            .skip(pageable.offset())
            .take(pageable.size as usize)
            .collect();

        Ok(Page::new(content, pageable, total))
    }

    /// Returns the number of publishers matching `criteria`.
    pub fn count_by_criteria(&self, criteria: &PublisherCriteria) -> Result<u64> {
        debug!(%criteria, "count by criteria");
        self.store.count(&criteria.to_specification())
    }
}
