//! Logging setup and in-process counters

use std::sync::atomic::{AtomicU64, Ordering};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Metrics handle for recording publisher mutations
#[derive(Debug, Default)]
pub struct Metrics {
    publishers_created: AtomicU64,
    publishers_updated: AtomicU64,
    publishers_deleted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publisher_created(&self) {
        self.publishers_created.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "publishers_created", "Metric incremented");
    }

    pub fn publisher_updated(&self) {
        self.publishers_updated.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "publishers_updated", "Metric incremented");
    }

    pub fn publisher_deleted(&self) {
        self.publishers_deleted.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "publishers_deleted", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            publishers_created: self.publishers_created.load(Ordering::Relaxed),
            publishers_updated: self.publishers_updated.load(Ordering::Relaxed),
            publishers_deleted: self.publishers_deleted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub publishers_created: u64,
    pub publishers_updated: u64,
    pub publishers_deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = Metrics::new();
        metrics.publisher_created();
        metrics.publisher_created();
        metrics.publisher_deleted();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                publishers_created: 2,
                publishers_updated: 0,
                publishers_deleted: 1,
            }
        );
    }
}
