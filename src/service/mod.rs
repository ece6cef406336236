//! Service layer between the HTTP handlers and the store.
//!
//! - [`PublisherService`] performs writes and single-record reads
//! - [`PublisherQueryService`] answers criteria queries with pages and counts

mod publisher;
mod query;

pub use publisher::PublisherService;
pub use query::PublisherQueryService;
