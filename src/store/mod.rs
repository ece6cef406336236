//! Fjall-based persistence for publishers
//!
//! Publishers are stored as JSON documents keyed by their id in the
//! `publishers` partition. Ids come from a counter that is kept in memory
//! and written to the `metadata` partition, under the same lock, whenever it
//! advances, so a reopened store never hands out an id twice.
//!
//! Queries are evaluated by scanning the partition in id order and applying
//! a compiled [`Specification`](crate::domain::Specification).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use library::store::PublisherStore;
//!
//! let store = PublisherStore::open("data/library")?;
//! let saved = store.save(Publisher::new("Penguin"))?;
//! let found = store.get(saved.id.unwrap())?;
//! ```

pub mod error;
pub mod partitions;
pub mod publisher_store;

pub use error::{Result, StoreError};
pub use publisher_store::{PublisherStore, StoreStats};
