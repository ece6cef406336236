pub mod api;
pub mod config;
pub mod domain;
pub mod observability;
pub mod service;
pub mod store;
