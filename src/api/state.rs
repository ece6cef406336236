use std::sync::Arc;

use axum::http::header::InvalidHeaderName;

use super::headers::AlertHeaders;
use crate::config::Config;
use crate::observability::Metrics;
use crate::service::{PublisherQueryService, PublisherService};
use crate::store::PublisherStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub alerts: Arc<AlertHeaders>,
    pub store: Arc<PublisherStore>,
    pub publishers: PublisherService,
    pub publisher_queries: PublisherQueryService,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Fails when the configured application name cannot form header names.
    pub fn new(config: Config, store: PublisherStore) -> Result<Self, InvalidHeaderName> {
        let alerts = AlertHeaders::new(&config.application)?;
        let store = Arc::new(store);

        Ok(Self {
            config: Arc::new(config),
            alerts: Arc::new(alerts),
            publishers: PublisherService::new(store.clone()),
            publisher_queries: PublisherQueryService::new(store.clone()),
            store,
            metrics: Arc::new(Metrics::new()),
        })
    }
}
