use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::{
    services::{
        count_publishers, create_publisher, delete_publisher, get_publisher, health,
        list_publishers, partial_update_publisher, update_publisher,
    },
    state::AppState,
};
use crate::config::Config;
use crate::store::PublisherStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Routes of the publisher resource and the management endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/publishers",
            post(create_publisher)
                .put(update_publisher)
                .get(list_publishers),
        )
        .route("/api/publishers/count", get(count_publishers))
        .route(
            "/api/publishers/{id}",
            get(get_publisher)
                .patch(partial_update_publisher)
                .delete(delete_publisher),
        )
        .route("/management/health", get(health))
        .with_state(state)
        // Transparently decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    info!(path = %config.server.data_path.display(), "Opening publisher store");
    let store = PublisherStore::open(&config.server.data_path)
        .map_err(|e| format!("Failed to open publisher store: {}", e))?;

    let address = config.server.bind_addr;
    let state = AppState::new(config, store.clone())?;
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Library API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store
        .persist()
        .map_err(|e| format!("Failed to persist publisher store: {}", e))?;
    info!("Publisher store flushed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
