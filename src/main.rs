//! GeoQuiz Back binary entrypoint wiring the catalog, the record store and the REST/SSE layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geoquiz_back::{
    catalog::{FileCatalog, QuizCatalog},
    config::{AppConfig, CatalogSource, RecordSource},
    dao::{
        best_record::BestRecordStore,
        record_store::{FileRecordStore, MemoryRecordStore, RecordStore},
    },
    routes,
    services::health_service,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let catalog = build_catalog(&config.catalog)?;
    let records = BestRecordStore::new(build_record_store(&config.records));
    let app_state = AppState::new(catalog, records, config.session_options());

    // Dependencies are probed once for the logs; the server starts regardless.
    let health = health_service::health_status(&app_state).await;
    info!(status = %health.status, "initial health check");

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Instantiate the configured quiz catalog.
fn build_catalog(source: &CatalogSource) -> anyhow::Result<Arc<dyn QuizCatalog>> {
    match source {
        CatalogSource::File { root } => {
            info!(root = %root.display(), "serving quizzes from disk");
            Ok(Arc::new(FileCatalog::new(root.clone())))
        }
        #[cfg(feature = "http-catalog")]
        CatalogSource::Http { base_url } => {
            use geoquiz_back::catalog::http::{HttpCatalog, HttpCatalogConfig};

            info!(%base_url, "serving quizzes over HTTP");
            let catalog = HttpCatalog::new(HttpCatalogConfig::new(base_url.clone()))
                .context("building HTTP catalog")?;
            Ok(Arc::new(catalog))
        }
        #[cfg(not(feature = "http-catalog"))]
        CatalogSource::Http { .. } => {
            anyhow::bail!("HTTP catalog configured but the `http-catalog` feature is disabled")
        }
    }
}

/// Instantiate the configured best-record store.
fn build_record_store(source: &RecordSource) -> Arc<dyn RecordStore> {
    match source {
        RecordSource::File { path } => {
            info!(path = %path.display(), "persisting best records to disk");
            Arc::new(FileRecordStore::new(path.clone()))
        }
        RecordSource::Memory => {
            warn!("best records are kept in memory and lost on restart");
            Arc::new(MemoryRecordStore::new())
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
