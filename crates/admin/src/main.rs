//! Vitrine Admin - Catalog administration panel.
//!
//! This binary serves the admin panel on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework with a JSON API for catalog CRUD
//! - Askama templates for the login page and dashboard
//! - Identity provider (email/password, id tokens) for sign-in
//! - Documents and sessions in `PostgreSQL`, or in memory when no database is set
//! - Images in an HTTP object storage bucket, or in memory when none is set

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::Router;
use sentry::integrations::tracing as sentry_tracing;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_admin::config::AdminConfig;
use vitrine_admin::middleware::create_session_layer;
use vitrine_admin::services::HttpIdentityProvider;
use vitrine_admin::state::AppState;
use vitrine_data::{
    DocumentStore, HttpObjectStorage, MemoryDocumentStore, MemoryObjectStorage, ObjectStorage,
    PgDocumentStore, create_pool,
};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Admin panel: include the signed-in admin on events
            send_default_pii: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Image storage: the configured bucket, or memory for local runs.
fn connect_storage(config: &AdminConfig, client: &reqwest::Client) -> Arc<dyn ObjectStorage> {
    match &config.storage {
        Some(storage) => {
            tracing::info!(bucket = %storage.bucket, "Using HTTP object storage");
            Arc::new(HttpObjectStorage::new(
                client.clone(),
                &storage.endpoint,
                &storage.bucket,
                storage.token.clone(),
            ))
        }
        None => {
            tracing::warn!("No STORAGE_ENDPOINT set; uploads are kept in memory");
            Arc::new(MemoryObjectStorage::new())
        }
    }
}

/// Build the router with documents and sessions in `PostgreSQL` when a
/// database is configured, in memory otherwise.
async fn build_app(
    config: &AdminConfig,
    storage: Arc<dyn ObjectStorage>,
    identity: Arc<HttpIdentityProvider>,
) -> Router {
    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Migrations (documents and the session table) are NOT run
            // automatically on startup. Run: cargo run -p vitrine-cli -- migrate
            let session_layer = create_session_layer(PostgresStore::new(pool.clone()), config);
            let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));
            let state = AppState::new(config.clone(), store, storage, identity);
            vitrine_admin::app(state, session_layer)
        }
        None => {
            tracing::warn!(
                "No ADMIN_DATABASE_URL or DATABASE_URL set; documents and sessions are kept in memory"
            );
            let session_layer = create_session_layer(MemoryStore::default(), config);
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
            let state = AppState::new(config.clone(), store, storage, identity);
            vitrine_admin::app(state, session_layer)
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_admin=info,vitrine_data=info,tower_http=debug".into());

    let json_layer = config
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client");

    let storage = connect_storage(&config, &client);
    let identity = Arc::new(HttpIdentityProvider::new(
        client,
        config.identity.endpoint.clone(),
        config.identity.api_key.clone(),
    ));

    let app = build_app(&config, storage, identity)
        .await
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("admin listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
