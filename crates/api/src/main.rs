use std::net::SocketAddr;
use std::sync::Arc;

use elfcast_api::config::{DocumentStoreKind, ServerConfig};
use elfcast_api::router::build_app_router;
use elfcast_api::state::AppState;
use elfcast_cloud::{StorageBackend, StorageConfig};
use elfcast_core::blob::BlobStore;
use elfcast_core::store::{PlayerStore, SettingsStore};
use elfcast_events::{EventBus, ObservedBlobStore, ObservedPlayerStore};
use elfcast_genai::{GeminiClient, GeminiConfig};
use elfcast_pipeline::{AvatarPipeline, PlayerService, RegenerationTrigger, TriggerDispatcher};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "elfcast_api=debug,elfcast_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        document_store = ?config.document_store,
        in_process_triggers = config.in_process_triggers,
        "Loaded server configuration"
    );

    // --- Document store ---
    let (players, settings, pool) = match config.document_store {
        DocumentStoreKind::Postgres => {
            let database_url =
                std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = elfcast_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            elfcast_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            elfcast_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let store = Arc::new(elfcast_db::PgDocumentStore::new(pool.clone()));
            let players: Arc<dyn PlayerStore> = store.clone();
            let settings: Arc<dyn SettingsStore> = store;
            (players, settings, Some(pool))
        }
        DocumentStoreKind::Memory => {
            tracing::warn!("Using in-memory document store, records are lost on restart");
            let store = Arc::new(elfcast_db::MemoryDocumentStore::new());
            let players: Arc<dyn PlayerStore> = store.clone();
            let settings: Arc<dyn SettingsStore> = store;
            (players, settings, None)
        }
    };

    // --- Blob store ---
    let storage = StorageConfig::from_env().expect("Invalid storage configuration");
    let blobs: Arc<dyn BlobStore> = storage
        .build()
        .await
        .expect("Failed to configure blob store");

    // --- Image model ---
    let gemini = GeminiConfig::from_env().expect("Invalid Gemini configuration");
    tracing::info!(
        model = %gemini.model,
        timeout_secs = gemini.timeout.as_secs(),
        "Image model configured",
    );
    let attempt_timeout = gemini.timeout;
    let transformer =
        Arc::new(GeminiClient::new(gemini).expect("Failed to build Gemini HTTP client"));

    // --- Triggers ---
    let event_bus = Arc::new(EventBus::default());
    let (players, blobs) = if config.in_process_triggers {
        let players: Arc<dyn PlayerStore> =
            Arc::new(ObservedPlayerStore::new(players, Arc::clone(&event_bus)));
        let blobs: Arc<dyn BlobStore> =
            Arc::new(ObservedBlobStore::new(blobs, Arc::clone(&event_bus)));
        (players, blobs)
    } else {
        (players, blobs)
    };

    let pipeline = Arc::new(AvatarPipeline::new(
        Arc::clone(&players),
        Arc::clone(&settings),
        Arc::clone(&blobs),
        transformer,
    )
    .with_attempt_timeout(attempt_timeout));
    let regeneration = Arc::new(RegenerationTrigger::new(
        Arc::clone(&players),
        Arc::clone(&blobs),
    ));

    let dispatcher_handle = config.in_process_triggers.then(|| {
        let dispatcher = TriggerDispatcher::new(Arc::clone(&pipeline), Arc::clone(&regeneration));
        tokio::spawn(dispatcher.run(event_bus.subscribe()))
    });

    // --- App state ---
    let state = AppState {
        pool,
        players: Arc::new(PlayerService::new(players, settings, blobs)),
        pipeline,
        regeneration,
    };

    let files_root = (storage.backend == StorageBackend::Local).then(|| storage.root.clone());
    let app = build_app_router(state, &config, files_root.as_deref());

    // --- Start server ---
    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    tracing::info!(%addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    drop(event_bus);
    if let Some(handle) = dispatcher_handle {
        handle.abort();
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
