use std::net::SocketAddr;
use std::sync::Arc;

use budgetra_api::config::ServerConfig;
use budgetra_api::router::build_app_router;
use budgetra_api::state::AppState;
use budgetra_auth::{
    AuthBackend, FileSessionStorage, GoTrueClient, SessionBootstrapper, SessionStore,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "budgetra_api=debug,budgetra_auth=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = budgetra_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    budgetra_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    budgetra_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Session ---
    let storage = Arc::new(FileSessionStorage::new(&config.session_file));
    let auth: Arc<dyn AuthBackend> = Arc::new(GoTrueClient::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
        storage,
    ));
    let session = SessionStore::new();
    let bootstrap = SessionBootstrapper::new(Arc::clone(&auth), session.clone())
        .with_fetch_timeout(config.session_fetch_timeout())
        .start();
    tracing::info!(session_file = %config.session_file.display(), "Session bootstrapper started");

    // --- App state ---
    let shutdown = CancellationToken::new();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        auth,
        session,
        shutdown: shutdown.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // End open session event streams so the drain can finish.
            shutdown.cancel();
        })
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    bootstrap.shutdown().await;
    tracing::info!("Session bootstrapper stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
