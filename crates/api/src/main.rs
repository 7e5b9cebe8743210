use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitruvian_api::config::ServerConfig;
use vitruvian_api::router::build_app_router;
use vitruvian_api::state::AppState;
use vitruvian_core::detector::{ModelHandle, ModelState};
use vitruvian_posenet::PoseNetApi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitruvian_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Pose model ---
    let model = Arc::new(ModelHandle::new());
    let loader_handle = match config.pose_service_url.clone() {
        Some(url) => {
            let model = Arc::clone(&model);
            Some(tokio::spawn(async move {
                tracing::info!(%url, "Loading pose model");
                match model.load(|| PoseNetApi::new(url).connect()).await {
                    ModelState::Failed(reason) => {
                        tracing::error!(%reason, "Pose model failed to load");
                    }
                    state => tracing::info!(state = state.as_str(), "Pose model loaded"),
                }
            }))
        }
        None => {
            tracing::warn!("POSE_SERVICE_URL not set, image uploads will be refused");
            None
        }
    };

    // --- App state ---
    let state = AppState::new(config.clone(), model);
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
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    if let Some(handle) = loader_handle {
        handle.abort();
    }
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
