use docker_push_relay::config::{DEFAULT_BIND_ADDRESS, RelayConfig};
use docker_push_relay::error::RelayError;
use docker_push_relay::logging::{FileLogger, setup_logging};
use docker_push_relay::{AppState, build_router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

async fn run(bind_address: &str, config: RelayConfig) -> Result<(), RelayError> {
    info!("Gotify URL: {}", config.gotify_url);
    info!("Watching images: {:?}", config.watched_images.as_slice());

    let state = Arc::new(AppState::new(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Listening on {}", bind_address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
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

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let file_logger = std::env::var("LOG_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(|d| FileLogger::new(PathBuf::from(d)));
    let _log_guard = match setup_logging(file_logger.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging error: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());

    let config = match RelayConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&bind_address, config).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
