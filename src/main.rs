use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use realtalk::adapters::{app_router, check_storage, with_middleware, AppState, RedisStorageHealth};
use realtalk::application::Hub;
use realtalk::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config);

    info!(
        environment = ?config.server.environment,
        send_timeout_ms = config.hub.send_timeout_ms,
        "Starting RealTalk"
    );

    let storage = RedisStorageHealth::new(&config.storage.url, config.storage.connect_timeout())?;
    check_storage(&storage, config.storage.required)
        .await
        .map_err(|e| {
            error!(error = %e, "Required storage is unreachable");
            e
        })?;

    let hub = Arc::new(Hub::new(config.hub.settings()));
    let state = AppState::new(Arc::clone(&hub), config.hub.sink_buffer);
    let app = with_middleware(app_router(state), &config.server.cors_origins_list());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    let grace = config.server.shutdown_grace();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let report = hub.shutdown(grace).await;
            info!(
                live = report.live_at_start,
                force_closed = report.force_closed,
                "Event streams closed"
            );
        })
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
