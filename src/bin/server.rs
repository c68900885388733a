use clap::Parser;
use dotenv::dotenv;
use morchy_api::db::services::{ContainerService, NodeService};
use morchy_api::server::{config::ServerConfig, database};
use morchy_api::version::{APP_NAME, VERSION};
use morchy_api::web::{self, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stdout: human-readable format
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx::query=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C.");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to listen for SIGTERM."),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    dotenv().ok();
    init_logging();
    info!("Starting {}, version: {}", APP_NAME, VERSION);

    let server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load server configuration: {}", e);
            return Err(e.into());
        }
    };

    // --- Database Pool Setup ---
    let db_pool = match database::connect(&server_config.database).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!(error = %e, "Failed to create database connection.");
            return Err(e.into());
        }
    };

    let app_state = Arc::new(AppState {
        node_service: Arc::new(NodeService::new(db_pool.clone())),
        container_service: Arc::new(ContainerService::new(db_pool.clone())),
    });
    let app = web::create_axum_router(app_state);

    let bind_address = server_config.application.bind_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("HTTP server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::into_inner(db_pool) {
        Some(db) => {
            if let Err(e) = db.close().await {
                error!(error = %e, "Failed to close database pool cleanly.");
            }
        }
        None => warn!("Database pool still in use at shutdown, dropping it."),
    }
    info!("Server stopped.");
    Ok(())
}
