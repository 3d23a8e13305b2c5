use golfbay_linebot::api::{router, AppState};
use golfbay_linebot::assistant::Assistant;
use golfbay_linebot::availability::GasClient;
use golfbay_linebot::config::Config;
use golfbay_linebot::line::LineClient;
use golfbay_linebot::openai::OpenAiClient;

use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present
    let dotenv_result = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _guard = init_logging(config.log_dir.as_deref());

    if let Err(e) = dotenv_result {
        debug!("No .env file loaded: {}", e);
    }

    let socket_addr = config.socket_addr()?;

    info!("Starting golfbay-linebot on {}", socket_addr);
    info!("OpenAI model: {}", config.openai_model);
    debug!("Configuration: {:?}", config);

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let model = Arc::new(OpenAiClient::new(
        http_client.clone(),
        config.openai_base_url.clone(),
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));
    let availability = Arc::new(GasClient::new(
        http_client.clone(),
        config.gas_web_app_url.clone(),
    ));
    let messenger = Arc::new(LineClient::new(
        http_client,
        config.line_api_base_url.clone(),
        config.line_channel_access_token.clone(),
    ));

    let state = Arc::new(AppState::new(
        Assistant::new(model, availability),
        messenger,
        config.line_channel_secret.clone(),
    ));

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&socket_addr).await?;
    info!("Server listening on {}", socket_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Console logging always; JSON file logging with daily rotation when a log
/// directory is configured. The returned guard must outlive the server.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,golfbay_linebot=debug"));

    let console = fmt::layer().with_target(true).with_thread_ids(true);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(filter).with(console).init();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory {}: {}", dir.display(), e);
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "golfbay-linebot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking),
        )
        .init();

    debug!("Logging initialized - log directory: {}", dir.display());

    Some(guard)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    info!("Received shutdown signal");
}
