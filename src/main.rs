use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use sales_regression_lab::config::{Config, LoggingConfig};
use sales_regression_lab::web::{self, AppState};

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("invalid logging.level '{}'", logging.level))?,
    };

    match &logging.file {
        Some(path) => {
            let log_file = std::fs::File::create(path)
                .with_context(|| format!("failed to create log file {}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(log_file)
                .with_ansi(false)
                .json()
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Set SRL_CONFIG_PATH or run from the directory containing config/default.toml");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging)?;

    let bind_addr = config.server.bind_addr.clone();
    tracing::info!(
        bind_addr = %bind_addr,
        max_upload_bytes = config.server.max_upload_bytes,
        holdout_fraction = config.split.holdout_fraction,
        seed = config.split.seed,
        "Starting sales-regression-lab"
    );

    let app = web::router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "Dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(web::shutdown_on(tokio::signal::ctrl_c()))
        .await
        .context("server error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
