use anyhow::Result;
use crystal_grimoire::{config, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Builds the log filter, accepting bare levels and per-target directives
fn log_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|_| {
        anyhow::anyhow!(
            "Invalid log level: '{}'. Use a level (error, warn, info, debug, trace) or target directives like 'crystal_grimoire=debug,info'",
            level
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so the log level can be taken from it
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    let filter = match log_filter(&log_level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Configuration loaded, log level: {}", log_level);

    server::run(config).await?;

    Ok(())
}
