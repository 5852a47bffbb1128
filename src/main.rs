mod badge;
mod cli;
mod config;
mod error;
mod models;
mod providers;
mod server;
mod status;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Using config file: {}", cli.config.display());

    let mut config = config::Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let projects = config::load_projects(&config.projects_dir())?;
    let addr = config.bind_address()?;
    let state = server::AppState::new(&config, projects)?;
    let app = server::router(Arc::new(state), &config.server.base_path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Emblem is running on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Received shutdown signal, stopping...");
}
