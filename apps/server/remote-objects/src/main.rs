use remote_objects::demo::demo_catalog;
use remote_objects::error::AppError;
use remote_objects::logger::initialize as LoggerInitialize;
use remote_objects::paths;

use rpc_core::config::ServerConfig;
use rpc_core::ipc::start_rpc_server;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;

use log::info;
use tokio::signal::ctrl_c;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // A missing .env file is normal
    let dotenv = dotenvy::dotenv();

    let log_dir = paths::log_dir()?;
    create_dir_all(&log_dir).map_err(|e| AppError::App {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("Remote objects server starting");
    info!("Log directory: {}", log_dir.display());
    if let Ok(env_file) = dotenv {
        info!("Loaded environment from {}", env_file.display());
    }

    let config_dir = paths::config_dir()?;
    info!("Config directory: {}", config_dir.display());
    let config = ServerConfig::load(&config_dir).map_err(|e| AppError::Config {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let handle = start_rpc_server(&config, demo_catalog())
        .await
        .map_err(|e| AppError::Server {
            message: format!("Failed to start RPC server: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Serving remote objects on {}", handle.url());

    ctrl_c().await.map_err(|e| AppError::App {
        message: format!("Failed to listen for shutdown signal: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    info!("Shutdown requested");
    handle.shutdown().await;
    info!("Remote objects server stopped");

    Ok(())
}
