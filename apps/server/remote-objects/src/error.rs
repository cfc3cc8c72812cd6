use common::ErrorLocation;

use thiserror::Error;

/// Errors raised while bootstrapping the server binary.
///
/// Failures from `rpc-core` are flattened into a message so the binary reports
/// one uniform shape, with the location of the bootstrap step that failed.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from this App
    #[error("Remote Objects Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Logger could not be installed
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    /// Config or log directory could not be resolved
    #[error("Path Error: {message} {location}")]
    Path {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be loaded
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Server failed to start or stop
    #[error("Server Error: {message} {location}")]
    Server {
        message: String,
        location: ErrorLocation,
    },
}
