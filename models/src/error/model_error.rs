use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Method Error: {method} {location}")]
    UnknownMethod {
        method: String,
        location: ErrorLocation,
    },
}
