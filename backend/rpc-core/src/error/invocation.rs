use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failure reported by a native function when it is invoked.
///
/// Only `message` ever reaches the peer; the location stays in local logs.
#[derive(Debug, Clone, ThisError)]
#[error("Invocation Error: {message} {location}")]
pub struct InvocationError {
    pub message: String,
    pub location: ErrorLocation,
}

impl InvocationError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
