use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("Serialize Error: {message} {location}")]
    Serialize {
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed Descriptor Error: {message} {location}")]
    Malformed {
        message: String,
        location: ErrorLocation,
    },
}

impl CodecError {
    #[track_caller]
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CodecError::Malformed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
