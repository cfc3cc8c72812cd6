use crate::DEFAULT_URL;
use crate::error::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::time::Duration;

use url::Url;

const DEFAULT_CONNECT_MAX_ELAPSED: Duration = Duration::from_secs(10);
const WS_SCHEMES: [&str; 2] = ["ws", "wss"];

/// Connection settings for [`RemoteClient`](crate::client::RemoteClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    url: Url,
    request_timeout: Option<Duration>,
    connect_max_elapsed: Duration,
}

impl ClientConfig {
    /// Settings for `url`, which must be a `ws://` or `wss://` URL.
    #[track_caller]
    pub fn new(url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|e| ConfigError::Validation {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Invalid URL '{url}': {e}"),
        })?;

        if !WS_SCHEMES.contains(&parsed.scheme()) {
            return Err(ConfigError::Validation {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Unsupported URL scheme '{}' (expected ws or wss)",
                    parsed.scheme()
                ),
            });
        }

        Ok(Self {
            url: parsed,
            request_timeout: None,
            connect_max_elapsed: DEFAULT_CONNECT_MAX_ELAPSED,
        })
    }

    /// Settings for the default local server.
    pub fn local() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_URL)
    }

    /// Fail requests that get no answer within `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Total time spent retrying the initial connection.
    pub fn with_connect_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.connect_max_elapsed = max_elapsed;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn connect_max_elapsed(&self) -> Duration {
        self.connect_max_elapsed
    }
}
