//! Config and log directory resolution.
//!
//! An environment variable wins; otherwise the platform directory from `dirs`
//! is used with an app-specific suffix.

use crate::error::AppError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::PathBuf;

pub const CONFIG_DIR_ENV: &str = "REMOTE_OBJECTS_CONFIG_DIR";
pub const LOG_DIR_ENV: &str = "REMOTE_OBJECTS_LOG_DIR";

const APP_DIR_NAME: &str = "remote-objects";
const LOG_DIR_NAME: &str = "logs";

#[track_caller]
pub fn config_dir() -> Result<PathBuf, AppError> {
    resolve_dir(
        env::var(CONFIG_DIR_ENV).ok(),
        dirs::config_dir(),
        &[APP_DIR_NAME],
    )
}

#[track_caller]
pub fn log_dir() -> Result<PathBuf, AppError> {
    resolve_dir(
        env::var(LOG_DIR_ENV).ok(),
        dirs::data_local_dir(),
        &[APP_DIR_NAME, LOG_DIR_NAME],
    )
}

/// Pick `override_dir` when set and non-empty, else `platform_dir` joined with
/// `suffix`.
#[track_caller]
pub fn resolve_dir(
    override_dir: Option<String>,
    platform_dir: Option<PathBuf>,
    suffix: &[&str],
) -> Result<PathBuf, AppError> {
    if let Some(dir) = override_dir.filter(|dir| !dir.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let base = platform_dir.ok_or_else(|| AppError::Path {
        message: format!("No platform directory available for {}", suffix.join("/")),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(suffix.iter().fold(base, |path, part| path.join(part)))
}
