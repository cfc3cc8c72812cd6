use crate::config::{RegistryScope, ServerConfig};
use crate::error::ConfigError;

use tempfile::TempDir;

/// **VALUE**: Verifies a missing config file yields defaults.
///
/// **WHY THIS MATTERS**: First start has no config file.
///
/// **BUG THIS CATCHES**: Would catch a missing file being reported as an error.
#[test]
fn given_empty_dir_when_loading_then_defaults() {
    // GIVEN: An empty directory
    let dir = TempDir::new().unwrap();

    // WHEN: Loading
    let config = ServerConfig::load(dir.path()).unwrap();

    // THEN: Defaults, loopback only, per-connection registries
    assert_eq!(config, ServerConfig::default());
    assert!(config.loopback_only);
    assert_eq!(config.registry_scope, RegistryScope::Connection);
    assert_eq!(config.bind_address(), "127.0.0.1:8080");
}

/// **VALUE**: Verifies save then load returns the same config.
///
/// **WHY THIS MATTERS**: Operators edit and persist the config between runs.
///
/// **BUG THIS CATCHES**: Would catch a field missing from serialization or the
/// temp file left in place of the real one.
#[test]
fn given_saved_config_when_loaded_then_values_match() {
    // GIVEN: A non-default config
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
        port: 0,
        registry_scope: RegistryScope::Process,
        ..ServerConfig::default()
    };

    // WHEN: Saving and loading
    config.save(dir.path()).unwrap();
    let loaded = ServerConfig::load(dir.path()).unwrap();

    // THEN: Round-trips, no temp file left
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
    let raw = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(raw.contains("\"registry_scope\": \"process\""));
}

/// **VALUE**: Verifies corrupt and invalid files are errors, not silent defaults.
///
/// **WHY THIS MATTERS**: Starting with defaults could expose the server on a
/// different port than the operator configured.
///
/// **BUG THIS CATCHES**: Would catch parse failures being swallowed.
#[test]
fn given_corrupt_or_invalid_file_when_loading_then_error() {
    // GIVEN: A corrupt file
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ nope").unwrap();

    // WHEN/THEN: Parse error
    assert!(matches!(
        ServerConfig::load(dir.path()),
        Err(ConfigError::Parse { .. })
    ));

    // GIVEN: A file with an unknown version and a bad host
    std::fs::write(dir.path().join("config.json"), r#"{"version": 9}"#).unwrap();
    assert!(matches!(
        ServerConfig::load(dir.path()),
        Err(ConfigError::Validation { .. })
    ));
    std::fs::write(dir.path().join("config.json"), r#"{"host": "not a host"}"#).unwrap();
    assert!(matches!(
        ServerConfig::load(dir.path()),
        Err(ConfigError::Validation { .. })
    ));
}

/// **VALUE**: Verifies IPv6 hosts are bracketed in the bind address.
///
/// **WHY THIS MATTERS**: `::1:8080` is not a parseable socket address.
///
/// **BUG THIS CATCHES**: Would catch naive `host:port` joining.
#[test]
fn given_ipv6_host_when_building_bind_address_then_bracketed() {
    // GIVEN: An IPv6 loopback host
    let config = ServerConfig {
        host: String::from("::1"),
        port: 9000,
        ..ServerConfig::default()
    };

    // WHEN/THEN: Bracketed
    assert!(config.validate().is_ok());
    assert_eq!(config.bind_address(), "[::1]:9000");
}
