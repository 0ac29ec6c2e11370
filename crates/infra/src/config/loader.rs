//! Configuration loader
//!
//! Loads adapter configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to the explicit file path, if any
//! 3. Otherwise probes the standard locations for a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ERPBRIDGE_BASE_URL`: Root URL of the remote REST API
//! - `ERPBRIDGE_USERNAME`: Login user
//! - `ERPBRIDGE_PASSWORD`: Login password
//! - `ERPBRIDGE_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `ERPBRIDGE_RETRY_COUNT`: Retries after the first attempt
//! - `ERPBRIDGE_RETRY_DELAY_MS`: Fixed delay between retries in milliseconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./erpbridge.json` or `./erpbridge.toml` (current working directory)
//! 2. `./config/erpbridge.json` or `./config/erpbridge.toml`

use std::path::{Path, PathBuf};
use std::str::FromStr;

use erpbridge_domain::{AdapterConfig, AdapterSettings, BridgeError, CredentialSettings, Result};

pub const ENV_BASE_URL: &str = "ERPBRIDGE_BASE_URL";
pub const ENV_USERNAME: &str = "ERPBRIDGE_USERNAME";
pub const ENV_PASSWORD: &str = "ERPBRIDGE_PASSWORD";
pub const ENV_TIMEOUT_MS: &str = "ERPBRIDGE_TIMEOUT_MS";
pub const ENV_RETRY_COUNT: &str = "ERPBRIDGE_RETRY_COUNT";
pub const ENV_RETRY_DELAY_MS: &str = "ERPBRIDGE_RETRY_DELAY_MS";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If required variables
/// are missing, falls back to `path` or, without one, to the first file found
/// by [`probe_config_paths`]. A variable that is set but malformed is an
/// error, not a reason to fall back.
///
/// # Errors
/// Returns `BridgeError::Config` for a malformed environment variable or if
/// no file yields settings, and `BridgeError::ConfigValidation` if the chosen
/// file lacks required fields.
pub fn load(path: Option<PathBuf>) -> Result<AdapterConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e @ BridgeError::ConfigValidation { .. }) => {
            tracing::debug!(error = %e, "Environment incomplete, trying file");
            load_from_file(path)
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `BridgeError::ConfigValidation` listing every missing required
/// variable by its field name, or `BridgeError::Config` if a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<AdapterConfig> {
    settings_from_env()?.validate()
}

fn settings_from_env() -> Result<AdapterSettings> {
    let username = env_var(ENV_USERNAME);
    let password = env_var(ENV_PASSWORD);
    let credentials = (username.is_some() || password.is_some())
        .then_some(CredentialSettings { username, password });

    Ok(AdapterSettings {
        base_url: env_var(ENV_BASE_URL),
        credentials,
        timeout: env_number(ENV_TIMEOUT_MS)?,
        retry_count: env_number(ENV_RETRY_COUNT)?,
        retry_delay: env_number(ENV_RETRY_DELAY_MS)?,
    })
}

/// Load and validate configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `BridgeError::Config` if the file is missing, unreadable or not
/// valid JSON/TOML, and `BridgeError::ConfigValidation` if required fields
/// are absent.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AdapterConfig> {
    read_settings(path)?.validate()
}

/// Read the raw settings document without validating it.
///
/// # Errors
/// Same as [`load_from_file`], minus validation.
pub fn read_settings(path: Option<PathBuf>) -> Result<AdapterSettings> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BridgeError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BridgeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BridgeError::Config(format!("Failed to read config file: {e}")))?;

    parse_settings(&contents, &config_path)
}

/// Parse settings from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_settings(contents: &str, path: &Path) -> Result<AdapterSettings> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BridgeError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BridgeError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_in(&cwd)
}

fn probe_in(dir: &Path) -> Option<PathBuf> {
    [
        dir.join("erpbridge.json"),
        dir.join("erpbridge.toml"),
        dir.join("config").join("erpbridge.json"),
        dir.join("config").join("erpbridge.toml"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

/// Non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Optional numeric environment variable.
///
/// # Errors
/// Returns `BridgeError::Config` if the variable is set but does not parse.
fn env_number<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| BridgeError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;

    use once_cell::sync::Lazy;
    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 6] = [
        ENV_BASE_URL,
        ENV_USERNAME,
        ENV_PASSWORD,
        ENV_TIMEOUT_MS,
        ENV_RETRY_COUNT,
        ENV_RETRY_DELAY_MS,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "https://erp.example.com/rest/s1");
        std::env::set_var(ENV_USERNAME, "alice");
        std::env::set_var(ENV_PASSWORD, "secret");
        std::env::set_var(ENV_TIMEOUT_MS, "5000");
        std::env::set_var(ENV_RETRY_COUNT, "4");
        std::env::set_var(ENV_RETRY_DELAY_MS, "250");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load config from env vars, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.base_url.as_str(), "https://erp.example.com/rest/s1");
        assert_eq!(config.credentials.username, "alice");
        assert_eq!(config.credentials.password, "secret");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.retry_count, 4);
        assert_eq!(config.retry_delay, Duration::from_millis(250));

        clear_env();
    }

    #[test]
    fn test_load_from_env_applies_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "http://localhost:8080");
        std::env::set_var(ENV_USERNAME, "alice");
        std::env::set_var(ENV_PASSWORD, "secret");

        let config = load_from_env().unwrap();
        assert_eq!(config.timeout, Duration::from_millis(30_000));
        assert_eq!(config.retry_count, 2);
        assert_eq!(config.retry_delay, Duration::from_millis(1_000));

        clear_env();
    }

    #[test]
    fn test_load_from_env_reports_all_missing_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_USERNAME, "alice");

        let err = load_from_env().unwrap_err();
        assert_eq!(
            err,
            BridgeError::ConfigValidation {
                missing: vec!["baseUrl".to_string(), "credentials.password".to_string()]
            }
        );

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_BASE_URL, "http://localhost:8080");
        std::env::set_var(ENV_USERNAME, "alice");
        std::env::set_var(ENV_PASSWORD, "secret");
        std::env::set_var(ENV_RETRY_COUNT, "not-a-number");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains(ENV_RETRY_COUNT)));

        clear_env();
    }

    #[test]
    fn test_load_prefers_env_over_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let path = write_temp(
            r#"{
                "baseUrl": "http://from-file",
                "credentials": { "username": "f", "password": "f" }
            }"#,
            "json",
        );
        std::env::set_var(ENV_BASE_URL, "http://from-env");
        std::env::set_var(ENV_USERNAME, "e");
        std::env::set_var(ENV_PASSWORD, "e");

        let config = load(Some(path.clone())).unwrap();
        assert_eq!(config.base_url.host_str(), Some("from-env"));

        clear_env();
        let config = load(Some(path.clone())).unwrap();
        assert_eq!(config.base_url.host_str(), Some("from-file"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_surfaces_malformed_env_instead_of_falling_back() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let path = write_temp(
            r#"{
                "baseUrl": "http://from-file",
                "credentials": { "username": "f", "password": "f" }
            }"#,
            "json",
        );
        std::env::set_var(ENV_RETRY_COUNT, "abc");

        let err = load(Some(path.clone())).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains(ENV_RETRY_COUNT)));

        clear_env();
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = write_temp(
            r#"{
                "baseUrl": "http://erp.local",
                "credentials": { "username": "a", "password": "b" },
                "retryCount": 1,
                "retryDelay": 0
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.retry_count, 1);
        assert_eq!(config.retry_delay, Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_millis(30_000));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = write_temp(
            r#"
baseUrl = "http://erp.local"
timeout = 2500

[credentials]
username = "a"
password = "b"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.credentials.username, "a");
        assert_eq!(config.timeout, Duration::from_millis(2500));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/erpbridge.json")));
        assert!(matches!(result, Err(BridgeError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = write_temp(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(matches!(result, Err(BridgeError::Config(_))), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_read_settings_keeps_partial_documents() {
        let path = write_temp(r#"{ "credentials": { "username": "a" } }"#, "json");

        let settings = read_settings(Some(path.clone())).unwrap();
        assert_eq!(settings.missing_fields(), vec!["baseUrl", "credentials.password"]);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_probe_finds_nested_config_dir() {
        let dir = TempDir::new().unwrap();
        assert!(probe_in(dir.path()).is_none());

        std::fs::create_dir(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config").join("erpbridge.toml"), "").unwrap();
        assert_eq!(probe_in(dir.path()), Some(dir.path().join("config").join("erpbridge.toml")));

        std::fs::write(dir.path().join("erpbridge.json"), "{}").unwrap();
        assert_eq!(probe_in(dir.path()), Some(dir.path().join("erpbridge.json")));
    }

    #[test]
    fn test_parse_settings_unsupported_format() {
        let result = parse_settings("baseUrl: x", &PathBuf::from("erpbridge.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
