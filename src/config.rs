//! Application-level configuration loading, including the identity handling
//! mode.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ARCHERY_LOG_CONFIG_PATH";
/// Environment variable forcing production identity handling regardless of
/// the config file.
const REQUIRE_IDENTITY_ENV: &str = "ARCHERY_LOG_REQUIRE_IDENTITY";

/// Fallback user id presented when the proxy headers are absent in
/// development operation.
const DEFAULT_DEV_USER_ID: &str = "dev_user_001";
/// Fallback email paired with [`DEFAULT_DEV_USER_ID`].
const DEFAULT_DEV_EMAIL: &str = "dev@example.com";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    identity: IdentityConfig,
}

/// How requests without proxy identity headers are treated.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// When false, requests lacking the proxy headers receive the fixed
    /// development identity; when true, they are rejected.
    pub require_proxy_headers: bool,
    /// User id of the development fallback identity.
    pub dev_user_id: String,
    /// Email of the development fallback identity.
    pub dev_email: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults, then apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(value) = env::var(REQUIRE_IDENTITY_ENV) {
            config.identity.require_proxy_headers =
                matches!(value.trim(), "1" | "true" | "yes" | "on");
        }

        config
    }

    /// Identity handling settings.
    pub fn identity(&self) -> &IdentityConfig {
        &self.identity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity: IdentityConfig {
                require_proxy_headers: false,
                dev_user_id: DEFAULT_DEV_USER_ID.to_owned(),
                dev_email: DEFAULT_DEV_EMAIL.to_owned(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at
/// [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    identity: RawIdentity,
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the identity section.
struct RawIdentity {
    require_proxy_headers: Option<bool>,
    dev_user_id: Option<String>,
    dev_email: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default().identity;
        Self {
            identity: IdentityConfig {
                require_proxy_headers: value
                    .identity
                    .require_proxy_headers
                    .unwrap_or(defaults.require_proxy_headers),
                dev_user_id: value.identity.dev_user_id.unwrap_or(defaults.dev_user_id),
                dev_email: value.identity.dev_email.unwrap_or(defaults.dev_email),
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into
/// account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_missing_fields_with_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"identity": {}}"#).unwrap();
        let config: AppConfig = raw.into();
        assert!(!config.identity.require_proxy_headers);
        assert_eq!(config.identity.dev_user_id, DEFAULT_DEV_USER_ID);
        assert_eq!(config.identity.dev_email, DEFAULT_DEV_EMAIL);
    }

    #[test]
    fn raw_config_honors_explicit_values() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"identity": {"require_proxy_headers": true, "dev_user_id": "local"}}"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();
        assert!(config.identity.require_proxy_headers);
        assert_eq!(config.identity.dev_user_id, "local");
        assert_eq!(config.identity.dev_email, DEFAULT_DEV_EMAIL);
    }

    #[test]
    fn empty_config_object_parses() {
        let raw: RawConfig = serde_json::from_str("{}").unwrap();
        let config: AppConfig = raw.into();
        assert!(!config.identity.require_proxy_headers);
    }
}
