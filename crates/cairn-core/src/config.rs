use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Google OAuth client id registered for Cairn.
///
/// Overridable via `CAIRN_GOOGLE_CLIENT_ID` or the config file.
pub const DEFAULT_GOOGLE_CLIENT_ID: &str =
    "2006113013377-gn4n7u9b89v1g1i0aq0e8dbrmler57dt.apps.googleusercontent.com";

/// Platform the app is running on.
///
/// The web OAuth variant never yields a refresh credential, so `Web`
/// gates the silent-refresh path off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    #[default]
    Web,
}

impl Platform {
    /// Whether this platform can silently refresh access credentials.
    pub fn supports_refresh(&self) -> bool {
        !matches!(self, Platform::Web)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Google OAuth client id
    #[serde(default = "default_client_id")]
    pub google_client_id: String,

    /// Platform this build targets
    #[serde(default)]
    pub platform: Platform,

    /// Directory for persisted state (session, calendar reference, activities)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_client_id() -> String {
    DEFAULT_GOOGLE_CLIENT_ID.to_string()
}

fn default_data_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cairn"))
        .unwrap_or_else(|| PathBuf::from(".cairn"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_client_id: default_client_id(),
            platform: Platform::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from `<config dir>/cairn/cairn.toml`.
    ///
    /// A missing file yields the defaults. `CAIRN_GOOGLE_CLIENT_ID` in the
    /// environment overrides the file in either case.
    pub fn load() -> Result<Self> {
        let path = default_data_dir().join("cairn.toml");
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            toml::from_str(&raw).context("Failed to parse cairn.toml")?
        } else {
            Self::default()
        };

        if let Ok(client_id) = std::env::var("CAIRN_GOOGLE_CLIENT_ID") {
            if !client_id.is_empty() {
                config.google_client_id = client_id;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.google_client_id, DEFAULT_GOOGLE_CLIENT_ID);
        assert_eq!(config.platform, Platform::Web);
    }

    #[test]
    fn test_platform_refresh_gate() {
        assert!(Platform::Ios.supports_refresh());
        assert!(Platform::Android.supports_refresh());
        assert!(!Platform::Web.supports_refresh());
    }

    #[test]
    fn test_config_from_toml() {
        let config: Config = toml::from_str(
            r#"
            google_client_id = "other-client"
            platform = "ios"
            "#,
        )
        .unwrap();

        assert_eq!(config.google_client_id, "other-client");
        assert_eq!(config.platform, Platform::Ios);
    }
}
