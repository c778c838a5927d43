//! Client configuration
//!
//! Reads config from ~/.config/pcloudfs/config.toml, then applies
//! environment overrides (`PCLOUD_USERNAME`, `PCLOUD_PASSWORD`,
//! `PCLOUD_API_HOST`, `PCLOUD_TIMEOUT`).

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::{RemoteError, Result};

/// US data-center API host
pub const DEFAULT_API_HOST: &str = "api.pcloud.com";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// pCloud account and transport configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PCloudConfig {
    pub username: Option<String>,
    /// Stored securely - auto-zeroed on drop
    pub password: Option<SecretString>,
    /// `api.pcloud.com` for US accounts, `eapi.pcloud.com` for EU accounts
    pub api_host: String,
    /// Per-request timeout of the HTTP client
    pub timeout_secs: u64,
}

impl Default for PCloudConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            api_host: DEFAULT_API_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PCloudConfig {
    /// Load configuration from the default path plus environment overrides
    ///
    /// A missing file yields defaults; an unreadable one is logged and ignored.
    pub fn load() -> Self {
        let path = Self::default_config_path();
        let config = if path.exists() {
            Self::load_from_path(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            })
        } else {
            Self::default()
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pcloudfs")
            .join("config.toml")
    }

    /// Load from a specific TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RemoteError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RemoteError::Config(e.to_string()))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(username) = lookup("PCLOUD_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("PCLOUD_PASSWORD") {
            self.password = Some(SecretString::new(password));
        }
        if let Some(host) = lookup("PCLOUD_API_HOST") {
            self.api_host = host;
        }
        if let Some(secs) = lookup("PCLOUD_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.timeout_secs = secs;
        }
        self
    }

    /// Create default config file if it doesn't exist
    pub fn create_default_if_missing() {
        let path = Self::default_config_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let default_config = r#"# pcloudfs Configuration

# username = "me@example.com"
# password = "secret"

# Use "eapi.pcloud.com" for accounts in the EU data center
api_host = "api.pcloud.com"
timeout_secs = 60
"#;
            let _ = std::fs::write(&path, default_config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = PCloudConfig::default();
        assert_eq!(config.api_host, "api.pcloud.com");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "username = \"me@example.com\"\npassword = \"hunter2\"\napi_host = \"eapi.pcloud.com\"\n",
        )
        .unwrap();

        let config = PCloudConfig::load_from_path(&path).unwrap();
        assert_eq!(config.username.as_deref(), Some("me@example.com"));
        assert_eq!(config.password.unwrap().expose_secret(), "hunter2");
        assert_eq!(config.api_host, "eapi.pcloud.com");
        // Missing keys fall back to defaults
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PCloudConfig::from_toml_str("timeout_secs = \"soon\""),
            Err(RemoteError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PCLOUD_USERNAME", "env@example.com"),
            ("PCLOUD_PASSWORD", "from-env"),
            ("PCLOUD_TIMEOUT", "5"),
        ]
        .into_iter()
        .collect();

        let config = PCloudConfig::from_toml_str("username = \"file@example.com\"")
            .unwrap()
            .with_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.username.as_deref(), Some("env@example.com"));
        assert_eq!(config.password.unwrap().expose_secret(), "from-env");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_host, DEFAULT_API_HOST);
    }
}
