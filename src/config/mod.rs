//! Configuration and credential storage

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com";
pub const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Azure AD tenant ID (or verified domain)
    pub tenant_id: Option<String>,
    /// App registration client ID
    pub client_id: Option<String>,
    /// App registration client secret
    pub client_secret: Option<String>,
    /// Pre-issued Graph access token; takes precedence over the client secret
    pub access_token: Option<String>,
    /// Graph API root, without version segment
    pub graph_endpoint: Option<String>,
    /// Azure AD authority root
    pub login_endpoint: Option<String>,
    /// HTTP request timeout applied by the transport
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get config file path
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "aad-facade", "aad-facade")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        // Set restrictive permissions on config file (contains secrets)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).context("Failed to set config permissions")?;
        }

        Ok(())
    }

    /// Environment variables override values from the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let pairs: [(&str, &mut Option<String>); 4] = [
            ("AZURE_TENANT_ID", &mut self.tenant_id),
            ("AZURE_CLIENT_ID", &mut self.client_id),
            ("AZURE_CLIENT_SECRET", &mut self.client_secret),
            ("GRAPH_ACCESS_TOKEN", &mut self.access_token),
        ];
        for (key, slot) in pairs {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }
    }

    /// Merge explicitly provided values; `None` leaves the stored value alone.
    pub fn merge(&mut self, other: Config) {
        fn take(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        take(&mut self.tenant_id, other.tenant_id);
        take(&mut self.client_id, other.client_id);
        take(&mut self.client_secret, other.client_secret);
        take(&mut self.access_token, other.access_token);
        take(&mut self.graph_endpoint, other.graph_endpoint);
        take(&mut self.login_endpoint, other.login_endpoint);
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }

    /// Graph API root, validated
    pub fn graph_endpoint(&self) -> Result<Url> {
        let raw = self
            .graph_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GRAPH_ENDPOINT);
        Url::parse(raw).with_context(|| format!("Invalid graph endpoint: {}", raw))
    }

    pub fn login_endpoint(&self) -> &str {
        self.login_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_LOGIN_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
