//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `backend.base_url`
pub const BASE_URL_ENV: &str = "FOLIO_API_BASE_URL";

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "FOLIO_CONFIG_DIR";

const DEFAULT_BASE_URL: &str = "http://localhost/portfinal-api";
const DEFAULT_ASSET_ROOT: &str = "http://localhost/";

/// Folio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Request timeout; `None` leaves the transport default in place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub create_encoding: CreateEncoding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub root_url: String,
}

/// How the create endpoint expects its body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreateEncoding {
    /// multipart/form-data with an optional `imageFile` part
    #[default]
    Multipart,
    /// JSON `{title, description}`, no image support
    Json,
}

impl CreateEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Multipart => "multipart",
            Self::Json => "json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "multipart" | "form" => Some(Self::Multipart),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for CreateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: None,
                create_encoding: CreateEncoding::Multipart,
            },
            assets: AssetConfig {
                root_url: DEFAULT_ASSET_ROOT.to_string(),
            },
        }
    }
}

/// Check that a URL parses and uses http or https
fn validate_http_url(value: &str) -> anyhow::Result<()> {
    let url = Url::parse(value).with_context(|| format!("Invalid URL: {}", value))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("URL scheme must be http or https, got '{}'", other)),
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("folio")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location and apply the
    /// environment override for the backend URL
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_base_url_override(env::var(BASE_URL_ENV).ok())?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Replace the backend URL when an override is present and non-empty
    pub fn apply_base_url_override(&mut self, base_url: Option<String>) -> anyhow::Result<()> {
        if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            validate_http_url(&url)
                .with_context(|| format!("Invalid {} value", BASE_URL_ENV))?;
            self.backend.base_url = url;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_http_url(&self.backend.base_url).context("Invalid backend.base_url")?;
        validate_http_url(&self.assets.root_url).context("Invalid assets.root_url")?;
        if self.backend.timeout_secs == Some(0) {
            return Err(anyhow!("backend.timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "backend.base_url" => Ok(self.backend.base_url.clone()),
            "backend.timeout_secs" => Ok(self
                .backend
                .timeout_secs
                .map(|s| s.to_string())
                .unwrap_or_else(|| "(none)".to_string())),
            "backend.create_encoding" => Ok(self.backend.create_encoding.to_string()),
            "assets.root_url" => Ok(self.assets.root_url.clone()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `folio config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "backend.base_url" => {
                validate_http_url(value)?;
                self.backend.base_url = value.to_string();
            }
            "backend.timeout_secs" => {
                if value.eq_ignore_ascii_case("none") || value.is_empty() {
                    self.backend.timeout_secs = None;
                } else {
                    let secs: u64 = value
                        .parse()
                        .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
                    if secs == 0 {
                        return Err(anyhow!("Timeout must be greater than zero"));
                    }
                    self.backend.timeout_secs = Some(secs);
                }
            }
            "backend.create_encoding" => {
                self.backend.create_encoding = CreateEncoding::parse(value).ok_or_else(|| {
                    anyhow!(
                        "Invalid create encoding: {}. Valid options: multipart, json",
                        value
                    )
                })?;
            }
            "assets.root_url" => {
                validate_http_url(value)?;
                self.assets.root_url = value.to_string();
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `folio config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "backend.base_url",
            "backend.timeout_secs",
            "backend.create_encoding",
            "assets.root_url",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
