use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "COINCONV_API_URL";

/// Shape of the payload wrapper returned by the fiat list endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FiatEnvelope {
    /// `{"data": {"data": [...]}}`
    #[default]
    Nested,
    /// `{"data": [...]}`
    Flat,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub fiat_envelope: FiatEnvelope,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:3000".to_string(),
            fiat_envelope: FiatEnvelope::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormConfig {
    #[serde(default = "FormConfig::default_min_amount")]
    pub min_amount: Decimal,
    #[serde(default = "FormConfig::default_currency")]
    pub default_currency: String,
}

impl FormConfig {
    fn default_min_amount() -> Decimal {
        Decimal::new(1, 3)
    }

    fn default_currency() -> String {
        "USD".to_string()
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            min_amount: Self::default_min_amount(),
            default_currency: Self::default_currency(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub form: FormConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "coinconv", "coinconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Applies the base URL overrides. The flag wins over the environment.
    pub fn with_base_url_override(mut self, env_url: Option<String>, flag_url: Option<&str>) -> Self {
        if let Some(url) = flag_url
            .map(str::to_string)
            .or(env_url.filter(|u| !u.trim().is_empty()))
        {
            debug!("Overriding base url with {}", url);
            self.api.base_url = url;
        }
        self.api.base_url = self.api.base_url.trim_end_matches('/').to_string();
        self
    }
}
