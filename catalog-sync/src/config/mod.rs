//! Runtime configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CATALOG_SYNC_*` environment variables (a `.env` file is loaded by `main`).
//! Command-line flags are applied last by the command handlers.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPREADSHEET_ID: &str = "1pg0NqkjzQ2uv4y5p4wZVDamS4WulAS8fobJVt6_LW9k";
pub const DEFAULT_WORKSHEET: &str = "Web Series Metadata";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials/client_secret.json";
pub const DEFAULT_RECOMMENDATION_URL: &str =
    "https://recommendation-engine.api.aha.firstlight.ai/online/recommend";
pub const DEFAULT_MORE_LIKE_THIS_BASE: &str =
    "https://rg-srv.api.aha.firstlight.ai/recommendation/more-like-this";

const ENV_PREFIX: &str = "CATALOG_SYNC_";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Stable document identifier of the spreadsheet
    pub spreadsheet_id: String,
    /// Worksheet tab holding the catalog
    pub worksheet: String,
    /// Service-account key file
    pub credentials_file: PathBuf,
    pub recommendation_url: String,
    /// Prefix of the derived more-like-this URL written to the full url column
    pub more_like_this_base: String,
    /// Stop the whole run when a registration call cannot be delivered
    pub abort_on_registration_error: bool,
    /// Pre-issued bearer token; skips the service-account exchange
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            worksheet: DEFAULT_WORKSHEET.to_string(),
            credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            recommendation_url: DEFAULT_RECOMMENDATION_URL.to_string(),
            more_like_this_base: DEFAULT_MORE_LIKE_THIS_BASE.to_string(),
            abort_on_registration_error: true,
            access_token: None,
        }
    }
}

impl Config {
    /// `<config dir>/catalog-sync/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catalog-sync").join("config.toml"))
    }

    /// Load configuration from `explicit` (must exist) or the default path
    /// (optional), then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// Override fields from `CATALOG_SYNC_*` variables found by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| !v.trim().is_empty())
        };

        if let Some(v) = var("SPREADSHEET_ID") {
            self.spreadsheet_id = v;
        }
        if let Some(v) = var("WORKSHEET") {
            self.worksheet = v;
        }
        if let Some(v) = var("CREDENTIALS") {
            self.credentials_file = PathBuf::from(v);
        }
        if let Some(v) = var("RECOMMENDATION_URL") {
            self.recommendation_url = v;
        }
        if let Some(v) = var("ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.trim().is_empty() {
            bail!("spreadsheet_id must not be empty");
        }
        if self.worksheet.trim().is_empty() {
            bail!("worksheet must not be empty");
        }
        check_http_url("recommendation_url", &self.recommendation_url)?;
        check_http_url("more_like_this_base", &self.more_like_this_base)?;
        Ok(())
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .with_context(|| format!("{} is not a valid URL: {}", field, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{} must be an http(s) URL: {}", field, value);
    }
    Ok(())
}
