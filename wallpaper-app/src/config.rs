use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use wallpaper_controller::RefreshSettings;
use wallpaper_source::{UnsplashConfig, DEFAULT_COLLECTION, DEFAULT_ENDPOINT};
use wallpaper_theme::{SampleOptions, ALPHA_THRESHOLD, SAMPLE_WIDTH};

/// Overrides `access_key` when set and non-empty.
pub const ACCESS_KEY_ENV: &str = "WALLPAPER_ACCESS_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WallpaperConfig {
    pub database_path: Option<PathBuf>,
    pub api_endpoint: String,
    pub access_key: Option<String>,
    pub collection: Option<String>,
    pub refresh_interval_secs: u64,
    pub stale_after_secs: u64,
    pub sample_width: u32,
    pub alpha_threshold: u8,
    pub request_timeout_secs: u64,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            access_key: None,
            collection: Some(DEFAULT_COLLECTION.to_string()),
            refresh_interval_secs: 15 * 60,
            stale_after_secs: 15 * 60,
            sample_width: SAMPLE_WIDTH,
            alpha_threshold: ALPHA_THRESHOLD,
            request_timeout_secs: 30,
        }
    }
}

impl WallpaperConfig {
    /// Read the JSON config at `path` (defaults when `None`), then apply the
    /// environment override.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                Self::from_json(&raw)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        config
            .with_access_key_override(std::env::var(ACCESS_KEY_ENV).ok())
            .validated()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_access_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.access_key = Some(key);
        }
        self
    }

    pub fn validated(self) -> Result<Self> {
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be greater than zero");
        }
        if self.sample_width == 0 {
            bail!("sample_width must be greater than zero");
        }
        Ok(self)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path.clone().unwrap_or_else(default_database_path)
    }

    pub fn sample_options(&self) -> SampleOptions {
        SampleOptions {
            width: self.sample_width,
            alpha_threshold: self.alpha_threshold,
        }
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            stale_after: Duration::from_secs(self.stale_after_secs),
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            sample: self.sample_options(),
        }
    }

    pub fn unsplash(&self) -> UnsplashConfig {
        UnsplashConfig {
            endpoint: self.api_endpoint.clone(),
            access_key: self.access_key.clone(),
            collection: self.collection.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

/// `<data dir>/wallpaper/wallpaper.db`, e.g. `~/.local/share/wallpaper/wallpaper.db` on Linux.
fn default_database_path() -> PathBuf {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("wallpaper");
    path.push("wallpaper.db");
    path
}
