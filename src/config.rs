use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::metadata::{
    ANIMEAPI_MAPPING_URL, JIKAN_ANIME_URL, REQUEST_TIMEOUT_SECONDS,
};
use crate::links::SiteCode;
use crate::registry::FieldRegistry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub sheet: SheetConfig,

    pub title: TitleConfig,

    pub watch_location: WatchLocationConfig,

    pub metadata: MetadataConfig,

    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// JSON file holding the tracked rows.
    pub path: String,

    /// Sheet row number of the first tracked row (row 1 holds the headers).
    pub first_data_row: usize,

    /// Keep user-entered fields when a row's ID is cleared.
    pub retain_data_on_clear: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: "sheet.json".to_string(),
            first_data_row: 2,
            retain_data_on_clear: false,
        }
    }
}

/// Cells holding the display settings the title formula reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Holds one of `Native`, `English`, `Romaji`.
    pub language_cell: String,

    /// Holds one of `MAL`, `AL`, `KT`, `SHK`, `SMK`.
    pub link_site_cell: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            language_cell: "Settings!$B$1".to_string(),
            link_site_cell: "Settings!$B$2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchLocationConfig {
    pub local_sentinel: String,

    pub local_marker: String,

    pub local_note: String,
}

impl Default for WatchLocationConfig {
    fn default() -> Self {
        Self {
            local_sentinel: "local".to_string(),
            local_marker: "💾".to_string(),
            local_note: "Stored on a local drive".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Primary metadata endpoint; `{id}` is replaced by the row's ID.
    pub primary_url: String,

    /// Cross-reference endpoint; `{id}` is replaced by the row's ID.
    pub cross_reference_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            primary_url: JIKAN_ANIME_URL.to_string(),
            cross_reference_url: ANIMEAPI_MAPPING_URL.to_string(),
            request_timeout_seconds: REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl MetadataConfig {
    #[must_use]
    pub fn primary_url_for(&self, id: impl std::fmt::Display) -> String {
        self.primary_url.replace("{id}", &id.to_string())
    }

    #[must_use]
    pub fn cross_reference_url_for(&self, id: impl std::fmt::Display) -> String {
        self.cross_reference_url.replace("{id}", &id.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Column headers in sheet order.
    pub columns: Vec<String>,

    /// Site columns the metadata mapper fills.
    pub sites: Vec<SiteCode>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: FieldRegistry::default_columns()
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            sites: SiteCode::ALL.to_vec(),
        }
    }
}

impl LayoutConfig {
    pub fn registry(&self) -> Result<FieldRegistry> {
        FieldRegistry::from_names(&self.columns).context("Invalid [layout] columns")
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("anisheet").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".anisheet").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.metadata.primary_url.trim().is_empty() {
            anyhow::bail!("metadata.primary_url cannot be empty");
        }

        if self.metadata.cross_reference_url.trim().is_empty() {
            anyhow::bail!("metadata.cross_reference_url cannot be empty");
        }

        if self.sheet.first_data_row == 0 {
            anyhow::bail!("sheet.first_data_row must be at least 1");
        }

        self.layout.registry()?;

        Ok(())
    }
}
