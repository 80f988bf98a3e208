use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalize::RatingPlaceholder;

/// Root application configuration, loaded from `~/.config/litopia/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
}

/// Google Books endpoint and request shaping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub max_results: u32,
    pub lang_restrict: String,
    pub print_type: String,
    pub min_interval_ms: u64,
    pub max_retries: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: usize,
    pub page_window: usize,
    pub fallback_query: String,
    pub rating_placeholder: RatingPlaceholder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub store_file: String,
    pub library_key: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            max_results: 40,
            lang_restrict: "id,en".to_string(),
            print_type: "books".to_string(),
            min_interval_ms: 250,
            max_retries: 2,
            user_agent: format!("litopia/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            page_window: 5,
            fallback_query: "bestseller".to_string(),
            rating_placeholder: RatingPlaceholder::PerFetch,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("litopia");

        Self {
            data_dir: data_dir.to_string_lossy().to_string(),
            store_file: "storage.json".to_string(),
            library_key: "litopiaLibrary".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/litopia/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("LITOPIA_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("litopia")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.catalog.page_size == 0 {
            return Err(crate::error::LitopiaError::ConfigError(
                "catalog.page_size must be at least 1".to_string(),
            ));
        }
        if self.catalog.page_window == 0 {
            return Err(crate::error::LitopiaError::ConfigError(
                "catalog.page_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Path to the key-value store file backing the library.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir).join(&self.storage.store_file)
    }
}
