//! The TOML config file shared by credentials and settings.

use std::path::{Path, PathBuf};

/// TOML config file format. Every table and field is optional.
#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct ConfigFile {
    pub pricing: Option<PricingConfig>,
    pub image_search: Option<ImageSearchConfig>,
    pub validation: Option<ValidationConfig>,
    pub paths: Option<PathsConfig>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct PricingConfig {
    pub service_key: Option<String>,
    pub base_url: Option<String>,
    pub inspect_day: Option<String>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct ImageSearchConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct ValidationConfig {
    pub start_id: Option<u32>,
    pub end_id: Option<u32>,
    pub batch_size: Option<u32>,
    pub request_delay_ms: Option<u64>,
    pub batch_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
pub struct PathsConfig {
    pub snapshot: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pricecat").join("config.toml"))
}

/// Load the config file from its default location, if present and valid.
pub fn load_config_file() -> Option<ConfigFile> {
    read_config_file(&config_path()?)
}

/// Parse a config file. A missing or unparsable file yields `None`; the
/// parse failure is logged so a typo does not silently drop every setting.
pub fn read_config_file(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            None
        }
    }
}
