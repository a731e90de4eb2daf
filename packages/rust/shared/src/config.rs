//! Application configuration for coursemigrate.
//!
//! User config lives at `~/.coursemigrate/coursemigrate.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::types::{MappingEntry, MappingTable, builtin_entries};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursemigrate.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursemigrate";

/// Substring identifying lecture-recording links and notices.
pub const DEFAULT_VIDEO_MARKER: &str = "ufl.zoom.us";

/// Substring identifying lecture timestamp lines.
pub const DEFAULT_TIMESTAMP_MARKER: &str = "Lecture - Fall";

/// Token the LMS export uses in place of its file store base path.
pub const DEFAULT_ASSET_PLACEHOLDER: &str = "$IMS-CC-FILEBASE$";

/// Relative path (from a generated page) to the exported web resources.
pub const DEFAULT_ASSET_BASE: &str = "../../tobeworkedon/web_resources";

// ---------------------------------------------------------------------------
// Config structs (matching coursemigrate.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Content filters applied during extraction.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Page mapping. Empty means the built-in table.
    #[serde(default = "builtin_entries")]
    pub pages: Vec<MappingEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
            filters: FiltersConfig::default(),
            pages: builtin_entries(),
        }
    }
}

impl AppConfig {
    /// Build the validated mapping table for this config.
    pub fn mapping_table(&self) -> Result<MappingTable> {
        if self.pages.is_empty() {
            return Ok(MappingTable::builtin());
        }
        MappingTable::new(self.pages.clone())
    }
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory holding the exported wiki pages.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Root directory of the generated site modules.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_source_dir() -> String {
    "tobeworkedon/wiki_content".into()
}
fn default_output_dir() -> String {
    "modules".into()
}

/// `[filters]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    /// Links whose `href` contains one of these are dropped, as is any text mentioning them.
    #[serde(default = "default_video_markers")]
    pub video_markers: Vec<String>,

    /// Text segments containing one of these are dropped.
    #[serde(default = "default_timestamp_markers")]
    pub timestamp_markers: Vec<String>,

    /// Placeholder token rewritten to `asset_base`.
    #[serde(default = "default_asset_placeholder")]
    pub asset_placeholder: String,

    /// Replacement for `asset_placeholder`.
    #[serde(default = "default_asset_base")]
    pub asset_base: String,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            video_markers: default_video_markers(),
            timestamp_markers: default_timestamp_markers(),
            asset_placeholder: default_asset_placeholder(),
            asset_base: default_asset_base(),
        }
    }
}

fn default_video_markers() -> Vec<String> {
    vec![DEFAULT_VIDEO_MARKER.into()]
}
fn default_timestamp_markers() -> Vec<String> {
    vec![DEFAULT_TIMESTAMP_MARKER.into()]
}
fn default_asset_placeholder() -> String {
    DEFAULT_ASSET_PLACEHOLDER.into()
}
fn default_asset_base() -> String {
    DEFAULT_ASSET_BASE.into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursemigrate/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MigrateError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursemigrate/coursemigrate.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load from an explicit path if given (which must exist), else from the default location.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) if !path.exists() => Err(MigrateError::config(format!(
            "config file not found: {}",
            path.display()
        ))),
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        MigrateError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_dir()?)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_at(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| MigrateError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MigrateError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MigrateError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
