//! Configuration loading, validation, and management for MetalAgent.
//!
//! Loads configuration from `~/.metalagent/config.toml` (or an explicit
//! path) with environment variable overrides. A missing file is not an
//! error: every field has a default that matches the stock data layout
//! (`data/*.txt`, `data/subgenres.txt`, `spotify_album_ids.csv`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the default provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_provider")]
    pub default_provider: String,

    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Upper bound on LLM round trips per chat turn.
    #[serde(default = "default_max_tool_iterations")]
    pub max_tool_iterations: u32,

    /// Release catalog and album-id table locations and limits.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Streaming-player embed markup.
    #[serde(default)]
    pub embed: EmbedConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider-specific overrides, keyed by provider name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-1.5-flash-latest".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_max_tool_iterations() -> u32 {
    8
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("max_tool_iterations", &self.max_tool_iterations)
            .field("catalog", &self.catalog)
            .field("embed", &self.embed)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .finish()
    }
}

/// How the genre menu orders records before keeping the newest tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingOrder {
    /// Stable sort by normalized release date; undated records count as oldest.
    #[default]
    ReleaseDate,
    /// Trust file order and take the last entries.
    AsLoaded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding the release `*.txt` files and the subgenre listing.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the subgenre listing inside `data_dir`.
    #[serde(default = "default_subgenres_file")]
    pub subgenres_file: String,

    /// Line separating release blocks within a file.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// CSV mapping (artist, album) to a streaming album id.
    #[serde(default = "default_album_ids_path")]
    pub album_ids_path: PathBuf,

    /// Header of the id column in the album-id CSV.
    #[serde(default = "default_album_id_column")]
    pub album_id_column: String,

    /// Maximum entries in a `get_menu` listing.
    #[serde(default = "default_menu_limit")]
    pub menu_limit: usize,

    /// Maximum entries in a `recommend_releases` listing.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Length of the trailing release window, in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    #[serde(default)]
    pub listing_order: ListingOrder,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_subgenres_file() -> String {
    "subgenres.txt".into()
}
fn default_delimiter() -> String {
    "-".repeat(40)
}
fn default_album_ids_path() -> PathBuf {
    PathBuf::from("spotify_album_ids.csv")
}
fn default_album_id_column() -> String {
    "Spotify Album ID".into()
}
fn default_menu_limit() -> usize {
    100
}
fn default_recent_limit() -> usize {
    15
}
fn default_window_days() -> u32 {
    30
}

impl CatalogConfig {
    /// Full path of the subgenre listing.
    pub fn subgenres_path(&self) -> PathBuf {
        self.data_dir.join(&self.subgenres_file)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            subgenres_file: default_subgenres_file(),
            delimiter: default_delimiter(),
            album_ids_path: default_album_ids_path(),
            album_id_column: default_album_id_column(),
            menu_limit: default_menu_limit(),
            recent_limit: default_recent_limit(),
            window_days: default_window_days(),
            listing_order: ListingOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Prepended to the album id to form the player URL.
    #[serde(default = "default_embed_prefix")]
    pub url_prefix: String,

    #[serde(default = "default_embed_width")]
    pub width: String,

    #[serde(default = "default_embed_height")]
    pub height: u32,
}

fn default_embed_prefix() -> String {
    "https://open.spotify.com/embed/album/".into()
}
fn default_embed_width() -> String {
    "100%".into()
}
fn default_embed_height() -> u32 {
    380
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            url_prefix: default_embed_prefix(),
            width: default_embed_width(),
            height: default_embed_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl AppConfig {
    /// Load from `path` if given, else from `~/.metalagent/config.toml`,
    /// then apply environment overrides:
    ///
    /// - `METALAGENT_API_KEY`, `GOOGLE_API_KEY`, `OPENAI_API_KEY` (first set wins,
    ///   only when no key is configured)
    /// - `METALAGENT_PROVIDER`, `METALAGENT_MODEL`, `METALAGENT_DATA_DIR`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"));
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = ["METALAGENT_API_KEY", "GOOGLE_API_KEY", "OPENAI_API_KEY"]
                .iter()
                .find_map(|key| lookup(key).filter(|v| !v.is_empty()));
        }
        if let Some(provider) = lookup("METALAGENT_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = lookup("METALAGENT_MODEL") {
            self.default_model = model;
        }
        if let Some(dir) = lookup("METALAGENT_DATA_DIR") {
            self.catalog.data_dir = PathBuf::from(dir);
        }
    }

    /// `~/.metalagent`
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".metalagent")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.max_tool_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_tool_iterations must be at least 1".into(),
            ));
        }
        if self.catalog.delimiter.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.delimiter must not be blank".into(),
            ));
        }
        if self.catalog.menu_limit == 0 || self.catalog.recent_limit == 0 {
            return Err(ConfigError::ValidationError(
                "catalog.menu_limit and catalog.recent_limit must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Default config as TOML (for `metalagent init`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            max_tool_iterations: default_max_tool_iterations(),
            catalog: CatalogConfig::default(),
            embed: EmbedConfig::default(),
            gateway: GatewayConfig::default(),
            providers: HashMap::new(),
        }
    }
}

fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
