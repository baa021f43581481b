//! TOML configuration file loading
//!
//! Supports `~/.config/papo-social/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct PapoConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Speech recognition and synthesis
    #[serde(default)]
    pub speech: SpeechFileConfig,

    /// Onboarding client configuration
    #[serde(default)]
    pub client: ClientFileConfig,

    /// Theme preference storage
    #[serde(default)]
    pub theme: ThemeFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,

    /// Bind address (e.g. "0.0.0.0")
    pub host: Option<String>,

    /// Global requests-per-minute limit
    pub rate_limit_rpm: Option<u32>,
}

/// Speech configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// Recognition and synthesis language (e.g. "pt-BR")
    pub lang: Option<String>,
}

/// Onboarding client configuration
#[derive(Debug, Default, Deserialize)]
pub struct ClientFileConfig {
    /// API base URL (e.g. "http://localhost:3000/api")
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Maximum retry attempts after the first failure
    pub max_retries: Option<u32>,

    /// Base backoff delay in milliseconds
    pub base_delay_ms: Option<u64>,

    /// Backoff cap in milliseconds
    pub max_delay_ms: Option<u64>,

    /// Random extra backoff, in percent of the delay
    pub jitter_percent: Option<u32>,
}

/// Theme storage configuration
#[derive(Debug, Default, Deserialize)]
pub struct ThemeFileConfig {
    /// Path of the preference file
    pub store_path: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `PapoConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> PapoConfigFile {
    let Some(path) = config_file_path() else {
        return PapoConfigFile::default();
    };

    if !path.exists() {
        return PapoConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to parse config file, using defaults"
            );
            PapoConfigFile::default()
        }),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            PapoConfigFile::default()
        }
    }
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the content is not valid TOML for this schema
pub fn parse_config(content: &str) -> crate::Result<PapoConfigFile> {
    let config = toml::from_str(content)?;
    tracing::info!("loaded config file");
    Ok(config)
}

/// Return the config file path: `~/.config/papo-social/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("papo-social").join("config.toml"))
}
