//! Configuration management for the onboarding service
//!
//! Values resolve as env > TOML file > default.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::client::RetryPolicy;
use file::PapoConfigFile;

/// Default API port
pub const DEFAULT_PORT: u16 = 3000;

/// Default recognition/synthesis language
pub const DEFAULT_LANG: &str = "pt-BR";

/// Papo Social configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API server configuration
    pub server: ServerConfig,

    /// Speech language tag
    pub speech_lang: String,

    /// Onboarding client configuration
    pub client: ClientConfig,

    /// Path to the theme preference file
    pub theme_store_path: PathBuf,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Global requests-per-minute limit, disabled when `None`
    pub rate_limit_rpm: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            rate_limit_rpm: None,
        }
    }
}

/// Onboarding client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, including the `/api` prefix
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Retry policy for recoverable failures
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://localhost:{DEFAULT_PORT}/api"),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            speech_lang: DEFAULT_LANG.to_string(),
            client: ClientConfig::default(),
            theme_store_path: default_theme_store_path(),
        }
    }
}

impl Config {
    /// Load configuration from the environment and the optional config file
    #[must_use]
    pub fn load() -> Self {
        let fc = file::load_config_file();
        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed file and an env lookup
    pub fn resolve(fc: PapoConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let server = ServerConfig {
            host: env("PAPO_HOST")
                .or(fc.server.host)
                .unwrap_or(defaults.server.host),
            port: env("PAPO_PORT")
                .or_else(|| env("PORT"))
                .and_then(|p| parse_or_warn("PAPO_PORT", &p))
                .or(fc.server.port)
                .unwrap_or(defaults.server.port),
            rate_limit_rpm: env("PAPO_RATE_LIMIT_RPM")
                .and_then(|v| parse_or_warn("PAPO_RATE_LIMIT_RPM", &v))
                .or(fc.server.rate_limit_rpm)
                .filter(|rpm| *rpm > 0),
        };

        let speech_lang = env("PAPO_SPEECH_LANG")
            .or(fc.speech.lang)
            .unwrap_or(defaults.speech_lang);

        let retry_defaults = defaults.client.retry;
        let retry = RetryPolicy {
            max_retries: env("PAPO_MAX_RETRIES")
                .and_then(|v| parse_or_warn("PAPO_MAX_RETRIES", &v))
                .or(fc.client.max_retries)
                .unwrap_or(retry_defaults.max_retries),
            base_delay: fc
                .client
                .base_delay_ms
                .map_or(retry_defaults.base_delay, Duration::from_millis),
            max_delay: fc
                .client
                .max_delay_ms
                .map_or(retry_defaults.max_delay, Duration::from_millis),
            jitter_percent: fc
                .client
                .jitter_percent
                .unwrap_or(retry_defaults.jitter_percent),
        };

        let client = ClientConfig {
            base_url: env("PAPO_API_URL")
                .or(fc.client.base_url)
                .unwrap_or(defaults.client.base_url),
            timeout: env("PAPO_TIMEOUT_MS")
                .and_then(|v| parse_or_warn::<u64>("PAPO_TIMEOUT_MS", &v))
                .or(fc.client.timeout_ms)
                .map_or(defaults.client.timeout, Duration::from_millis),
            retry,
        };

        let theme_store_path = env("PAPO_THEME_STORE")
            .or(fc.theme.store_path)
            .map_or(defaults.theme_store_path, PathBuf::from);

        Self {
            server,
            speech_lang,
            client,
            theme_store_path,
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value, "ignoring unparseable config value");
    }
    parsed
}

/// Default theme store: `~/.local/share/papo-social/preferences.json`
fn default_theme_store_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".local/share/papo-social/preferences.json"),
        |d| d.data_dir().join("papo-social").join("preferences.json"),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_sources() {
        let config = Config::resolve(PapoConfigFile::default(), env_from(&[]));
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.speech_lang, "pt-BR");
        assert_eq!(config.client.base_url, "http://localhost:3000/api");
        assert!(config.server.rate_limit_rpm.is_none());
    }

    #[test]
    fn env_overrides_file() {
        let fc = file::parse_config("[server]\nport = 4000\n[speech]\nlang = \"en-US\"").unwrap();
        let config = Config::resolve(fc, env_from(&[("PAPO_PORT", "5000")]));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.speech_lang, "en-US");
    }

    #[test]
    fn bad_env_value_falls_back_to_file() {
        let fc = file::parse_config("[server]\nport = 4000").unwrap();
        let config = Config::resolve(fc, env_from(&[("PAPO_PORT", "not-a-port")]));
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn zero_rate_limit_disables_limiter() {
        let config = Config::resolve(
            PapoConfigFile::default(),
            env_from(&[("PAPO_RATE_LIMIT_RPM", "0")]),
        );
        assert!(config.server.rate_limit_rpm.is_none());
    }

    #[test]
    fn client_retry_from_file() {
        let fc = file::parse_config(
            "[client]\nmax_retries = 5\nbase_delay_ms = 10\njitter_percent = 0\ntimeout_ms = 250",
        )
        .unwrap();
        let config = Config::resolve(fc, env_from(&[]));
        assert_eq!(config.client.retry.max_retries, 5);
        assert_eq!(config.client.retry.base_delay, Duration::from_millis(10));
        assert_eq!(config.client.retry.jitter_percent, 0);
        assert_eq!(config.client.timeout, Duration::from_millis(250));
    }
}
