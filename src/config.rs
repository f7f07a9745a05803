use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

// =============================================================================
// Fixed constants
// =============================================================================

/// How long a refreshed list stays cached (24 hours)
pub const CACHE_TTL: Duration = Duration::from_secs(86_400);

/// Timeout for a single upstream request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each source refresh to avoid bursts (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Total attempts for a retried upstream request
pub const RETRY_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles on each further retry
pub const RETRY_BASE_DELAY_MS: u64 = 300;

/// Upstream statuses worth retrying
pub const RETRY_STATUS_CODES: &[u16] = &[408, 413, 429, 500, 502, 503, 504];

/// Tags requested per Docker Hub page
pub const DOCKER_PAGE_SIZE: usize = 100;

/// Pages read before the tag listing stops
pub const DOCKER_MAX_PAGES: usize = 25;

/// Oldest Node.js major served
pub const MIN_NODE_MAJOR: u32 = 12;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Service configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxyConfig {
    pub port: u16,
    /// Bearer token required on every route when set
    pub auth_token: Option<String>,
    pub cache: CacheConfig,
    pub refresh: RefreshConfig,
    pub log: LogConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
            cache: CacheConfig::default(),
            refresh: RefreshConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// SQLite database file; defaults to [`db_path`]
    pub path: Option<PathBuf>,
}

impl CacheConfig {
    pub fn db_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(db_path)
    }
}

/// When sources are refreshed ahead of requests
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshConfig {
    /// Refresh every source once after the server starts
    pub on_startup: bool,
    /// Refresh every source daily at midnight UTC
    pub scheduled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            on_startup: true,
            scheduled: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
    /// Write daily-rolling log files here instead of stdout
    pub directory: Option<PathBuf>,
}

impl ProxyConfig {
    /// Loads the config file if given, then applies environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => Self::default(),
        };

        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies `PORT` and `AUTH_TOKEN` from `lookup`. An empty token disables auth.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("invalid PORT {:?}", port))?;
        }

        if let Some(token) = lookup("AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
        self.auth_token = self.auth_token.filter(|token| !token.is_empty());

        Ok(self)
    }
}

/// Returns the path to the data directory for version-proxy.
/// Uses $XDG_DATA_HOME/version-proxy if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-proxy,
/// or ./version-proxy if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default cache database file.
pub fn db_path() -> PathBuf {
    data_dir().join("cache.db")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-proxy")
}
