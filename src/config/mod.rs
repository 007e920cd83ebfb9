//! Configuration management for captionfeed.
//!
//! Configuration is read from `~/.config/captionfeed/config.toml` unless a
//! path is given on the command line. If the default file doesn't exist, it
//! is created with commented defaults.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::normalizer::links::{DEFAULT_HOST, DEFAULT_SUBDOMAIN};

pub const DEFAULT_UPSTREAM_URL: &str = "https://xkcd.com/atom.xml";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub rewrite: RewriteConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

/// Where and how the upstream feed is fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            timeout_secs: 10,
            user_agent: concat!("captionfeed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Host whose `http://` links are upgraded before parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub host: String,
    /// Optional subdomain that is matched and kept, e.g. `imgs`
    pub subdomain: Option<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            subdomain: Some(DEFAULT_SUBDOMAIN.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// SQLite file; defaults to `<data dir>/captionfeed/cache.db`
    pub path: Option<PathBuf>,
    /// Let a single request refill an expired cache while others wait
    pub coalesce: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is not an address: {}", self.bind)))
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. The default file is created with
    /// comments when missing. Missing fields use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: config_path,
                source,
            },
            other => other,
        })?;

        Ok(config)
    }

    /// Parse and validate TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.upstream.url)
            .map_err(|e| ConfigError::Invalid(format!("upstream.url {}: {}", self.upstream.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "upstream.url must be http or https: {}",
                self.upstream.url
            )));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid("upstream.timeout_secs must be positive".into()));
        }
        if self.rewrite.host.is_empty() {
            return Err(ConfigError::Invalid("rewrite.host is empty".into()));
        }
        self.server.bind_addr()?;
        Ok(())
    }

    /// Get the default config file path: `~/.config/captionfeed/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("captionfeed").join("config.toml"))
    }

    /// Get the default cache database path: `~/.local/share/captionfeed/cache.db`
    pub fn default_cache_path() -> Result<PathBuf, ConfigError> {
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("captionfeed").join("cache.db"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# captionfeed configuration

[upstream]
# Atom feed to republish
url = "https://xkcd.com/atom.xml"

# Request timeout in seconds
timeout_secs = 10

[rewrite]
# http:// links to this host (and the optional subdomain) become https://
host = "xkcd.com"
subdomain = "imgs"

[cache]
# "memory" keeps the feed in this process, "sqlite" shares it through a file
backend = "memory"

# Database file for the sqlite backend
# path = "/var/cache/captionfeed/cache.db"

# Only one request refreshes an expired feed; the rest wait for it
coalesce = false

[server]
bind = "127.0.0.1:8080"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine data directory")]
    NoDataDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
