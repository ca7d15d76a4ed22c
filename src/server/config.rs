//! Configuration loading for the server binary.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.korea-tourism-mcp/config.toml` (user)
//! 3. `/etc/korea-tourism-mcp/config.toml` (system)
//!
//! A missing file is not an error (everything has a default), except when
//! the path was given explicitly. Individual settings then resolve as
//! command-line flag > environment variable > config file > default. The
//! API key is never read from a file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::client::ClientFileConfig;
use crate::{Result, TourismError};

pub const ENV_TRANSPORT: &str = "MCP_TRANSPORT";
pub const ENV_HOST: &str = "MCP_HOST";
pub const ENV_PORT: &str = "MCP_PORT";
pub const ENV_PATH: &str = "MCP_PATH";
pub const ENV_LOG_LEVEL: &str = "MCP_LOG_LEVEL";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_PATH: &str = "/mcp";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

const CONFIG_DIR: &str = ".korea-tourism-mcp";
const SYSTEM_CONFIG: &str = "/etc/korea-tourism-mcp/config.toml";

/// How MCP clients reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    /// JSON-RPC lines on stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST, plus `/health`.
    #[serde(alias = "http")]
    #[value(alias = "http")]
    StreamableHttp,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::StreamableHttp => "streamable-http",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = TourismError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "streamable-http" | "http" => Ok(Transport::StreamableHttp),
            other => Err(TourismError::Configuration(format!(
                "unknown transport '{other}'; expected stdio, streamable-http or http"
            ))),
        }
    }
}

/// Contents of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerFileConfig,
    #[serde(default)]
    pub client: ClientFileConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerFileConfig {
    #[serde(default)]
    pub transport: Option<Transport>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Returns the defaults when no file exists and none was requested.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TourismError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| {
            TourismError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(TourismError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from(SYSTEM_CONFIG);
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}

/// Server settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub transport: Option<Transport>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub log_level: Option<String>,
}

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    /// MCP endpoint path, always starting with `/`.
    pub path: String,
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServerSettings {
    /// Resolve each setting as flag > environment > file > default.
    ///
    /// `lookup` abstracts `std::env::var`.
    pub fn resolve<F>(cli: &ServerOverrides, file: &ServerFileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let transport = match cli.transport {
            Some(t) => t,
            None => match lookup(ENV_TRANSPORT) {
                Some(raw) => raw.parse()?,
                None => file.transport.unwrap_or(defaults.transport),
            },
        };

        let port = match cli.port {
            Some(p) => p,
            None => match lookup(ENV_PORT) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    TourismError::Configuration(format!(
                        "{ENV_PORT} must be a port number, got '{raw}'"
                    ))
                })?,
                None => file.port.unwrap_or(defaults.port),
            },
        };

        let pick = |flag: &Option<String>, env: &str, file: &Option<String>, default: String| {
            flag.clone()
                .or_else(|| lookup(env))
                .or_else(|| file.clone())
                .unwrap_or(default)
        };

        let host = pick(&cli.host, ENV_HOST, &file.host, defaults.host);
        let path = pick(&cli.path, ENV_PATH, &file.path, defaults.path);
        let log_level = pick(&cli.log_level, ENV_LOG_LEVEL, &file.log_level, defaults.log_level);

        Ok(Self {
            transport,
            host,
            port,
            path: normalize_path(&path),
            log_level,
        })
    }

    /// `host:port` for binding the HTTP listener.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
