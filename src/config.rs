//! Runtime configuration.
//!
//! Values come from the command line (with environment fallbacks) and are
//! validated once here before anything talks to the network.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use clap::ValueEnum;
use miette::Diagnostic;
use reqwest::Url;
use thiserror::Error;
use tracing::warn;

use crate::client::ClientConfig;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_DEPTH_LIMIT: usize = 25;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Invalid OpenProject URL '{url}': {message}")]
    #[diagnostic(
        code(openproject_mcp::config::invalid_url),
        help("Pass the instance root, e.g. --url https://openproject.example.com")
    )]
    InvalidUrl { url: String, message: String },

    #[error("Unsupported URL scheme '{scheme}'")]
    #[diagnostic(
        code(openproject_mcp::config::unsupported_scheme),
        help("Only http and https are supported")
    )]
    UnsupportedScheme { scheme: String },

    #[error("OpenProject API key is empty")]
    #[diagnostic(
        code(openproject_mcp::config::missing_api_key),
        help("Create a key under My account > Access tokens and set OPENPROJECT_API_KEY")
    )]
    MissingApiKey,
}

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// Streamable HTTP mounted at `/mcp`.
    Http,
}

/// Limits applied by the tool layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// Deadline for one tool call, all remote calls included.
    pub operation_timeout: Duration,
    /// Ceiling for the caller-supplied hierarchy depth.
    pub max_depth_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            max_depth_limit: DEFAULT_MAX_DEPTH_LIMIT,
        }
    }
}

/// Complete, validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub server: ServerSettings,
    pub transport: Transport,
    /// Bind address for the HTTP transport.
    pub host: IpAddr,
    /// Listen port for the HTTP transport.
    pub port: u16,
}

impl Config {
    /// Validated configuration with default limits and stdio transport.
    pub fn new(url: &str, api_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client: ClientConfig {
                base_url: parse_base_url(url)?,
                api_key: validate_api_key(api_key)?,
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
            },
            server: ServerSettings::default(),
            transport: Transport::default(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        })
    }
}

/// Parse the instance URL. Trailing slashes are dropped; plain http is
/// accepted with a warning.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    match url.scheme() {
        "https" => {}
        "http" => {
            warn!(url = %url, "OpenProject URL uses plain http; the API key is sent unencrypted")
        }
        other => {
            return Err(ConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            });
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            message: "missing host".to_string(),
        });
    }

    Ok(url)
}

pub fn validate_api_key(raw: &str) -> Result<String, ConfigError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(key.to_string())
}
