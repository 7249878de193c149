//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Jellyfin backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JellyfinConfig {
    /// Base URL of the Jellyfin server
    pub url: String,

    /// Timeout for a single library lookup in seconds
    pub request_timeout_secs: u64,
}

impl Default for JellyfinConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8096".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl JellyfinConfig {
    /// Validate the backend settings.
    pub fn validate(&self) -> Result<(), String> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("Jellyfin URL must start with http:// or https://".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Jellyfin request timeout must be at least one second".to_string());
        }
        Ok(())
    }
}

/// Playlist generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Prefix for every generated URL (trailing slashes are ignored)
    pub base_path: String,

    /// Emit direct download links for every playable leaf kind instead of
    /// episodes only
    #[serde(default)]
    pub all_leaf_downloads: bool,

    /// Serve the client script from this file instead of the embedded copy
    #[serde(default)]
    pub client_script_path: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Jellyfin backend
    pub jellyfin: JellyfinConfig,

    /// Playlist generation
    pub playlist: PlaylistConfig,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error); unset means debug
    pub log_level: Option<String>,

    /// Log format (pretty, json)
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8097,
            jellyfin: JellyfinConfig::default(),
            playlist: PlaylistConfig::default(),
            cors_enabled: true,
            log_level: None,
            log_format: "pretty".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
