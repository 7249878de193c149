//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{JellyfinConfig, PlaylistConfig, ServerConfig};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Jellyfin settings
    pub jellyfin: JellyfinSettings,
    /// Playlist settings
    pub playlist: Option<PlaylistSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JellyfinSettings {
    /// Jellyfin server URL
    pub url: String,
    /// Library lookup timeout in seconds
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSettings {
    /// Prefix for generated URLs
    pub base_path: Option<String>,
    /// Direct links for every playable leaf kind
    pub all_leaf_downloads: Option<bool>,
    /// Client script override
    pub client_script_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let jellyfin = JellyfinConfig::default();
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8097,
                cors_enabled: Some(true),
            },
            jellyfin: JellyfinSettings {
                url: jellyfin.url,
                request_timeout_secs: Some(jellyfin.request_timeout_secs),
            },
            playlist: Some(PlaylistSettings {
                base_path: Some(String::new()),
                all_leaf_downloads: Some(false),
                client_script_path: None,
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        let playlist = self.playlist.unwrap_or(PlaylistSettings {
            base_path: None,
            all_leaf_downloads: None,
            client_script_path: None,
        });
        let (log_level, log_format) = match self.logging {
            Some(l) => (Some(l.level), l.format.unwrap_or(defaults.log_format)),
            None => (defaults.log_level, defaults.log_format),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            jellyfin: JellyfinConfig {
                url: self.jellyfin.url,
                request_timeout_secs: self
                    .jellyfin
                    .request_timeout_secs
                    .unwrap_or(defaults.jellyfin.request_timeout_secs),
            },
            playlist: PlaylistConfig {
                base_path: playlist.base_path.unwrap_or_default(),
                all_leaf_downloads: playlist.all_leaf_downloads.unwrap_or(false),
                client_script_path: playlist.client_script_path,
            },
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level,
            log_format,
        }
    }
}
