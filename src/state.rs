//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - Server configuration
//! - The library client and identity resolver
//! - The playlist synthesizer

use std::sync::Arc;
use std::time::Duration;

use crate::auth::IdentityResolver;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::jellyfin::JellyfinClient;
use crate::library::LibraryClient;
use crate::playlist::Synthesizer;

/// Application state shared across all handlers
pub struct AppState {
    /// Library lookups
    pub library: Arc<dyn LibraryClient>,

    /// Caller authentication
    pub identities: Arc<dyn IdentityResolver>,

    /// Playlist generation
    pub synthesizer: Synthesizer,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create an AppState from explicit collaborators
    pub fn new(
        config: ServerConfig,
        library: Arc<dyn LibraryClient>,
        identities: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            library,
            identities,
            synthesizer: Synthesizer::new(config.playlist.clone()),
            config,
        }
    }

    /// Create an AppState backed by the configured Jellyfin server
    pub fn with_jellyfin(config: ServerConfig) -> Result<Self> {
        let client = JellyfinClient::new(&config.jellyfin)?;
        let library: Arc<dyn LibraryClient> = Arc::new(client.clone());
        let identities: Arc<dyn IdentityResolver> = Arc::new(client);
        Ok(Self::new(config, library, identities))
    }

    /// Upper bound for all library lookups of one request
    pub fn library_timeout(&self) -> Duration {
        Duration::from_secs(self.config.jellyfin.request_timeout_secs)
    }
}
