//! Playlist generator for Jellyfin
//!
//! Serves M3U8 playlists for library containers (collections, box sets,
//! series, seasons, artists, albums, playlists) whose entries link to the
//! server's direct-download endpoint.

mod auth;
mod config;
mod config_file;
mod error;
mod http;
mod jellyfin;
mod library;
mod playlist;
mod state;


use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::config_file::ConfigFile;
use crate::error::{PlaylistError, Result};
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "playlist-gen";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(default_value = "config.toml")]
    config: PathBuf,

    /// Jellyfin server URL, overrides the config file
    #[arg(short, long)]
    jellyfin_url: Option<String>,

    /// Prefix for generated URLs, overrides the config file
    #[arg(short, long)]
    base_path: Option<String>,

    /// Listen address (host:port), overrides the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// Print a default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        let content = ConfigFile::default_config()
            .to_toml()
            .map_err(|e| PlaylistError::Config(e.to_string()))?;
        print!("{}", content);
        return Ok(());
    }

    let config = apply_args(load_config(&args.config), &args)?;

    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    tracing::info!("Configuration loaded: {:?}", config);

    config.jellyfin.validate().map_err(PlaylistError::Config)?;

    // Create application state
    let state = Arc::new(AppState::with_jellyfin(config.clone())?);

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| PlaylistError::Config(format!("{}: {}", config.socket_addr(), e)))?;
    tracing::info!("Starting HTTP server on {}", addr);
    tracing::info!("Generating playlists for {}", config.jellyfin.url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the config file, falling back to defaults when it is absent or broken.
///
/// Logging is not initialized yet, so problems go to stderr.
fn load_config(path: &Path) -> ServerConfig {
    if !path.exists() {
        return ServerConfig::default();
    }
    match ConfigFile::from_file(path) {
        Ok(cf) => cf.into_server_config(),
        Err(e) => {
            eprintln!(
                "Failed to load config file {}: {}. Using defaults.",
                path.display(),
                e
            );
            ServerConfig::default()
        }
    }
}

/// Apply command line overrides.
fn apply_args(mut config: ServerConfig, args: &Args) -> Result<ServerConfig> {
    if let Some(url) = &args.jellyfin_url {
        config.jellyfin.url = url.clone();
    }
    if let Some(base_path) = &args.base_path {
        config.playlist.base_path = base_path.clone();
    }
    if let Some(listen) = &args.listen {
        let addr: SocketAddr = listen
            .parse()
            .map_err(|e| PlaylistError::Config(format!("--listen {}: {}", listen, e)))?;
        config.host = addr.ip().to_string();
        config.port = addr.port();
    }
    Ok(config)
}

/// Filter used when `RUST_LOG` is not set.
fn default_filter(config: &ServerConfig) -> String {
    match &config.log_level {
        Some(level) => format!("playlist_gen={0},tower_http={0}", level),
        None => "playlist_gen=debug,tower_http=debug".to_string(),
    }
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(config).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
