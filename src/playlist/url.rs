//! Playlist entry URLs
//!
//! Two kinds of links end up in a playlist: direct downloads of playable
//! items and links back to this generator for containers that need another
//! hop to resolve.

use crate::config::PlaylistConfig;
use crate::library::{ItemId, ItemKind, LibraryItem};

/// Strip every trailing `/` from a base path. Blank paths become empty.
pub fn normalize_base_path(base_path: &str) -> &str {
    if base_path.trim().is_empty() {
        return "";
    }
    base_path.trim_end_matches('/')
}

/// Builds entry URLs for one request.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_path: String,
    token: String,
    all_leaf_downloads: bool,
}

impl UrlBuilder {
    pub fn new(base_path: &str, token: &str) -> Self {
        Self {
            base_path: normalize_base_path(base_path).to_string(),
            token: token.to_string(),
            all_leaf_downloads: false,
        }
    }

    pub fn from_config(config: &PlaylistConfig, token: &str) -> Self {
        Self {
            all_leaf_downloads: config.all_leaf_downloads,
            ..Self::new(&config.base_path, token)
        }
    }

    /// Whether items of this kind get a direct download link.
    pub fn has_direct_download(&self, kind: ItemKind) -> bool {
        if self.all_leaf_downloads {
            kind.is_leaf()
        } else {
            kind == ItemKind::Episode
        }
    }

    /// `{base}/Items/{id}/Download?api_key={token}`, or `None` when the item
    /// is not directly downloadable.
    pub fn download_url(&self, item: &LibraryItem) -> Option<String> {
        if !self.has_direct_download(item.kind) {
            return None;
        }
        Some(format!(
            "{}/Items/{}/Download?api_key={}",
            self.base_path, item.id, self.token
        ))
    }

    /// `{base}/PlaylistGen/Items/{id}.m3u8?api_key={token}`
    pub fn nested_playlist_url(&self, id: &ItemId) -> String {
        format!(
            "{}/PlaylistGen/Items/{}.m3u8?api_key={}",
            self.base_path, id, self.token
        )
    }
}
