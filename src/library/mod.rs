//! Media library model
//!
//! This module defines the request-scoped view of the media library:
//! - Library items and their kinds
//! - The `LibraryClient` trait used to look items up
//! - `LibrarySnapshot`, everything the synthesizer needs for one request

pub mod snapshot;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::RequestIdentity;
use crate::error::{PlaylistError, Result};

pub use snapshot::{fetch_snapshot, LibrarySnapshot};

/// Library item identifier.
///
/// Jellyfin ids are GUIDs. They are accepted in hyphenated or simple form
/// and always rendered in the 32 hex digit simple form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<Uuid> for ItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for ItemId {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| PlaylistError::InvalidItemId(s.to_string()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Kind of a library item, as reported by the library server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Audio,
    AudioBook,
    BoxSet,
    CollectionFolder,
    Episode,
    Movie,
    MusicAlbum,
    MusicArtist,
    Playlist,
    Season,
    Series,
    Video,
    /// Any kind the generator has no use for (folders, photos, books...).
    #[serde(other)]
    Other,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One node of the library tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub name: Option<String>,
    /// Ordinal of episodes and seasons.
    pub index_number: Option<i32>,
    /// Weak back-reference to the owning item.
    pub parent_id: Option<ItemId>,
    /// Download capability reported by the library for the acting user.
    pub can_download: Option<bool>,
}

impl LibraryItem {
    pub fn new(id: ItemId, kind: ItemKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            index_number: None,
            parent_id: None,
            can_download: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_index(mut self, index_number: i32) -> Self {
        self.index_number = Some(index_number);
        self
    }

    pub fn with_parent(mut self, parent_id: ItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_can_download(mut self, can_download: bool) -> Self {
        self.can_download = Some(can_download);
        self
    }

    /// Name, or the empty string when the library has none.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Read access to the media library.
///
/// Every call carries the identity of the caller so that implementations
/// can scope lookups to what that user may see.
#[async_trait]
pub trait LibraryClient: Send + Sync {
    /// Look up a single item. `Ok(None)` when the id does not resolve.
    async fn get_item(
        &self,
        id: &ItemId,
        identity: &RequestIdentity,
    ) -> Result<Option<LibraryItem>>;

    /// Direct (non-recursive) children of an item, in listing order.
    /// `Ok(None)` when the children cannot be listed.
    async fn get_children(
        &self,
        parent_id: &ItemId,
        identity: &RequestIdentity,
    ) -> Result<Option<Vec<LibraryItem>>>;

    /// Batch lookup. Ids that do not resolve are left out of the result.
    async fn get_items(
        &self,
        ids: &[ItemId],
        identity: &RequestIdentity,
    ) -> Result<Vec<LibraryItem>>;
}
