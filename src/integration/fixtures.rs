//! Test fixtures for integration tests
//!
//! Provides an in-memory library and identity resolver so playlists can be
//! generated without a Jellyfin server.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::auth::{IdentityResolver, RequestIdentity};
use crate::error::{PlaylistError, Result};
use crate::library::{ItemId, ItemKind, LibraryClient, LibraryItem};

pub const USER_TOKEN: &str = "user-token";
pub const RESTRICTED_TOKEN: &str = "restricted-token";
pub const API_KEY: &str = "api-key";

/// Deterministic item id for tests.
pub fn item_id(n: u128) -> ItemId {
    ItemId::new(Uuid::from_u128(n))
}

/// Library held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLibrary {
    items: HashMap<ItemId, LibraryItem>,
    children: HashMap<ItemId, Vec<ItemId>>,
    unlistable: HashSet<ItemId>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item. Items with a parent are also listed as its child.
    pub fn with_item(mut self, item: LibraryItem) -> Self {
        if let Some(parent) = item.parent_id {
            self.children.entry(parent).or_default().push(item.id);
        }
        self.items.insert(item.id, item);
        self
    }

    /// List `child` under `parent` without changing the child's parent.
    pub fn with_child(mut self, parent: ItemId, child: ItemId) -> Self {
        self.children.entry(parent).or_default().push(child);
        self
    }

    /// Make listing the children of `id` fail.
    pub fn with_unlistable(mut self, id: ItemId) -> Self {
        self.unlistable.insert(id);
        self
    }
}

#[async_trait]
impl LibraryClient for MemoryLibrary {
    async fn get_item(
        &self,
        id: &ItemId,
        _identity: &RequestIdentity,
    ) -> Result<Option<LibraryItem>> {
        Ok(self.items.get(id).cloned())
    }

    async fn get_children(
        &self,
        parent_id: &ItemId,
        _identity: &RequestIdentity,
    ) -> Result<Option<Vec<LibraryItem>>> {
        if self.unlistable.contains(parent_id) || !self.items.contains_key(parent_id) {
            return Ok(None);
        }
        let children = self
            .children
            .get(parent_id)
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id).cloned()).collect())
            .unwrap_or_default();
        Ok(Some(children))
    }

    async fn get_items(
        &self,
        ids: &[ItemId],
        _identity: &RequestIdentity,
    ) -> Result<Vec<LibraryItem>> {
        Ok(ids.iter().filter_map(|id| self.items.get(id).cloned()).collect())
    }
}

/// Fixed token to identity table.
#[derive(Debug, Clone)]
pub struct StaticIdentities {
    identities: HashMap<String, RequestIdentity>,
}

impl Default for StaticIdentities {
    /// A user who may download, a user who may not, and an API key.
    fn default() -> Self {
        let identities = [
            RequestIdentity::user(Uuid::from_u128(0x100), USER_TOKEN, true),
            RequestIdentity::user(Uuid::from_u128(0x101), RESTRICTED_TOKEN, false),
            RequestIdentity::api_key(API_KEY),
        ]
        .into_iter()
        .map(|identity| (identity.token_or_empty().to_string(), identity))
        .collect();
        Self { identities }
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentities {
    async fn resolve(&self, token: &str) -> Result<RequestIdentity> {
        self.identities
            .get(token)
            .cloned()
            .ok_or(PlaylistError::Unauthorized)
    }
}

/// A small library with one of everything.
///
/// ```text
/// 1  Shows (CollectionFolder)
/// ├─ 10 Lost (Series)
/// │  ├─ 11 <unnamed> Season 1
/// │  │  ├─ 12 Pilot (Episode 1)
/// │  │  └─ 13 <unnamed> (Episode 2, not downloadable)
/// │  └─ 14 Special (Season 2)
/// └─ 15 Stray (Episode)
/// 2  Music (CollectionFolder)
/// └─ 20 Miles Davis (MusicArtist)
///    └─ 21 Kind of Blue (MusicAlbum)
///       └─ 22 So What (Audio)
/// 3  Favourites (BoxSet), lists 10 and 15
/// 4  Empty (BoxSet)
/// 5  Nobody (MusicArtist), no albums
/// 6  Heat (Movie)
/// ```
pub fn sample_library() -> MemoryLibrary {
    MemoryLibrary::new()
        .with_item(LibraryItem::new(item_id(1), ItemKind::CollectionFolder).with_name("Shows"))
        .with_item(
            LibraryItem::new(item_id(10), ItemKind::Series)
                .with_name("Lost")
                .with_parent(item_id(1)),
        )
        .with_item(
            LibraryItem::new(item_id(11), ItemKind::Season)
                .with_index(1)
                .with_parent(item_id(10)),
        )
        .with_item(
            LibraryItem::new(item_id(12), ItemKind::Episode)
                .with_name("Pilot")
                .with_index(1)
                .with_parent(item_id(11)),
        )
        .with_item(
            LibraryItem::new(item_id(13), ItemKind::Episode)
                .with_index(2)
                .with_parent(item_id(11))
                .with_can_download(false),
        )
        .with_item(
            LibraryItem::new(item_id(14), ItemKind::Season)
                .with_name("Special")
                .with_index(2)
                .with_parent(item_id(10)),
        )
        .with_item(
            LibraryItem::new(item_id(15), ItemKind::Episode)
                .with_name("Stray")
                .with_parent(item_id(1)),
        )
        .with_item(LibraryItem::new(item_id(2), ItemKind::CollectionFolder).with_name("Music"))
        .with_item(
            LibraryItem::new(item_id(20), ItemKind::MusicArtist)
                .with_name("Miles Davis")
                .with_parent(item_id(2)),
        )
        .with_item(
            LibraryItem::new(item_id(21), ItemKind::MusicAlbum)
                .with_name("Kind of Blue")
                .with_parent(item_id(20)),
        )
        .with_item(
            LibraryItem::new(item_id(22), ItemKind::Audio)
                .with_name("So What")
                .with_parent(item_id(21)),
        )
        .with_item(LibraryItem::new(item_id(3), ItemKind::BoxSet).with_name("Favourites"))
        .with_child(item_id(3), item_id(10))
        .with_child(item_id(3), item_id(15))
        .with_item(LibraryItem::new(item_id(4), ItemKind::BoxSet).with_name("Empty"))
        .with_item(LibraryItem::new(item_id(5), ItemKind::MusicArtist).with_name("Nobody"))
        .with_item(LibraryItem::new(item_id(6), ItemKind::Movie).with_name("Heat"))
}
