//! Item classification and naming rules

use crate::library::{ItemKind, LibraryItem};

/// Labels used by the nested strategy when the library has no names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedLabels {
    /// Group title when the child's parent has no name
    pub title_fallback: &'static str,
    /// Prefix of the ordinal display name, e.g. "Season" in "Season 3"
    pub child_label: &'static str,
}

pub const SERIES_LABELS: NestedLabels = NestedLabels {
    title_fallback: "Unknown Series",
    child_label: "Season",
};

pub const ARTIST_LABELS: NestedLabels = NestedLabels {
    title_fallback: "Unknown Artist",
    child_label: "Album",
};

/// How a playlist is generated for a requested item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Box sets and library folders: mixed leaves and containers
    Collection,
    /// Albums, playlists and seasons: downloadable children
    ChildItems,
    /// Series and artists: one nested playlist per child
    Nested(NestedLabels),
    /// Nothing to generate
    Unsupported,
}

/// Pick the strategy for an item kind.
pub fn classify(kind: ItemKind) -> Strategy {
    match kind {
        ItemKind::BoxSet | ItemKind::CollectionFolder => Strategy::Collection,
        ItemKind::MusicAlbum | ItemKind::Playlist | ItemKind::Season => Strategy::ChildItems,
        ItemKind::Series => Strategy::Nested(SERIES_LABELS),
        ItemKind::MusicArtist => Strategy::Nested(ARTIST_LABELS),
        ItemKind::Audio
        | ItemKind::AudioBook
        | ItemKind::Episode
        | ItemKind::Movie
        | ItemKind::Video
        | ItemKind::Other => Strategy::Unsupported,
    }
}

impl ItemKind {
    /// Directly playable, no further structure.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            ItemKind::Audio
                | ItemKind::AudioBook
                | ItemKind::Movie
                | ItemKind::Video
                | ItemKind::Episode
        )
    }

    /// Resolved through a nested playlist when found inside a collection.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            ItemKind::MusicAlbum
                | ItemKind::MusicArtist
                | ItemKind::Playlist
                | ItemKind::Season
                | ItemKind::Series
        )
    }
}

/// Display name of episodes and seasons, with an ordinal fallback when the
/// stored name is blank. `None` for every other kind.
pub fn proper_name(item: &LibraryItem) -> Option<String> {
    let label = match item.kind {
        ItemKind::Episode => "Episode",
        ItemKind::Season => "Season",
        _ => return None,
    };

    match item.name.as_deref() {
        Some(name) if !name.trim().is_empty() => Some(name.to_string()),
        _ => Some(ordinal_name(label, item.index_number)),
    }
}

/// `"{label} {index}"`; a missing index renders as nothing.
pub fn ordinal_name(label: &str, index_number: Option<i32>) -> String {
    match index_number {
        Some(n) => format!("{} {}", label, n),
        None => format!("{} ", label),
    }
}
