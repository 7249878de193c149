//! Playlist synthesis
//!
//! Turns a library snapshot into an M3U8 document. Synthesis performs no
//! I/O: everything it reads was fetched into the snapshot beforehand.

use crate::auth::{can_download, RequestIdentity};
use crate::config::PlaylistConfig;
use crate::error::{PlaylistError, Result};
use crate::library::{LibraryItem, LibrarySnapshot};

use super::classify::{classify, ordinal_name, proper_name, NestedLabels, Strategy};
use super::m3u8::{PlaylistDocument, PlaylistEntry};
use super::url::UrlBuilder;

/// Generates playlists with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: PlaylistConfig,
}

impl Synthesizer {
    pub fn new(config: PlaylistConfig) -> Self {
        Self { config }
    }

    /// Build the playlist entries for the snapshot's item.
    pub fn build(&self, snapshot: &LibrarySnapshot, identity: &RequestIdentity) -> PlaylistDocument {
        let urls = UrlBuilder::from_config(&self.config, identity.token_or_empty());
        let item = &snapshot.item;

        match classify(item.kind) {
            Strategy::Collection => {
                tracing::info!(
                    "Generating collection type playlist for {} ({})",
                    item.name_or_empty(),
                    item.id
                );
                collection_entries(snapshot, identity, &urls)
            }
            Strategy::ChildItems => {
                tracing::info!(
                    "Generating child items playlist for {} ({})",
                    item.name_or_empty(),
                    item.id
                );
                child_item_entries(snapshot, identity, &urls)
            }
            Strategy::Nested(labels) => {
                tracing::info!(
                    "Generating nested {} playlist for {} ({})",
                    labels.child_label.to_lowercase(),
                    item.name_or_empty(),
                    item.id
                );
                nested_entries(snapshot, &urls, labels)
            }
            Strategy::Unsupported => {
                tracing::debug!("No playlist strategy for {} ({})", item.kind, item.id);
                PlaylistDocument::new()
            }
        }
    }

    /// Render the playlist, failing with `UnsupportedMedia` when there is
    /// nothing to put in it.
    pub fn synthesize(&self, snapshot: &LibrarySnapshot, identity: &RequestIdentity) -> Result<String> {
        let item = &snapshot.item;
        self.build(snapshot, identity).render().ok_or_else(|| {
            PlaylistError::UnsupportedMedia(format!("{} ({})", item.kind, item.id))
        })
    }
}

fn parent_name<'a>(snapshot: &'a LibrarySnapshot, child: &LibraryItem) -> Option<&'a str> {
    snapshot.parent_of(child).and_then(|p| p.name.as_deref())
}

/// Box sets and library folders.
///
/// Playable children link straight to their download when the caller may
/// download them. Container children always link to their own playlist;
/// permissions are checked when that playlist is requested.
fn collection_entries(
    snapshot: &LibrarySnapshot,
    identity: &RequestIdentity,
    urls: &UrlBuilder,
) -> PlaylistDocument {
    let mut doc = PlaylistDocument::new();

    for child in &snapshot.children {
        let group_title = parent_name(snapshot, child).unwrap_or("");

        if child.kind.is_leaf() {
            if !can_download(identity, child) {
                tracing::debug!(
                    "Skipping {} ({}): download not permitted",
                    child.name_or_empty(),
                    child.id
                );
                continue;
            }
            let Some(url) = urls.download_url(child) else {
                tracing::debug!(
                    "Skipping {} ({}): no download link for {}",
                    child.name_or_empty(),
                    child.id,
                    child.kind
                );
                continue;
            };
            doc.push(PlaylistEntry::new(group_title, child.name_or_empty(), url));
        } else if child.kind.is_container() {
            doc.push(PlaylistEntry::new(
                group_title,
                child.name_or_empty(),
                urls.nested_playlist_url(&child.id),
            ));
        }
    }

    doc
}

/// Albums, playlists and seasons: one download per permitted child.
fn child_item_entries(
    snapshot: &LibrarySnapshot,
    identity: &RequestIdentity,
    urls: &UrlBuilder,
) -> PlaylistDocument {
    let mut doc = PlaylistDocument::new();

    for child in snapshot.children.iter().filter(|c| can_download(identity, c)) {
        let Some(url) = urls.download_url(child) else {
            tracing::debug!(
                "Skipping {} ({}): no download link for {}",
                child.name_or_empty(),
                child.id,
                child.kind
            );
            continue;
        };

        let group_title = snapshot
            .parent_of(child)
            .and_then(|p| proper_name(p).or_else(|| p.name.clone()))
            .unwrap_or_default();
        let display_name = proper_name(child)
            .or_else(|| child.name.clone())
            .unwrap_or_default();

        doc.push(PlaylistEntry::new(group_title, display_name, url));
    }

    doc
}

/// Series and artists: every child becomes a nested playlist link.
fn nested_entries(
    snapshot: &LibrarySnapshot,
    urls: &UrlBuilder,
    labels: NestedLabels,
) -> PlaylistDocument {
    snapshot
        .children
        .iter()
        .map(|child| {
            let display_name = proper_name(child)
                .unwrap_or_else(|| ordinal_name(labels.child_label, child.index_number));
            let group_title = parent_name(snapshot, child).unwrap_or(labels.title_fallback);
            PlaylistEntry::new(group_title, display_name, urls.nested_playlist_url(&child.id))
        })
        .collect()
}
