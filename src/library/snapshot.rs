//! Request-scoped library snapshot

use std::collections::HashMap;

use crate::auth::RequestIdentity;
use crate::error::{PlaylistError, Result};

use super::{ItemId, LibraryClient, LibraryItem};

/// Everything playlist synthesis reads for one request.
#[derive(Debug, Clone)]
pub struct LibrarySnapshot {
    /// The requested item
    pub item: LibraryItem,

    /// Direct children, in the order the library listed them
    pub children: Vec<LibraryItem>,

    /// Parents of the children, keyed by id
    pub parents: HashMap<ItemId, LibraryItem>,
}

impl LibrarySnapshot {
    pub fn new(item: LibraryItem, children: Vec<LibraryItem>) -> Self {
        let mut parents = HashMap::new();
        parents.insert(item.id, item.clone());
        Self {
            item,
            children,
            parents,
        }
    }

    pub fn with_parent(mut self, parent: LibraryItem) -> Self {
        self.parents.insert(parent.id, parent);
        self
    }

    /// Parent of a child, if the child has one and it was resolved.
    pub fn parent_of(&self, child: &LibraryItem) -> Option<&LibraryItem> {
        child.parent_id.as_ref().and_then(|id| self.parents.get(id))
    }
}

/// Fetch an item, its children and the children's parents.
///
/// Fails with `NotFound` when the item does not resolve or its children
/// cannot be listed. Parents that cannot be resolved are simply missing
/// from the snapshot.
pub async fn fetch_snapshot(
    library: &dyn LibraryClient,
    item_id: &ItemId,
    identity: &RequestIdentity,
) -> Result<LibrarySnapshot> {
    let item = library
        .get_item(item_id, identity)
        .await?
        .ok_or_else(|| PlaylistError::NotFound(item_id.to_string()))?;

    let children = library
        .get_children(item_id, identity)
        .await?
        .ok_or_else(|| PlaylistError::NotFound(format!("children of {}", item_id)))?;

    tracing::debug!(
        "Listed {} children of {} ({})",
        children.len(),
        item.name_or_empty(),
        item.id
    );

    let mut snapshot = LibrarySnapshot::new(item, children);

    let mut missing: Vec<ItemId> = Vec::new();
    for parent_id in snapshot.children.iter().filter_map(|c| c.parent_id) {
        if !snapshot.parents.contains_key(&parent_id) && !missing.contains(&parent_id) {
            missing.push(parent_id);
        }
    }

    if !missing.is_empty() {
        let parents = library.get_items(&missing, identity).await?;
        if parents.len() < missing.len() {
            tracing::debug!(
                "Resolved {} of {} parent items",
                parents.len(),
                missing.len()
            );
        }
        for parent in parents {
            snapshot.parents.insert(parent.id, parent);
        }
    }

    Ok(snapshot)
}
