//! Jellyfin API types for library and user lookups.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::library::{ItemId, ItemKind, LibraryItem};

/// Fields requested on every item query.
pub const ITEM_FIELDS: &str = "CanDownload,ParentId";

/// Item as returned by `/Items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseItemDto {
    /// Item id.
    pub id: ItemId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Item kind.
    #[serde(default)]
    pub r#type: Option<ItemKind>,
    /// Episode or season number.
    #[serde(default)]
    pub index_number: Option<i32>,
    /// Owning item.
    #[serde(default)]
    pub parent_id: Option<ItemId>,
    /// Whether the requesting user may download the item.
    #[serde(default)]
    pub can_download: Option<bool>,
}

impl From<BaseItemDto> for LibraryItem {
    fn from(dto: BaseItemDto) -> Self {
        LibraryItem {
            id: dto.id,
            kind: dto.r#type.unwrap_or(ItemKind::Other),
            name: dto.name,
            index_number: dto.index_number,
            parent_id: dto.parent_id,
            can_download: dto.can_download,
        }
    }
}

/// Paged query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult<T> {
    /// Items of this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// User permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserPolicy {
    #[serde(default)]
    pub enable_content_downloading: bool,
}

/// User as returned by `/Users/Me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub policy: Option<UserPolicy>,
}
