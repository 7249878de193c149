//! Jellyfin HTTP client for library and user lookups.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::{IdentityResolver, RequestIdentity};
use crate::config::JellyfinConfig;
use crate::error::{PlaylistError, Result};
use crate::library::{ItemId, LibraryClient, LibraryItem};

use super::types::{BaseItemDto, QueryResult, UserDto, ITEM_FIELDS};

/// Header carrying the caller's token to Jellyfin.
const TOKEN_HEADER: &str = "X-Emby-Token";

/// Jellyfin HTTP client.
#[derive(Clone)]
pub struct JellyfinClient {
    inner: Arc<JellyfinClientInner>,
}

struct JellyfinClientInner {
    base_url: String,
    http_client: Client,
}

impl JellyfinClient {
    /// Create a new Jellyfin client from configuration.
    pub fn new(config: &JellyfinConfig) -> Result<Self> {
        let http_client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(JellyfinClientInner {
                base_url: config.url.trim_end_matches('/').to_string(),
                http_client,
            }),
        })
    }

    /// Get the base URL of the Jellyfin server.
    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Build a URL for a Jellyfin API endpoint.
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    /// GET an endpoint with the caller's token.
    async fn get(&self, path: &str, token: &str) -> Result<reqwest::Response> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        let res = self
            .inner
            .http_client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Jellyfin request {} failed: {}", path, e);
                PlaylistError::Upstream(e.to_string())
            })?;

        tracing::debug!("Jellyfin response for {}: {}", path, res.status());
        Ok(res)
    }

    /// GET and decode a JSON endpoint. `None` on 404.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<Option<T>> {
        let res = self.get(path, token).await?;
        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PlaylistError::Unauthorized),
            status if status.is_success() => {
                let body = res.bytes().await?;
                Ok(Some(serde_json::from_slice(&body)?))
            }
            status => Err(PlaylistError::Upstream(format!("{} returned {}", path, status))),
        }
    }

    /// Query `/Items` and convert the result.
    async fn query_items(
        &self,
        params: &[(&str, String)],
        identity: &RequestIdentity,
    ) -> Result<Option<Vec<LibraryItem>>> {
        let mut query = format!("Fields={}", ITEM_FIELDS);
        if let Some(user_id) = identity.user_id {
            query.push_str(&format!("&UserId={}", user_id.simple()));
        }
        for (name, value) in params {
            query.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }

        let result: Option<QueryResult<BaseItemDto>> = self
            .get_json(&format!("/Items?{}", query), identity.token_or_empty())
            .await?;

        Ok(result.map(|r| r.items.into_iter().map(LibraryItem::from).collect()))
    }
}

#[async_trait]
impl LibraryClient for JellyfinClient {
    async fn get_item(
        &self,
        id: &ItemId,
        identity: &RequestIdentity,
    ) -> Result<Option<LibraryItem>> {
        let items = self
            .query_items(&[("Ids", id.to_string())], identity)
            .await?;
        Ok(items.and_then(|items| items.into_iter().find(|i| i.id == *id)))
    }

    async fn get_children(
        &self,
        parent_id: &ItemId,
        identity: &RequestIdentity,
    ) -> Result<Option<Vec<LibraryItem>>> {
        self.query_items(
            &[
                ("ParentId", parent_id.to_string()),
                ("Recursive", "false".to_string()),
            ],
            identity,
        )
        .await
    }

    async fn get_items(
        &self,
        ids: &[ItemId],
        identity: &RequestIdentity,
    ) -> Result<Vec<LibraryItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids
            .iter()
            .map(ItemId::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Ok(self
            .query_items(&[("Ids", ids)], identity)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl IdentityResolver for JellyfinClient {
    /// User tokens resolve through `/Users/Me`. Jellyfin answers that
    /// endpoint with 400 for API keys, so only a 400 leads on to the
    /// `/System/Info` check.
    async fn resolve(&self, token: &str) -> Result<RequestIdentity> {
        let res = self.get("/Users/Me", token).await?;
        match res.status() {
            status if status.is_success() => {
                let user: UserDto = serde_json::from_slice(&res.bytes().await?)?;
                let policy = user.policy.unwrap_or_default();
                tracing::debug!(
                    "Authenticated user {} ({})",
                    user.name.as_deref().unwrap_or(""),
                    user.id
                );
                return Ok(RequestIdentity::user(
                    user.id,
                    token,
                    policy.enable_content_downloading,
                ));
            }
            StatusCode::BAD_REQUEST => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(PlaylistError::Unauthorized)
            }
            status => {
                return Err(PlaylistError::Upstream(format!(
                    "/Users/Me returned {}",
                    status
                )))
            }
        }

        let res = self.get("/System/Info", token).await?;
        match res.status() {
            status if status.is_success() => {
                tracing::debug!("Authenticated API key");
                Ok(RequestIdentity::api_key(token))
            }
            status if status.is_server_error() => Err(PlaylistError::Upstream(format!(
                "/System/Info returned {}",
                status
            ))),
            _ => Err(PlaylistError::Unauthorized),
        }
    }
}
