//! Caller identity and download permissions
//!
//! The identity is built once per request at the HTTP boundary and then
//! passed explicitly to every library lookup and permission check.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use uuid::Uuid;

use crate::error::Result;
use crate::library::LibraryItem;

/// Who is asking, and with which token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    /// Request authenticated with a server API key rather than a user session
    pub is_api_key: bool,

    /// Acting user, absent for API keys
    pub user_id: Option<Uuid>,

    /// Token appended to every generated URL
    pub token: Option<String>,

    /// User-level content download permission
    pub can_download: bool,
}

impl RequestIdentity {
    /// Identity of a server API key. API keys may download everything.
    pub fn api_key(token: impl Into<String>) -> Self {
        Self {
            is_api_key: true,
            user_id: None,
            token: Some(token.into()),
            can_download: true,
        }
    }

    /// Identity of a logged-in user.
    pub fn user(user_id: Uuid, token: impl Into<String>, can_download: bool) -> Self {
        Self {
            is_api_key: false,
            user_id: Some(user_id),
            token: Some(token.into()),
            can_download,
        }
    }

    /// Token to append to URLs, empty when there is none.
    pub fn token_or_empty(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }
}

/// Whether `identity` may download `item`.
///
/// API keys may download anything. Users need the download permission and
/// the item must not be flagged as non-downloadable by the library.
pub fn can_download(identity: &RequestIdentity, item: &LibraryItem) -> bool {
    if identity.is_api_key {
        return true;
    }
    identity.can_download && item.can_download.unwrap_or(true)
}

/// Resolves a caller token into an identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Fails with `Unauthorized` when the token is not valid.
    async fn resolve(&self, token: &str) -> Result<RequestIdentity>;
}

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Find the caller's token in the request.
///
/// Looks at the `Authorization` / `X-Emby-Authorization` headers
/// (`MediaBrowser Token="..."`), then `X-Emby-Token` and
/// `X-MediaBrowser-Token`, then the `api_key` / `ApiKey` query parameters.
pub fn extract_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    let auth_headers = [
        header::AUTHORIZATION.as_str(),
        "x-emby-authorization",
    ];
    for name in auth_headers {
        if let Some(token) = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_authorization)
        {
            return Some(token);
        }
    }

    for name in ["x-emby-token", "x-mediabrowser-token"] {
        if let Some(token) = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return Some(token.to_string());
        }
    }

    query.and_then(query_token)
}

/// Token parameter of a `MediaBrowser` or `Emby` authorization value.
fn parse_authorization(value: &str) -> Option<String> {
    let value = value.trim();
    let (scheme, params) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("mediabrowser") && !scheme.eq_ignore_ascii_case("emby") {
        return None;
    }

    regex!(r#"(\w+)\s*=\s*"([^"]*)""#)
        .captures_iter(params)
        .find(|c| c[1].eq_ignore_ascii_case("token"))
        .map(|c| c[2].to_string())
        .filter(|t| !t.is_empty())
}

fn query_token(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.eq_ignore_ascii_case("api_key") || k.eq_ignore_ascii_case("apikey"))
        .and_then(|(_, v)| urlencoding::decode(v).ok())
        .map(|v| v.into_owned())
        .filter(|v| !v.is_empty())
}
