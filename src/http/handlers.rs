//! HTTP request handlers
//!
//! Implements handlers for the playlist and client script endpoints.

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{extract_token, RequestIdentity};
use crate::error::{PlaylistError, Result};
use crate::library::{fetch_snapshot, ItemId};
use crate::state::AppState;

/// Embedded client script
pub const CLIENT_SCRIPT: &str = include_str!("../../assets/playlistgen.js");

/// Content type of generated playlists
const PLAYLIST_CONTENT_TYPE: &str = "application/x-mpegURL";

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Unauthorized,
    Forbidden,
    NotFound(String),
    UnsupportedMedia(String),
    BadGateway(String),
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            HttpError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Downloading is not allowed for this user".to_string(),
            ),
            HttpError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
            HttpError::UnsupportedMedia(what) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("No playlist available for {}", what),
            ),
            HttpError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            HttpError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, body).into_response()
    }
}

impl From<PlaylistError> for HttpError {
    fn from(err: PlaylistError) -> Self {
        match err {
            PlaylistError::NotFound(what) => HttpError::NotFound(what),
            PlaylistError::UnsupportedMedia(what) => HttpError::UnsupportedMedia(what),
            PlaylistError::InvalidItemId(id) => {
                HttpError::BadRequest(format!("Invalid item id: {}", id))
            }
            PlaylistError::Unauthorized => HttpError::Unauthorized,
            PlaylistError::Forbidden => HttpError::Forbidden,
            PlaylistError::Upstream(_) | PlaylistError::Request(_) | PlaylistError::Json(_) => {
                HttpError::BadGateway(err.to_string())
            }
            _ => HttpError::InternalError(err.to_string()),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("playlist-gen v", env!("CARGO_PKG_VERSION"))
}

/// Parse `{id}`, `{id}.m3u` or `{id}.m3u8`.
pub fn parse_item_path(segment: &str) -> Result<ItemId> {
    let id = segment
        .strip_suffix(".m3u8")
        .or_else(|| segment.strip_suffix(".m3u"))
        .unwrap_or(segment);
    id.parse()
}

/// Run a library call with the configured upper bound.
async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| PlaylistError::Upstream(format!("library lookup timed out after {:?}", limit)))?
}

/// Authenticate the caller and check the download permission.
async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    query: Option<&str>,
) -> Result<RequestIdentity> {
    let token = extract_token(headers, query).ok_or(PlaylistError::Unauthorized)?;
    let identity = with_timeout(state.library_timeout(), state.identities.resolve(&token)).await?;

    if !identity.is_api_key && !identity.can_download {
        tracing::info!("User {:?} may not download content", identity.user_id);
        return Err(PlaylistError::Forbidden);
    }
    Ok(identity)
}

/// Generated playlist endpoint
/// GET /PlaylistGen/Items/{item_id}[.m3u|.m3u8]
pub async fn item_playlist(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> std::result::Result<Response, HttpError> {
    let identity = authorize(&state, &headers, query.as_deref()).await?;
    let item_id = parse_item_path(&segment)?;

    let snapshot = with_timeout(
        state.library_timeout(),
        fetch_snapshot(state.library.as_ref(), &item_id, &identity),
    )
    .await
    .map_err(|e| {
        if let PlaylistError::NotFound(_) = e {
            tracing::info!("Cannot generate playlist for {}: {}", item_id, e);
        } else {
            tracing::warn!("Library lookup for {} failed: {}", item_id, e);
        }
        e
    })?;

    tracing::info!(
        "Generating playlist for item {} ({}) [{}]",
        snapshot.item.name_or_empty(),
        snapshot.item.id,
        snapshot.item.kind
    );

    let playlist = state.synthesizer.synthesize(&snapshot, &identity).map_err(|e| {
        tracing::info!("{}", e);
        e
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(PLAYLIST_CONTENT_TYPE),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    let disposition = format!("attachment; filename=\"{}.m3u8\"", item_id);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| HttpError::InternalError(e.to_string()))?,
    );

    Ok((headers, playlist).into_response())
}

/// Client script endpoint
/// GET /PlaylistGen/ClientScript
pub async fn client_script(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, HttpError> {
    let script = match &state.config.playlist.client_script_path {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::warn!("Client script {} unavailable: {}", path.display(), e);
            HttpError::NotFound("client script".to_string())
        })?,
        None => CLIENT_SCRIPT.to_string(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript"),
    );

    Ok((headers, script).into_response())
}
