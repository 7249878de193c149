//! End-to-end tests
//!
//! Full HTTP round trips through the router, backed by the in-memory
//! library from `fixtures`.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

use crate::auth::RequestIdentity;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::http::create_router;
use crate::integration::fixtures::{
    item_id, sample_library, MemoryLibrary, StaticIdentities, API_KEY, RESTRICTED_TOKEN,
    USER_TOKEN,
};
use crate::library::{ItemId, LibraryClient, LibraryItem};
use crate::state::AppState;

fn config_with_base(base_path: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.playlist.base_path = base_path.to_string();
    config
}

fn app_with(config: ServerConfig, library: MemoryLibrary) -> Router {
    create_router(Arc::new(AppState::new(
        config,
        Arc::new(library),
        Arc::new(StaticIdentities::default()),
    )))
}

fn app() -> Router {
    app_with(config_with_base("/jf"), sample_library())
}

fn playlist_uri(n: u128, token: &str) -> String {
    format!("/PlaylistGen/Items/{}.m3u8?api_key={}", item_id(n), token)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_series_playlist() {
    let (status, body) = get(app(), &playlist_uri(10, USER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "#EXTM3U\n\
         #EXTINF:-1 group-title=\"Lost\", Season 1\n\
         /jf/PlaylistGen/Items/0000000000000000000000000000000b.m3u8?api_key=user-token\n\
         #EXTINF:-1 group-title=\"Lost\", Special\n\
         /jf/PlaylistGen/Items/0000000000000000000000000000000e.m3u8?api_key=user-token"
    );
}

#[tokio::test]
async fn test_season_playlist_skips_restricted_episode() {
    let (status, body) = get(app(), &playlist_uri(11, USER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "#EXTM3U\n\
         #EXTINF:-1 group-title=\"Season 1\", Pilot\n\
         /jf/Items/0000000000000000000000000000000c/Download?api_key=user-token"
    );
}

#[tokio::test]
async fn test_api_key_sees_every_episode() {
    let (status, body) = get(app(), &playlist_uri(11, API_KEY)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("#EXTINF:-1 group-title=\"Season 1\", Pilot\n"));
    assert!(body.contains("#EXTINF:-1 group-title=\"Season 1\", Episode 2\n"));
    assert!(body.ends_with("/jf/Items/0000000000000000000000000000000d/Download?api_key=api-key"));
}

#[tokio::test]
async fn test_box_set_uses_real_parents() {
    let (status, body) = get(app(), &playlist_uri(3, USER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "#EXTM3U\n\
         #EXTINF:-1 group-title=\"Shows\", Lost\n\
         /jf/PlaylistGen/Items/0000000000000000000000000000000a.m3u8?api_key=user-token\n\
         #EXTINF:-1 group-title=\"Shows\", Stray\n\
         /jf/Items/0000000000000000000000000000000f/Download?api_key=user-token"
    );
}

#[tokio::test]
async fn test_artist_albums_fall_back_to_ordinal() {
    let (status, body) = get(app(), &playlist_uri(20, USER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "#EXTM3U\n\
         #EXTINF:-1 group-title=\"Miles Davis\", Album \n\
         /jf/PlaylistGen/Items/00000000000000000000000000000015.m3u8?api_key=user-token"
    );
}

#[tokio::test]
async fn test_album_tracks_need_all_leaf_downloads() {
    let (status, _) = get(app(), &playlist_uri(21, USER_TOKEN)).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let mut config = config_with_base("/jf");
    config.playlist.all_leaf_downloads = true;
    let (status, body) = get(app_with(config, sample_library()), &playlist_uri(21, USER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "#EXTM3U\n\
         #EXTINF:-1 group-title=\"Kind of Blue\", So What\n\
         /jf/Items/00000000000000000000000000000016/Download?api_key=user-token"
    );
}

#[tokio::test]
async fn test_nothing_to_generate() {
    // Movie, empty box set, artist without albums
    for n in [6, 4, 5] {
        let (status, _) = get(app(), &playlist_uri(n, USER_TOKEN)).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE, "item {}", n);
    }
}

#[tokio::test]
async fn test_unknown_item() {
    let (status, _) = get(app(), &playlist_uri(0xdead, USER_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unlistable_children() {
    let library = sample_library().with_unlistable(item_id(10));
    let (status, _) = get(app_with(config_with_base("/jf"), library), &playlist_uri(10, USER_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_item_id() {
    let (status, _) = get(app(), "/PlaylistGen/Items/not-an-id.m3u8?api_key=user-token").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_item_id_without_token() {
    let (status, _) = get(app(), "/PlaylistGen/Items/not-an-id.m3u8").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token() {
    let (status, _) = get(app(), &format!("/PlaylistGen/Items/{}.m3u8", item_id(10))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_token() {
    let (status, _) = get(app(), &playlist_uri(10, "bogus")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_restricted_user() {
    let (status, _) = get(app(), &playlist_uri(10, RESTRICTED_TOKEN)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_from_headers() {
    let uri = format!("/PlaylistGen/Items/{}.m3u8", item_id(11));

    let request = Request::builder()
        .uri(&uri)
        .header("X-Emby-Token", USER_TOKEN)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("api_key=user-token"));

    let request = Request::builder()
        .uri(&uri)
        .header(
            header::AUTHORIZATION,
            r#"MediaBrowser Client="web", Device="Firefox", Token="api-key""#,
        )
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("api_key=api-key"));
}

#[tokio::test]
async fn test_path_suffixes() {
    let (_, expected) = get(app(), &playlist_uri(11, USER_TOKEN)).await;

    for suffix in ["", ".m3u"] {
        let uri = format!(
            "/PlaylistGen/Items/{}{}?api_key={}",
            item_id(11),
            suffix,
            USER_TOKEN
        );
        let (status, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::OK, "suffix {:?}", suffix);
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn test_playlist_headers() {
    let request = Request::builder()
        .uri(playlist_uri(11, USER_TOKEN))
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/x-mpegURL");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"0000000000000000000000000000000b.m3u8\""
    );
}

#[tokio::test]
async fn test_empty_base_path() {
    let app = app_with(ServerConfig::default(), sample_library());
    let (status, body) = get(app, &playlist_uri(11, USER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ends_with("\n/Items/0000000000000000000000000000000c/Download?api_key=user-token"));
}

#[tokio::test]
async fn test_client_script() {
    let request = Request::builder()
        .uri("/PlaylistGen/ClientScript")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/javascript"
    );
}

#[tokio::test]
async fn test_client_script_override() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("custom.js");
    std::fs::write(&script, "console.log('custom');").unwrap();

    let mut config = ServerConfig::default();
    config.playlist.client_script_path = Some(script);
    let (status, body) = get(app_with(config, sample_library()), "/PlaylistGen/ClientScript").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('custom');");

    let mut config = ServerConfig::default();
    config.playlist.client_script_path = Some(dir.path().join("missing.js"));
    let (status, _) = get(app_with(config, sample_library()), "/PlaylistGen/ClientScript").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Library that never answers in time.
struct StalledLibrary;

#[async_trait]
impl LibraryClient for StalledLibrary {
    async fn get_item(&self, _: &ItemId, _: &RequestIdentity) -> Result<Option<LibraryItem>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn get_children(
        &self,
        _: &ItemId,
        _: &RequestIdentity,
    ) -> Result<Option<Vec<LibraryItem>>> {
        Ok(None)
    }

    async fn get_items(&self, _: &[ItemId], _: &RequestIdentity) -> Result<Vec<LibraryItem>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_library_timeout() {
    let mut config = ServerConfig::default();
    config.jellyfin.request_timeout_secs = 1;
    let app = create_router(Arc::new(AppState::new(
        config,
        Arc::new(StalledLibrary),
        Arc::new(StaticIdentities::default()),
    )));

    let (status, _) = get(app, &playlist_uri(10, USER_TOKEN)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
