//! Video catalog: the static, pre-fetched list of search results the server
//! paginates over.
//!
//! The on-disk document is shaped `{ "items": [VideoResult, ...] }` and uses
//! the camelCase field names of the upstream search API.  Fields we don't use
//! (`kind`, `etag`, `publishedAt`, …) are ignored on load.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::pagination::{paginate, Page};

/// `liveBroadcastContent` value marking an ongoing broadcast.
pub const LIVE_BROADCAST: &str = "live";

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const CHANNEL_URL: &str = "https://www.youtube.com/channel/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoResult {
    pub id: VideoId,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoId {
    /// Empty for channel results, which carry only a `channelId`.
    #[serde(default)]
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_broadcast")]
    pub live_broadcast_content: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Thumbnail,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

fn default_broadcast() -> String {
    "none".to_string()
}

impl VideoResult {
    pub fn video_id(&self) -> &str {
        &self.id.video_id
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.id.channel_id.as_deref().filter(|c| !c.is_empty())
    }

    pub fn is_live(&self) -> bool {
        self.snippet.live_broadcast_content == LIVE_BROADCAST
    }

    /// Title with the one HTML entity the catalog actually contains decoded.
    pub fn display_title(&self) -> String {
        decode_title(&self.snippet.title)
    }

    pub fn description(&self) -> &str {
        self.snippet.description.as_deref().unwrap_or("")
    }

    pub fn watch_url(&self) -> String {
        watch_url_for(&self.id.video_id)
    }

    pub fn channel_url(&self) -> Option<String> {
        self.channel_id().map(|c| format!("{}{}", CHANNEL_URL, c))
    }
}

pub fn watch_url_for(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

/// Only `&#39;` shows up in catalog titles; a full entity decoder isn't needed.
pub fn decode_title(title: &str) -> String {
    title.replace("&#39;", "'")
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog fetch from {url} returned status {status}")]
    Status { url: String, status: u16 },
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The full catalog document.  Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<VideoResult>,
}

impl Catalog {
    pub fn new(items: Vec<VideoResult>) -> Self {
        Self { items }
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slice out one page.  See [`paginate`].
    pub fn page(&self, page: u32, limit: u32) -> Page<VideoResult> {
        paginate(&self.items, page, limit)
    }
}

/// The catalog compiled into the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../../../data/videos.json");

/// Config value selecting [`CatalogSource::Bundled`].
pub const BUNDLED_SOURCE: &str = "bundled";

/// Where the catalog document comes from.
///
/// `Bundled` is the production mode and needs no files at runtime.  `File`
/// overrides it with a document on disk.  `Url` is the development mode,
/// where the document is served over local HTTP (e.g. by another server
/// instance at `/data/videos.json`).
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
    Url(String),
}

impl CatalogSource {
    /// `bundled` (or blank) selects `Bundled`, `http://` / `https://`
    /// prefixes select `Url`; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(BUNDLED_SOURCE) {
            Self::Bundled
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        match self {
            Self::Bundled => {
                let catalog = Catalog::from_json_str(BUNDLED_CATALOG)?;
                info!("catalog: {} bundled items", catalog.len());
                Ok(catalog)
            }
            Self::File(path) => load_from_file(path).await,
            Self::Url(url) => load_from_url(url).await,
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => f.write_str("bundled catalog"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

async fn load_from_file(path: &Path) -> Result<Catalog, CatalogError> {
    debug!("catalog: reading {:?}", path);
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let catalog = Catalog::from_json_str(&content)?;
    info!("catalog: loaded {} items from {:?}", catalog.len(), path);
    Ok(catalog)
}

async fn load_from_url(url: &str) -> Result<Catalog, CatalogError> {
    debug!("catalog: fetching {}", url);
    let fetch_err = |source| CatalogError::Fetch {
        url: url.to_string(),
        source,
    };

    let response = reqwest::Client::new()
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(fetch_err)?;

    if !response.status().is_success() {
        return Err(CatalogError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await.map_err(fetch_err)?;
    let catalog = Catalog::from_json_str(&body)?;
    info!("catalog: fetched {} items from {}", catalog.len(), url);
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "kind": "youtube#searchListResponse",
        "items": [
            {
                "kind": "youtube#searchResult",
                "id": { "kind": "youtube#video", "videoId": "abc123" },
                "snippet": {
                    "publishedAt": "2024-01-01T00:00:00Z",
                    "title": "Don&#39;t Panic",
                    "description": "A talk",
                    "liveBroadcastContent": "none",
                    "thumbnails": { "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg", "width": 120, "height": 90 } }
                }
            },
            {
                "id": { "kind": "youtube#channel", "channelId": "UC42" },
                "snippet": {
                    "title": "Some Channel",
                    "liveBroadcastContent": "live",
                    "thumbnails": { "default": { "url": "https://example.com/c.jpg" } }
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);

        let first = &catalog.items[0];
        assert_eq!(first.video_id(), "abc123");
        assert_eq!(first.channel_id(), None);
        assert_eq!(first.display_title(), "Don't Panic");
        assert_eq!(first.snippet.thumbnails.default.width, Some(120));
        assert!(!first.is_live());
        assert_eq!(first.watch_url(), "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_channel_result_has_empty_video_id() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let channel = &catalog.items[1];
        assert_eq!(channel.video_id(), "");
        assert_eq!(
            channel.channel_url().as_deref(),
            Some("https://www.youtube.com/channel/UC42")
        );
        assert!(channel.is_live());
        assert_eq!(channel.description(), "");
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            CatalogSource::parse("http://localhost:8990/data/videos.json"),
            CatalogSource::Url("http://localhost:8990/data/videos.json".into())
        );
        assert_eq!(
            CatalogSource::parse("data/videos.json"),
            CatalogSource::File(PathBuf::from("data/videos.json"))
        );
        assert_eq!(CatalogSource::parse("bundled"), CatalogSource::Bundled);
        assert_eq!(CatalogSource::parse("  "), CatalogSource::Bundled);
    }

    #[tokio::test]
    async fn test_bundled_catalog_is_well_formed() {
        let catalog = CatalogSource::Bundled.load().await.unwrap();
        assert_eq!(catalog.len(), 25);
        assert!(catalog.items.iter().any(|v| v.is_live()));
        assert!(catalog.items.iter().any(|v| v.channel_id().is_some()));

        // every playable item has its own id
        let mut ids: Vec<&str> = catalog
            .items
            .iter()
            .map(|v| v.video_id())
            .filter(|id| !id.is_empty())
            .collect();
        let playable = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), playable);

        // titles carry no entity the decoder leaves behind
        for video in &catalog.items {
            let title = video.display_title();
            assert!(!title.contains("&#") && !title.contains("&amp;"), "{}", title);
        }
    }

    async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/data/videos.json", addr)
    }

    #[tokio::test]
    async fn test_url_source_fetches_catalog() {
        let app = axum::Router::new().route(
            "/data/videos.json",
            axum::routing::get(|| async { SAMPLE }),
        );
        let url = serve(app).await;

        let catalog = CatalogSource::parse(&url).load().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items[0].video_id(), "abc123");
    }

    #[tokio::test]
    async fn test_url_source_non_2xx_is_status_error() {
        let app = axum::Router::new().route(
            "/data/videos.json",
            axum::routing::get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let url = serve(app).await;

        match CatalogSource::Url(url.clone()).load().await {
            Err(CatalogError::Status { url: failed, status }) => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let source = CatalogSource::File(PathBuf::from("/definitely/not/here/videos.json"));
        match source.load().await {
            Err(CatalogError::Read { path, .. }) => {
                assert!(path.ends_with("videos.json"));
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = CatalogSource::File(path).load().await;
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
