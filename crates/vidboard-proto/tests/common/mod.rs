#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use vidboard_proto::catalog::{Catalog, Snippet, Thumbnail, Thumbnails, VideoId, VideoResult};

pub fn video(n: usize) -> VideoResult {
    VideoResult {
        id: VideoId {
            video_id: format!("vid{:03}", n),
            channel_id: None,
        },
        snippet: Snippet {
            title: format!("Video {}", n),
            description: Some(format!("Description for video {}", n)),
            live_broadcast_content: "none".to_string(),
            thumbnails: Thumbnails {
                default: Thumbnail {
                    url: format!("https://i.ytimg.com/vi/vid{:03}/default.jpg", n),
                    width: Some(120),
                    height: Some(90),
                },
            },
        },
    }
}

pub fn catalog(total: usize) -> Catalog {
    Catalog::new((0..total).map(video).collect())
}

/// Catalog document in upstream search-API shape, extra fields included.
pub fn catalog_document(total: usize) -> Value {
    let items: Vec<Value> = (0..total)
        .map(|n| {
            json!({
                "kind": "youtube#searchResult",
                "etag": format!("etag-{}", n),
                "id": { "kind": "youtube#video", "videoId": format!("vid{:03}", n) },
                "snippet": {
                    "publishedAt": "2024-05-01T12:00:00Z",
                    "channelTitle": "Fixture Channel",
                    "title": format!("Video {}", n),
                    "description": format!("Description for video {}", n),
                    "liveBroadcastContent": "none",
                    "thumbnails": {
                        "default": {
                            "url": format!("https://i.ytimg.com/vi/vid{:03}/default.jpg", n),
                            "width": 120,
                            "height": 90
                        },
                        "high": { "url": "https://i.ytimg.com/vi/x/hqdefault.jpg" }
                    }
                }
            })
        })
        .collect();
    json!({ "kind": "youtube#searchListResponse", "items": items })
}

pub fn write_catalog(dir: &Path, total: usize) -> Result<PathBuf> {
    let path = dir.join("videos.json");
    let body = serde_json::to_string_pretty(&catalog_document(total))?;
    std::fs::write(&path, body).with_context(|| format!("failed to write {:?}", path))?;
    Ok(path)
}
