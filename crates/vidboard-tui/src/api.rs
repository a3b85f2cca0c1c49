//! Client for the paginated read endpoint.

use crate::dashboard::FetchRequest;
use thiserror::Error;
use tracing::debug;
use vidboard_proto::catalog::VideoResult;
use vidboard_proto::pagination::Page;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Status(u16),
    #[error("bad response body: {0}")]
    Decode(String),
}

#[derive(Clone)]
pub struct DataClient {
    http: reqwest::Client,
    base_url: String,
}

impl DataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, request: FetchRequest) -> String {
        format!(
            "{}/api/data?page={}&limit={}",
            self.base_url, request.page, request.limit
        )
    }

    pub async fn fetch_page(&self, request: FetchRequest) -> Result<Page<VideoResult>, ApiError> {
        let url = self.page_url(request);
        debug!("api: GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let page: Page<VideoResult> =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(
            "api: page {} -> {} items (hasNextPage={})",
            page.pagination.page,
            page.items.len(),
            page.pagination.has_next_page
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, response::Json, routing::get, Router};
    use std::collections::HashMap;
    use vidboard_proto::catalog::{Snippet, Thumbnails, VideoId};
    use vidboard_proto::pagination::{paginate, LOAD_FAILED_MESSAGE};

    fn catalog(total: usize) -> Vec<VideoResult> {
        (0..total)
            .map(|n| VideoResult {
                id: VideoId {
                    video_id: format!("vid{:03}", n),
                    channel_id: None,
                },
                snippet: Snippet {
                    title: format!("Video {}", n),
                    description: None,
                    live_broadcast_content: "none".to_string(),
                    thumbnails: Thumbnails::default(),
                },
            })
            .collect()
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn test_page_url_strips_trailing_slash() {
        let client = DataClient::new("http://127.0.0.1:8990/");
        assert_eq!(
            client.page_url(FetchRequest { page: 2, limit: 10 }),
            "http://127.0.0.1:8990/api/data?page=2&limit=10"
        );
    }

    #[tokio::test]
    async fn test_fetch_page_decodes_items() {
        let app = Router::new().route(
            "/api/data",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let page = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
                let limit = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
                Json(paginate(&catalog(25), page, limit))
            }),
        );
        let client = DataClient::new(serve(app).await);

        let page = client
            .fetch_page(FetchRequest { page: 3, limit: 10 })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].video_id(), "vid020");
        assert!(!page.pagination.has_next_page);
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let app = Router::new().route(
            "/api/data",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(Page::<VideoResult>::failed(LOAD_FAILED_MESSAGE)),
                )
            }),
        );
        let client = DataClient::new(serve(app).await);

        let err = client
            .fetch_page(FetchRequest { page: 1, limit: 10 })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
        assert_eq!(err.to_string(), "API error: 500");
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let app = Router::new().route("/api/data", get(|| async { "not json" }));
        let client = DataClient::new(serve(app).await);

        let err = client
            .fetch_page(FetchRequest { page: 1, limit: 10 })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
