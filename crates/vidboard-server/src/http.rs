use crate::store::CatalogStore;
use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use vidboard_proto::catalog::{Catalog, VideoResult};
use vidboard_proto::pagination::{Page, PageRequest, LOAD_FAILED_MESSAGE};

#[derive(Clone)]
struct HttpState {
    store: Arc<CatalogStore>,
}

/// Raw query strings; defaulting happens in [`PageRequest::from_params`] so
/// garbage values never turn into a 400.
#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<String>,
    limit: Option<String>,
}

pub fn router(store: Arc<CatalogStore>) -> Router {
    Router::new()
        .route("/api/data", get(get_data))
        .route("/data/videos.json", get(get_catalog))
        .layer(CorsLayer::permissive())
        .with_state(HttpState { store })
}

/// Bind and serve until the listener fails.  A bind failure is returned
/// rather than logged so the binary exits non-zero.
pub async fn start_server(
    bind_address: String,
    port: u16,
    store: Arc<CatalogStore>,
) -> anyhow::Result<()> {
    let app = router(store);

    let addr = format!("{}:{}", bind_address, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind HTTP server to {}", addr))?;

    info!("HTTP API server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn get_data(
    State(state): State<HttpState>,
    Query(params): Query<PageParams>,
) -> (StatusCode, Json<Page<VideoResult>>) {
    let request = PageRequest::from_params(params.page.as_deref(), params.limit.as_deref());
    info!("GET /api/data page={} limit={}", request.page, request.limit);

    match state.store.get().await {
        Ok(catalog) => (StatusCode::OK, Json(catalog.page(request.page, request.limit))),
        Err(e) => {
            error!("Error fetching data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Page::failed(LOAD_FAILED_MESSAGE)),
            )
        }
    }
}

async fn get_catalog(State(state): State<HttpState>) -> Result<Json<Catalog>, StatusCode> {
    match state.store.get().await {
        Ok(catalog) => Ok(Json(Catalog::clone(&catalog))),
        Err(e) => {
            error!("Error serving catalog: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
