//! Dashboard controller: page counter, accumulated video list and selection.
//!
//! The controller never performs IO.  Operations that need a page fetched
//! return a [`FetchRequest`]; the event loop runs it and reports back through
//! [`Dashboard::on_page_loaded`] or [`Dashboard::on_page_failed`].  Only one
//! fetch is in flight at a time and results are matched by page number, so a
//! response that arrives for a page we no longer wait on is dropped.

use tracing::{debug, info, warn};
use vidboard_proto::catalog::VideoResult;
use vidboard_proto::pagination::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug)]
pub struct Dashboard {
    page: u32,
    limit: u32,
    videos: Vec<VideoResult>,
    selected: Option<VideoResult>,
    loading: bool,
    has_more: bool,
    error: Option<String>,
    first_selection_done: bool,
    in_flight: Option<u32>,
}

impl Dashboard {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            videos: Vec::new(),
            selected: None,
            loading: false,
            has_more: true,
            error: None,
            first_selection_done: false,
            in_flight: None,
        }
    }

    /// Fetch the first page.
    pub fn start(&mut self) -> Option<FetchRequest> {
        self.fetch_current()
    }

    /// Advance to the next page unless a fetch is running, the catalog is
    /// exhausted, or the last fetch failed.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        // unlike a plain loading/has_more check: a failed page stays current until `retry`
        if self.loading || !self.has_more || self.error.is_some() {
            return None;
        }
        self.page += 1;
        debug!("dashboard: load more -> page {}", self.page);
        self.fetch_current()
    }

    /// Re-issue the fetch for the current page after a failure.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.loading {
            return None;
        }
        info!("dashboard: retrying page {}", self.page);
        self.fetch_current()
    }

    fn fetch_current(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        self.loading = true;
        self.in_flight = Some(self.page);
        Some(FetchRequest {
            page: self.page,
            limit: self.limit,
        })
    }

    /// Append a fetched page.  Returns the video to auto-select when this is
    /// the first non-empty list the dashboard has seen.
    pub fn on_page_loaded(&mut self, requested: u32, page: Page<VideoResult>) -> Option<VideoResult> {
        if self.in_flight != Some(requested) {
            debug!("dashboard: dropping stale page {}", requested);
            return None;
        }
        self.in_flight = None;
        self.loading = false;
        self.error = None;
        self.has_more = page.pagination.has_next_page;
        self.videos.extend(page.items);
        debug!(
            "dashboard: page {} loaded, {} videos, has_more={}",
            requested,
            self.videos.len(),
            self.has_more
        );

        if self.first_selection_done {
            return None;
        }
        let first = self.videos.first()?.clone();
        self.first_selection_done = true;
        self.selected = Some(first.clone());
        Some(first)
    }

    pub fn on_page_failed(&mut self, requested: u32, cause: &str) {
        if self.in_flight != Some(requested) {
            debug!("dashboard: dropping stale failure for page {}", requested);
            return;
        }
        self.in_flight = None;
        self.loading = false;
        warn!("dashboard: page {} failed: {}", requested, cause);
        self.error = Some(format!(
            "Failed to load more videos. Please try again later: {}",
            cause
        ));
    }

    pub fn select(&mut self, video: VideoResult) {
        debug!("dashboard: selected {}", video.video_id());
        self.selected = Some(video);
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn videos(&self) -> &[VideoResult] {
        &self.videos
    }

    pub fn selected(&self) -> Option<&VideoResult> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
