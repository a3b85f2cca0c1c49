//! Generic scrollable + filterable list of fixed-height rows.
//!
//! Offsets and selection are in items; heights passed in are terminal rows.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub filtered_indices: Vec<usize>,
    pub selected: usize,
    pub scroll_offset: usize,
    pub filter: String,
    item_height: usize,
    filter_fn: Box<dyn Fn(&T, &str) -> bool + Send + Sync>,
}

impl<T> ScrollableList<T> {
    pub fn new(
        item_height: usize,
        filter_fn: impl Fn(&T, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            items: Vec::new(),
            filtered_indices: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            filter: String::new(),
            item_height: item_height.max(1),
            filter_fn: Box::new(filter_fn),
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.rebuild_filter();
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        let old_idx = self.filtered_indices.get(self.selected).copied();
        self.rebuild_filter();
        // Try to keep the same item selected after filter change
        if let Some(prev) = old_idx {
            if let Some(pos) = self.filtered_indices.iter().position(|&i| i == prev) {
                self.selected = pos;
            } else {
                self.selected = 0;
            }
        }
        self.scroll_offset = 0;
    }

    pub fn rebuild_filter(&mut self) {
        if self.filter.is_empty() {
            self.filtered_indices = (0..self.items.len()).collect();
        } else {
            self.filtered_indices = self
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| (self.filter_fn)(item, &self.filter))
                .map(|(i, _)| i)
                .collect();
        }
        if self.selected >= self.filtered_indices.len() {
            self.selected = self.filtered_indices.len().saturating_sub(1);
        }
        let max_offset = self.filtered_indices.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    pub fn select_up(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.filtered_indices.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered_indices.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        let idx = self.filtered_indices.get(self.selected)?;
        self.items.get(*idx)
    }

    /// Number of whole items that fit in `height` rows.
    pub fn page_len(&self, height: usize) -> usize {
        height / self.item_height
    }

    /// Returns (original_index, &item) pairs visible in `height` rows.
    /// Call ensure_visible first to update scroll_offset.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        let count = self.page_len(height);
        if count == 0 || self.filtered_indices.is_empty() {
            return Vec::new();
        }
        let start = self.scroll_offset.min(self.filtered_indices.len());
        let end = (start + count).min(self.filtered_indices.len());
        self.filtered_indices[start..end]
            .iter()
            .map(|&i| (i, &self.items[i]))
            .collect()
    }

    pub fn ensure_visible(&mut self, height: usize) {
        let count = self.page_len(height);
        if count == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + count {
            self.scroll_offset = self.selected.saturating_sub(count - 1);
        }
    }

    /// Handle a click at `row` within the rendered area.
    /// Returns true if the click landed on an item.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row / self.item_height;
        if target < self.filtered_indices.len() {
            self.selected = target;
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    // ── scroll metrics, in rows ───────────────────────────────────────────────

    pub fn scroll_top(&self) -> usize {
        self.scroll_offset * self.item_height
    }

    pub fn scroll_height(&self) -> usize {
        self.filtered_indices.len() * self.item_height
    }

    /// Content taller than the viewport.
    pub fn has_overflow(&self, height: usize) -> bool {
        self.scroll_height() > height
    }

    /// Viewport bottom within `threshold` rows of the content bottom.
    pub fn near_bottom(&self, height: usize, threshold: usize) -> bool {
        self.scroll_top() + height + threshold >= self.scroll_height()
    }
}
