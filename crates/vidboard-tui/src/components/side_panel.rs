//! SidePanel component: search bar, status line and the infinite video list.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::{Duration, Instant};

use vidboard_proto::catalog::VideoResult;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    format::{description_preview, fit_width},
    search::{video_matches, Debouncer},
    theme::{
        style_skeleton, C_BADGE_LIVE, C_CHANNEL, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY,
        C_SELECTION_BG,
    },
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_block, Badge},
        scrollable_list::ScrollableList,
    },
};

/// Rows per tile: title line and description line.
pub const TILE_HEIGHT: usize = 2;
/// Rows from the bottom at which the next page is requested.
pub const LOAD_MORE_THRESHOLD_ROWS: usize = 3;

pub struct SidePanel {
    pub list: ScrollableList<VideoResult>,
    pub search: FilterInput,
    debouncer: Debouncer,
    /// Term currently applied to the list (post-debounce).
    applied_term: String,
    /// Where the tiles were last drawn.  Zero-sized until the first draw.
    list_area: Rect,
    /// (visible count, loading, height) the overflow check last ran for.
    overflow_key: Option<(usize, bool, usize)>,
}

impl SidePanel {
    pub fn new(debounce: Duration) -> Self {
        Self {
            list: ScrollableList::new(TILE_HEIGHT, video_matches),
            search: FilterInput::new("search videos..."),
            debouncer: Debouncer::new(debounce),
            applied_term: String::new(),
            list_area: Rect::default(),
            overflow_key: None,
        }
    }

    pub fn applied_term(&self) -> &str {
        &self.applied_term
    }

    /// Pull newly fetched pages into the list.  The dashboard only ever
    /// appends, so a length change is the whole story.
    fn sync_items(&mut self, state: &AppState) {
        let videos = state.dashboard.videos();
        if videos.len() != self.list.total_len() {
            self.list.set_items(videos.to_vec());
        }
    }

    fn list_height(&self) -> usize {
        self.list_area.height as usize
    }

    fn can_load_more(state: &AppState) -> bool {
        let d = &state.dashboard;
        !d.is_loading() && d.has_more() && d.error().is_none()
    }

    /// After the viewport moved: request the next page when close to the end.
    fn after_scroll(&mut self, state: &AppState) -> Vec<Action> {
        let height = self.list_height();
        if height == 0 {
            return vec![];
        }
        self.list.ensure_visible(height);
        if Self::can_load_more(state) && self.list.near_bottom(height, LOAD_MORE_THRESHOLD_ROWS) {
            return vec![Action::LoadMore];
        }
        vec![]
    }

    /// A list that doesn't fill the viewport can't be scrolled, so ask for
    /// more right away.  Runs once per change of what's on screen.
    fn check_overflow(&mut self, state: &AppState) -> Vec<Action> {
        let height = self.list_height();
        if height == 0 {
            return vec![];
        }
        let loading = state.dashboard.is_loading();
        let key = (self.list.len(), loading, height);
        if self.overflow_key == Some(key) {
            return vec![];
        }
        self.overflow_key = Some(key);
        if Self::can_load_more(state) && !self.list.has_overflow(height) {
            return vec![Action::LoadMore];
        }
        vec![]
    }

    fn apply_term(&mut self, term: String) -> Action {
        self.list.set_filter(&term);
        self.applied_term = term.clone();
        Action::SearchApplied(term)
    }

    fn show_skeletons(&self, state: &AppState) -> bool {
        state.dashboard.is_loading() || (self.list.is_empty() && state.dashboard.selected().is_none())
    }

    fn tile_lines(
        &self,
        video: &VideoResult,
        is_cursor: bool,
        focused: bool,
        state: &AppState,
        width: usize,
    ) -> [Line<'static>; 2] {
        let is_selected = state
            .dashboard
            .selected()
            .is_some_and(|s| s.video_id() == video.video_id() && s.channel_id() == video.channel_id());

        let bg = if is_cursor && focused {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };

        let (marker, marker_color) = if is_selected {
            ("▶ ", C_PLAYING)
        } else {
            ("  ", C_MUTED)
        };

        let mut spans = vec![Span::styled(marker, Style::default().fg(marker_color))];
        let mut used = 2;
        if video.is_live() {
            spans.push(Span::styled(
                "LIVE ",
                Style::default().fg(C_BADGE_LIVE).add_modifier(Modifier::BOLD),
            ));
            used += 5;
        }

        let title_color = if video.channel_id().is_some() {
            C_CHANNEL
        } else if is_selected || is_cursor {
            C_PRIMARY
        } else {
            C_SECONDARY
        };
        let mut title_style = Style::default().fg(title_color);
        if is_selected || is_cursor {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let mut title = video.display_title();
        if video.channel_id().is_some() {
            title.push_str(" ↗");
        }
        spans.push(Span::styled(
            fit_width(&title, width.saturating_sub(used)),
            title_style,
        ));

        let description = fit_width(
            &description_preview(video.snippet.description.as_deref()),
            width.saturating_sub(2),
        );
        [
            Line::from(spans).style(bg),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(description, Style::default().fg(C_MUTED)),
            ])
            .style(bg),
        ]
    }
}

fn skeleton_lines(width: usize) -> [Line<'static>; 2] {
    let long = width.saturating_sub(2) * 3 / 4;
    let short = width.saturating_sub(2) / 2;
    [
        Line::from(Span::styled(format!("  {}", "▒".repeat(long)), style_skeleton())),
        Line::from(Span::styled(format!("  {}", "░".repeat(short)), style_skeleton())),
    ]
}

/// Status line under the search bar.
pub fn status_message(term: &str, result_count: usize, has_more: bool) -> String {
    if !term.is_empty() {
        format!("Found {} results for \"{}\"", result_count, term)
    } else if has_more {
        "Scroll down to see more results.".to_string()
    } else {
        "No more results to display.".to_string()
    }
}

/// Channel results open in the browser; everything else becomes the selection.
pub fn activate(video: &VideoResult) -> Action {
    match video.channel_url() {
        Some(url) => Action::OpenUrl(url),
        None => Action::SelectVideo(video.clone()),
    }
}

impl Component for SidePanel {
    fn id(&self) -> ComponentId {
        ComponentId::SidePanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync_items(state);

        if self.search.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return self.after_scroll(state);
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return self.after_scroll(state);
                }
                _ => {}
            }
            return match self.search.handle_key(key) {
                FilterAction::Changed(term) => {
                    self.debouncer.push(term, Instant::now());
                    vec![]
                }
                // Enter applies a term still waiting out the debounce
                FilterAction::Confirmed if self.debouncer.is_pending() => {
                    self.debouncer.cancel();
                    let term = self.search.text().to_string();
                    vec![self.apply_term(term), Action::CloseSearch]
                }
                FilterAction::Confirmed | FilterAction::Cancelled => vec![Action::CloseSearch],
                FilterAction::None => vec![],
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        let page = self.list.page_len(self.list_height()).max(1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_up(step);
                return self.after_scroll(state);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_down(step);
                return self.after_scroll(state);
            }
            KeyCode::PageUp => {
                self.list.select_up(page);
                return self.after_scroll(state);
            }
            KeyCode::PageDown => {
                self.list.select_down(page);
                return self.after_scroll(state);
            }
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => {
                self.list.select_last();
                return self.after_scroll(state);
            }

            KeyCode::Enter => {
                if let Some(video) = self.list.selected_item() {
                    return vec![activate(video)];
                }
            }

            KeyCode::Char('/') => {
                self.search.activate();
                return vec![Action::OpenSearch];
            }

            KeyCode::Char('y') => {
                if let Some(video) = self.list.selected_item() {
                    let url = video.channel_url().unwrap_or_else(|| video.watch_url());
                    return vec![Action::CopyToClipboard(url)];
                }
            }

            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        self.sync_items(state);
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.list.select_up(1);
                self.after_scroll(state)
            }
            MouseEventKind::ScrollDown => {
                self.list.select_down(1);
                self.after_scroll(state)
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let area = self.list_area;
                if event.row < area.y || event.row >= area.y + area.height {
                    return vec![];
                }
                let rel_row = (event.row - area.y) as usize;
                if self.list.handle_click(rel_row) {
                    if let Some(video) = self.list.selected_item() {
                        return vec![activate(video)];
                    }
                }
                vec![]
            }
            _ => vec![],
        }
    }

    fn tick(&mut self, now: Instant, state: &AppState) -> Vec<Action> {
        self.sync_items(state);
        let mut actions = Vec::new();
        if let Some(term) = self.debouncer.poll(now) {
            actions.push(self.apply_term(term));
        }
        actions.extend(self.check_overflow(state));
        actions
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::CloseSearch = action {
            self.search.deactivate();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        self.sync_items(state);

        let badge = Badge::count(
            self.list.len(),
            self.list.total_len(),
            !self.applied_term.is_empty(),
        );
        let note = state.dashboard.is_loading().then_some("loading…");
        let block = pane_block(self.id(), focused, Some(badge), note);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [search_area, status_area, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        self.search.draw(frame, search_area);

        let status = status_message(
            &self.applied_term,
            self.list.len(),
            state.dashboard.has_more(),
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                fit_width(&format!(" {}", status), status_area.width as usize),
                Style::default().fg(C_MUTED),
            )),
            status_area,
        );

        self.list_area = list_area;
        let height = list_area.height as usize;
        let width = list_area.width as usize;
        self.list.ensure_visible(height);

        let mut lines: Vec<Line> = Vec::with_capacity(height);
        let visible: Vec<(usize, VideoResult)> = self
            .list
            .visible_items(height)
            .into_iter()
            .map(|(i, v)| (i, v.clone()))
            .collect();
        let cursor = self.list.filtered_indices.get(self.list.selected).copied();
        for (orig_idx, video) in &visible {
            let is_cursor = cursor == Some(*orig_idx);
            lines.extend(self.tile_lines(video, is_cursor, focused, state, width));
        }

        if self.show_skeletons(state) {
            for _ in 0..state.dashboard.limit() {
                if lines.len() + TILE_HEIGHT > height {
                    break;
                }
                lines.extend(skeleton_lines(width));
            }
        }

        frame.render_widget(Paragraph::new(lines), list_area);
    }
}
