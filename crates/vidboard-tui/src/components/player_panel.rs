//! PlayerPanel component: right pane: title, play/pause, time and the trim slider.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    format::{fit_width, format_time},
    player::{Handle, PlayerView, StandardView},
    theme::{
        style_muted, style_skeleton, style_title, C_LOADING, C_MUTED, C_PLAYING,
        C_PRIMARY, C_SECONDARY,
    },
    widgets::{
        pane_chrome::{pane_block, Badge},
        trim_slider::{column_to_percent, pick_handle, TrimSlider},
    },
};

/// Trim points moved per nudge key.
const NUDGE_STEP: f64 = 1.0;

pub struct PlayerPanel {
    slider_area: Rect,
    button_area: Rect,
    /// Handle grabbed by the mouse, until the button is released.
    grabbed: Option<Handle>,
}

impl PlayerPanel {
    pub fn new() -> Self {
        Self {
            slider_area: Rect::default(),
            button_area: Rect::default(),
            grabbed: None,
        }
    }

    /// Mouse drags keep going to this pane while a handle is held.
    pub fn is_dragging(&self) -> bool {
        self.grabbed.is_some()
    }

    fn draw_title(frame: &mut Frame, area: Rect, title: &str) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                fit_width(title, area.width as usize),
                style_title(),
            )),
            area,
        );
    }

    fn draw_controls(&mut self, frame: &mut Frame, area: Rect, is_playing: bool, extra: Vec<Span>) {
        let label = if is_playing { "[ Pause ]" } else { "[ Play ]" };
        self.button_area = Rect {
            width: (label.len() as u16).min(area.width),
            height: area.height.min(1),
            ..area
        };
        let mut spans = vec![Span::styled(
            label,
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )];
        spans.extend(extra);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_standard(&mut self, frame: &mut Frame, inner: Rect, view: &StandardView) {
        let [title_area, controls_area, _, slider_row, labels_area, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        Self::draw_title(frame, title_area, &view.title);

        let mut extra = vec![
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} / {}",
                    format_time(view.current_time),
                    format_time(view.duration)
                ),
                Style::default().fg(C_SECONDARY),
            ),
        ];
        if view.loading {
            extra.push(Span::styled("  loading…", Style::default().fg(C_LOADING)));
        }
        self.draw_controls(frame, controls_area, view.is_playing, extra);

        // one column of margin so the end handles stay clickable
        self.slider_area = Rect {
            x: slider_row.x + 1,
            width: slider_row.width.saturating_sub(2),
            ..slider_row
        };
        let playhead = (!view.loading && view.duration > 0.0)
            .then(|| view.current_time / view.duration * 100.0);
        frame.render_widget(
            TrimSlider {
                start: view.trim_start,
                end: view.trim_end,
                playhead,
                active: view.dragging,
            },
            self.slider_area,
        );

        let [start_area, end_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(labels_area);
        let start = format!(
            " Start: {}",
            format_time(view.trim_start / 100.0 * view.duration)
        );
        let end = format!(
            "End: {} ",
            format_time(view.trim_end / 100.0 * view.duration)
        );
        frame.render_widget(Paragraph::new(Span::styled(start, style_muted())), start_area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(end, style_muted())).right_aligned()),
            end_area,
        );
    }

    fn draw_live(&mut self, frame: &mut Frame, inner: Rect, title: &str, is_playing: bool) {
        let [title_area, controls_area, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);
        Self::draw_title(frame, title_area, &format!("LIVE: {}", title));
        let status = if is_playing {
            Span::styled("  ● on air", Style::default().fg(C_PLAYING))
        } else {
            Span::styled("  ○ paused", Style::default().fg(C_MUTED))
        };
        self.draw_controls(frame, controls_area, is_playing, vec![status]);
        self.slider_area = Rect::default();
    }

    fn draw_skeleton(frame: &mut Frame, inner: Rect) {
        let width = inner.width.saturating_sub(2) as usize;
        let lines: Vec<Line> = [width * 2 / 3, width / 3, 0, width]
            .into_iter()
            .map(|w| Line::from(Span::styled(format!(" {}", "▒".repeat(w)), style_skeleton())))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Default for PlayerPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

impl Component for PlayerPanel {
    fn id(&self) -> ComponentId {
        ComponentId::PlayerPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let is_standard = matches!(state.player, PlayerView::Standard(_));
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                if !matches!(state.player, PlayerView::Empty) {
                    return vec![Action::TogglePlay];
                }
            }
            KeyCode::Char(',') if is_standard => {
                return vec![Action::Nudge(Handle::Left, -NUDGE_STEP)];
            }
            KeyCode::Char('.') if is_standard => {
                return vec![Action::Nudge(Handle::Left, NUDGE_STEP)];
            }
            KeyCode::Char('<') if is_standard => {
                return vec![Action::Nudge(Handle::Right, -NUDGE_STEP)];
            }
            KeyCode::Char('>') if is_standard => {
                return vec![Action::Nudge(Handle::Right, NUDGE_STEP)];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.button_area, event.column, event.row)
                    && !matches!(state.player, PlayerView::Empty)
                {
                    return vec![Action::TogglePlay];
                }
                let PlayerView::Standard(view) = &state.player else {
                    return vec![];
                };
                if !contains(self.slider_area, event.column, event.row) {
                    return vec![];
                }
                let percent = column_to_percent(self.slider_area, event.column);
                let handle = pick_handle(view.trim_start, view.trim_end, percent);
                self.grabbed = Some(handle);
                vec![Action::DragStart(handle), Action::SliderChange(handle, percent)]
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.grabbed {
                Some(handle) => vec![Action::SliderChange(
                    handle,
                    column_to_percent(self.slider_area, event.column),
                )],
                None => vec![],
            },
            MouseEventKind::Up(MouseButton::Left) => match self.grabbed.take() {
                Some(_) => vec![Action::DragEnd],
                None => vec![],
            },
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let live = matches!(state.player, PlayerView::Live { .. });
        let badge = live.then(Badge::live);
        let block = pane_block(self.id(), focused, badge, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.button_area = Rect::default();
        match &state.player {
            PlayerView::Empty => {
                self.slider_area = Rect::default();
                if state.dashboard.videos().is_empty() {
                    Self::draw_skeleton(frame, inner);
                } else {
                    let [_, middle, _] = Layout::vertical([
                        Constraint::Fill(1),
                        Constraint::Length(1),
                        Constraint::Fill(1),
                    ])
                    .areas(inner);
                    frame.render_widget(
                        Paragraph::new(
                            Line::from(Span::styled("No video selected", style_muted()))
                                .centered(),
                        ),
                        middle,
                    );
                }
            }
            PlayerView::Live { title, is_playing } => {
                self.draw_live(frame, inner, title, *is_playing);
            }
            PlayerView::Standard(view) => {
                let view = view.clone();
                self.draw_standard(frame, inner, &view);
            }
        }
    }
}
