//! Status bar: error banner, last log line, and keybindings footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::ComponentId;
use crate::format::fit_width;
use crate::theme::{
    C_ACCENT, C_BANNER_BG, C_BANNER_FG, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_PLAYING,
    C_SECONDARY, C_SEPARATOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
        }
    }
}

/// Draw the fetch error banner across `area`.
pub fn draw_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let text = fit_width(
        &format!(" ✗ {}  (R retry)", message),
        area.width as usize,
    );
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(C_BANNER_FG).add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(C_BANNER_BG));
    frame.render_widget(paragraph, area);
}

/// Draw the log bar: server reachability dot and the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, text: &str, connected: bool) {
    let conn_span = if connected {
        Span::styled("●", Style::default().fg(C_PLAYING))
    } else {
        Span::styled("○", Style::default().fg(C_ACCENT))
    };

    let log = fit_width(text, (area.width as usize).saturating_sub(2));
    let log_span = Span::styled(log, Style::default().fg(C_SECONDARY));

    let line = Line::from(vec![conn_span, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

pub fn keys_hint(mode: InputMode, focus: ComponentId) -> &'static str {
    match mode {
        InputMode::Search => " type to search  Esc clear+close  Enter keep",
        InputMode::Normal => match focus {
            ComponentId::SidePanel => {
                " ↑↓/jk select  Enter open  y copy url  / search  R retry  Tab player  q quit"
            }
            ComponentId::PlayerPanel => {
                " Space play/pause  ,/. start ∓  </> end ∓  drag slider  Tab list  q quit"
            }
        },
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, focus: ComponentId) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys_hint(mode, focus), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_banner_mentions_retry() {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal
            .draw(|f| draw_error_banner(f, f.area(), "Failed to load more videos"))
            .unwrap();
        let text = row(&terminal, 0);
        assert!(text.contains("Failed to load more videos"));
        assert!(text.contains("R retry"));
    }

    #[test]
    fn test_keys_bar_shows_mode() {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal
            .draw(|f| draw_keys_bar(f, f.area(), InputMode::Search, ComponentId::SidePanel))
            .unwrap();
        assert!(row(&terminal, 0).starts_with(" SEARCH "));
    }
}
