//! Bordered frame shared by the two dashboard panes.
//!
//! The header reads `[1] videos` / `[2] player`: the digit is the focus key.
//! Badges sit top-right, an optional note bottom-left.

use crate::action::ComponentId;
use crate::theme::{
    style_focused_border, style_title, style_unfocused_border, C_BADGE_LIVE, C_MUTED,
    C_NUMBER_HINT, C_SECONDARY,
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

pub struct Badge {
    pub text: String,
    pub color: Color,
}

impl Badge {
    /// Result count; `shown/total` while a search narrows the list.
    pub fn count(shown: usize, total: usize, searching: bool) -> Self {
        let text = if searching {
            format!("{}/{}", shown, total)
        } else {
            shown.to_string()
        };
        Self {
            text,
            color: C_SECONDARY,
        }
    }

    pub fn live() -> Self {
        Self {
            text: "LIVE".to_string(),
            color: C_BADGE_LIVE,
        }
    }
}

fn header(pane: ComponentId) -> (char, &'static str) {
    match pane {
        ComponentId::SidePanel => ('1', "videos"),
        ComponentId::PlayerPanel => ('2', "player"),
    }
}

pub fn pane_block(
    pane: ComponentId,
    focused: bool,
    badge: Option<Badge>,
    note: Option<&str>,
) -> Block<'static> {
    let (key, title) = header(pane);
    let (border_style, title_style) = if focused {
        (style_focused_border(), style_title())
    } else {
        (style_unfocused_border(), Style::default().fg(C_MUTED))
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(vec![
            Span::styled(format!("[{}] ", key), Style::default().fg(C_NUMBER_HINT)),
            Span::styled(title, title_style),
        ]));

    if let Some(b) = badge {
        block = block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        );
    }
    if let Some(note) = note {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", note),
            Style::default().fg(C_MUTED),
        )));
    }
    block
}
