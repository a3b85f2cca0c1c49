//! Two-handle trim slider with a playhead.
//!
//! One row.  Positions are percentages; column `0` is 0% and the last column
//! is 100%.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::player::Handle;
use crate::theme::{C_HANDLE, C_PLAYHEAD, C_TRACK, C_TRIM_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderCell {
    Track,
    Range,
    LeftHandle,
    RightHandle,
    Playhead,
}

impl SliderCell {
    fn symbol(self) -> &'static str {
        match self {
            Self::Track => "─",
            Self::Range => "━",
            Self::LeftHandle => "┣",
            Self::RightHandle => "┫",
            Self::Playhead => "●",
        }
    }
}

pub struct TrimSlider {
    pub start: f64,
    pub end: f64,
    /// Playhead as a percentage; `None` hides it.
    pub playhead: Option<f64>,
    pub active: Option<Handle>,
}

pub fn percent_to_column(percent: f64, width: u16) -> u16 {
    if width <= 1 {
        return 0;
    }
    let span = (width - 1) as f64;
    (percent.clamp(0.0, 100.0) / 100.0 * span).round() as u16
}

/// Map an absolute terminal column inside `area` to a percentage.
pub fn column_to_percent(area: Rect, column: u16) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }
    let rel = column.saturating_sub(area.x).min(area.width - 1) as f64;
    rel / (area.width - 1) as f64 * 100.0
}

/// The handle closest to `percent`; ties go to the side the click is on.
pub fn pick_handle(start: f64, end: f64, percent: f64) -> Handle {
    let to_start = (percent - start).abs();
    let to_end = (percent - end).abs();
    if to_start < to_end || (to_start == to_end && percent <= start) {
        Handle::Left
    } else {
        Handle::Right
    }
}

impl TrimSlider {
    pub fn cells(&self, width: u16) -> Vec<SliderCell> {
        let left = percent_to_column(self.start, width);
        let right = percent_to_column(self.end, width);
        let mut cells: Vec<SliderCell> = (0..width)
            .map(|col| {
                if col > left && col < right {
                    SliderCell::Range
                } else {
                    SliderCell::Track
                }
            })
            .collect();
        if let Some(p) = self.playhead {
            if let Some(c) = cells.get_mut(percent_to_column(p, width) as usize) {
                *c = SliderCell::Playhead;
            }
        }
        if let Some(c) = cells.get_mut(left as usize) {
            *c = SliderCell::LeftHandle;
        }
        if let Some(c) = cells.get_mut(right as usize) {
            *c = SliderCell::RightHandle;
        }
        cells
    }
}

impl Widget for TrimSlider {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        for (i, cell) in self.cells(area.width).into_iter().enumerate() {
            let mut style = match cell {
                SliderCell::Track => Style::default().fg(C_TRACK),
                SliderCell::Range => Style::default().fg(C_TRIM_RANGE),
                SliderCell::LeftHandle | SliderCell::RightHandle => {
                    Style::default().fg(C_HANDLE).add_modifier(Modifier::BOLD)
                }
                SliderCell::Playhead => Style::default().fg(C_PLAYHEAD),
            };
            let dragged = matches!(
                (cell, self.active),
                (SliderCell::LeftHandle, Some(Handle::Left))
                    | (SliderCell::RightHandle, Some(Handle::Right))
            );
            if dragged {
                style = style.fg(C_PLAYHEAD);
            }
            buf.set_string(area.x + i as u16, area.y, cell.symbol(), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_layout() {
        let slider = TrimSlider {
            start: 0.0,
            end: 50.0,
            playhead: Some(25.0),
            active: None,
        };
        let cells = slider.cells(11);
        assert_eq!(cells[0], SliderCell::LeftHandle);
        assert_eq!(cells[1], SliderCell::Range);
        assert_eq!(cells[3], SliderCell::Playhead);
        assert_eq!(cells[5], SliderCell::RightHandle);
        assert_eq!(cells[6], SliderCell::Track);
        assert_eq!(cells[10], SliderCell::Track);
    }

    #[test]
    fn test_hidden_playhead() {
        let slider = TrimSlider {
            start: 10.0,
            end: 90.0,
            playhead: None,
            active: None,
        };
        assert!(!slider.cells(40).contains(&SliderCell::Playhead));
    }

    #[test]
    fn test_column_mapping() {
        let area = Rect::new(10, 0, 101, 1);
        assert_eq!(column_to_percent(area, 10), 0.0);
        assert_eq!(column_to_percent(area, 60), 50.0);
        assert_eq!(column_to_percent(area, 110), 100.0);
        assert_eq!(column_to_percent(area, 500), 100.0);
        assert_eq!(column_to_percent(area, 0), 0.0);
        assert_eq!(percent_to_column(50.0, 101), 50);
    }

    #[test]
    fn test_pick_nearest_handle() {
        assert_eq!(pick_handle(20.0, 80.0, 10.0), Handle::Left);
        assert_eq!(pick_handle(20.0, 80.0, 60.0), Handle::Right);
        assert_eq!(pick_handle(50.0, 50.0, 40.0), Handle::Left);
        assert_eq!(pick_handle(50.0, 50.0, 60.0), Handle::Right);
    }
}
