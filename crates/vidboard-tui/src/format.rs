//! Display formatting shared by the panes.

pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// `M:SS`, minutes unbounded (`75:03` rather than `1:15:03`).
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// First 100 characters of the description followed by `...`.  The ellipsis is
/// appended even when nothing was cut, and a missing description renders as
/// just `...`.
pub fn description_preview(description: Option<&str>) -> String {
    let head: String = description
        .unwrap_or("")
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS)
        .collect();
    format!("{}...", head)
}

/// Cut `text` to fit `width` terminal columns, marking the cut with `…`.
pub fn fit_width(text: &str, width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
