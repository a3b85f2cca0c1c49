//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this, but never mutate it.  The App event-loop is the only
//! thing that writes to AppState.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::dashboard::Dashboard;
use crate::player::PlayerView;
use crate::widgets::status_bar::InputMode;

const MAX_LOG_LINES: usize = 200;

pub struct AppState {
    pub dashboard: Dashboard,
    /// Snapshot of the mounted player, refreshed after every player change.
    pub player: PlayerView,
    /// False after the last fetch failed.
    pub connected: bool,
    pub input_mode: InputMode,
    /// Recent warn/error lines mirrored from tracing.
    pub logs: VecDeque<String>,
    pub log_path: PathBuf,
}

impl AppState {
    pub fn new(dashboard: Dashboard, log_path: PathBuf) -> Self {
        Self {
            dashboard,
            player: PlayerView::Empty,
            connected: true,
            input_mode: InputMode::Normal,
            logs: VecDeque::new(),
            log_path,
        }
    }

    pub fn push_log(&mut self, line: String) {
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }

    /// The last mirrored line; until there is one, where the full log lives.
    pub fn log_bar_text(&self) -> String {
        match self.last_log() {
            Some(line) => line.to_string(),
            None => format!("log: {}", self.log_path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_ring_is_bounded() {
        let mut state = AppState::new(Dashboard::new(10), PathBuf::from("/tmp/x.log"));
        for i in 0..(MAX_LOG_LINES + 5) {
            state.push_log(format!("line {}", i));
        }
        assert_eq!(state.logs.len(), MAX_LOG_LINES);
        assert_eq!(state.last_log(), Some("line 204"));
        assert_eq!(state.log_bar_text(), "line 204");
    }

    #[test]
    fn test_log_bar_points_at_log_file_until_first_line() {
        let mut state = AppState::new(Dashboard::new(10), PathBuf::from("/tmp/x.log"));
        assert_eq!(state.log_bar_text(), "log: /tmp/x.log");
        state.push_log("12:00:00 [WARN] slow".to_string());
        assert_eq!(state.log_bar_text(), "12:00:00 [WARN] slow");
    }
}
