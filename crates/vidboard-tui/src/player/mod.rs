//! Player widget lifecycle and the two player flavours mounted over it.

pub mod container;
pub mod factory;
pub mod live;
pub mod standard;

/// Playback state as reported by the widget.  Discriminants follow the
/// embedded-player convention (`-1` unstarted ... `5` cued).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    #[default]
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl WidgetState {
    pub fn code(self) -> i8 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Buffering => 3,
            Self::Cued => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unstarted => "unstarted",
            Self::Ended => "ended",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Buffering => "buffering",
            Self::Cued => "cued",
        }
    }
}

/// Commands a mounted player sends to its widget.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Cue { video_id: String },
    Play,
    Pause,
    SeekTo(f64),
}

/// Last observed widget position.  Seconds; `duration <= 0` means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WidgetProbe {
    pub current_time: f64,
    pub duration: f64,
    pub state: WidgetState,
}

/// Start/stop handle for the trim-enforcement poll.  The tick itself is driven
/// by the event loop; this only records whether it should act.
#[derive(Debug, Default)]
pub struct PollTimer {
    running: bool,
}

impl PollTimer {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
    pub instance: u64,
    pub kind: WidgetEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEventKind {
    Ready,
    /// Fresh position/duration; no state transition.
    Snapshot(WidgetProbe),
    StateChange(WidgetProbe),
    Failed(String),
}

/// What the player pane draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlayerView {
    #[default]
    Empty,
    Live {
        title: String,
        is_playing: bool,
    },
    Standard(StandardView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardView {
    pub title: String,
    pub is_playing: bool,
    pub loading: bool,
    pub current_time: f64,
    pub duration: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    pub dragging: Option<Handle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes() {
        assert_eq!(WidgetState::Unstarted.code(), -1);
        assert_eq!(WidgetState::Ended.code(), 0);
        assert_eq!(WidgetState::Cued.code(), 5);
        assert_eq!(WidgetState::default(), WidgetState::Unstarted);
    }

    #[test]
    fn test_poll_timer() {
        let mut t = PollTimer::default();
        assert!(!t.is_running());
        t.start();
        assert!(t.is_running());
        t.stop();
        assert!(!t.is_running());
    }
}
