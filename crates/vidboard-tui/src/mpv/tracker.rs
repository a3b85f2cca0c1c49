//! Folds raw mpv events into the widget's playback state.

use super::{MpvEvent, OBS_CORE_IDLE, OBS_DURATION, OBS_EOF_REACHED, OBS_IDLE_ACTIVE, OBS_PAUSE, OBS_TIME_POS};
use crate::player::{WidgetProbe, WidgetState};

/// What a single event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerUpdate {
    Nothing,
    Position,
    State(WidgetState),
}

#[derive(Debug, Default)]
pub struct MpvStateTracker {
    loaded: bool,
    /// Playback has begun since the file was loaded; a pause before that is
    /// a cue, a pause after it is a pause.
    started: bool,
    paused: bool,
    core_idle: bool,
    eof: bool,
    time_pos: f64,
    duration: f64,
    state: WidgetState,
}

impl MpvStateTracker {
    pub fn apply(&mut self, event: &MpvEvent) -> TrackerUpdate {
        let mut position = false;
        if let Some((id, data)) = event.as_property_change() {
            match id {
                OBS_PAUSE => self.paused = data.as_bool().unwrap_or(false),
                OBS_CORE_IDLE => self.core_idle = data.as_bool().unwrap_or(false),
                OBS_EOF_REACHED => self.eof = data.as_bool().unwrap_or(false),
                OBS_IDLE_ACTIVE => {
                    if data.as_bool().unwrap_or(false) {
                        self.loaded = false;
                    }
                }
                OBS_TIME_POS => {
                    self.time_pos = data.as_f64().unwrap_or(0.0);
                    position = true;
                }
                OBS_DURATION => {
                    self.duration = data.as_f64().unwrap_or(0.0);
                    position = true;
                }
                _ => {}
            }
        } else {
            match event.event_name() {
                Some("start-file") => {
                    self.loaded = false;
                    self.started = false;
                    self.eof = false;
                    self.time_pos = 0.0;
                    self.duration = 0.0;
                }
                Some("file-loaded") => self.loaded = true,
                Some("end-file") => {
                    if event.raw.get("reason").and_then(|r| r.as_str()) == Some("error") {
                        self.loaded = false;
                    }
                }
                _ => {}
            }
        }

        let next = self.derive();
        if next != self.state {
            self.state = next;
            TrackerUpdate::State(next)
        } else if position {
            TrackerUpdate::Position
        } else {
            TrackerUpdate::Nothing
        }
    }

    fn derive(&mut self) -> WidgetState {
        if !self.loaded {
            WidgetState::Unstarted
        } else if self.eof {
            WidgetState::Ended
        } else if self.paused && !self.started {
            if self.duration > 0.0 {
                WidgetState::Cued
            } else {
                WidgetState::Unstarted
            }
        } else if self.paused {
            WidgetState::Paused
        } else if self.core_idle {
            WidgetState::Buffering
        } else {
            self.started = true;
            WidgetState::Playing
        }
    }

    pub fn probe(&self) -> WidgetProbe {
        WidgetProbe {
            current_time: self.time_pos,
            duration: self.duration,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn prop(id: u64, data: Value) -> MpvEvent {
        MpvEvent {
            raw: json!({"event": "property-change", "id": id, "data": data}),
        }
    }

    fn named(name: &str) -> MpvEvent {
        MpvEvent {
            raw: json!({"event": name}),
        }
    }

    #[test]
    fn test_cue_play_pause_end() {
        let mut t = MpvStateTracker::default();
        assert_eq!(t.apply(&prop(OBS_PAUSE, json!(true))), TrackerUpdate::Nothing);
        assert_eq!(t.apply(&named("start-file")), TrackerUpdate::Nothing);
        assert_eq!(t.apply(&named("file-loaded")), TrackerUpdate::Nothing);
        assert_eq!(
            t.apply(&prop(OBS_DURATION, json!(240.0))),
            TrackerUpdate::State(WidgetState::Cued)
        );
        assert_eq!(t.probe().duration, 240.0);

        t.apply(&prop(OBS_CORE_IDLE, json!(true)));
        assert_eq!(
            t.apply(&prop(OBS_PAUSE, json!(false))),
            TrackerUpdate::State(WidgetState::Buffering)
        );
        assert_eq!(
            t.apply(&prop(OBS_CORE_IDLE, json!(false))),
            TrackerUpdate::State(WidgetState::Playing)
        );
        assert_eq!(t.apply(&prop(OBS_TIME_POS, json!(3.5))), TrackerUpdate::Position);
        assert_eq!(t.probe().current_time, 3.5);

        assert_eq!(
            t.apply(&prop(OBS_PAUSE, json!(true))),
            TrackerUpdate::State(WidgetState::Paused)
        );
        assert_eq!(
            t.apply(&prop(OBS_EOF_REACHED, json!(true))),
            TrackerUpdate::State(WidgetState::Ended)
        );
        assert_eq!(
            t.apply(&prop(OBS_EOF_REACHED, json!(false))),
            TrackerUpdate::State(WidgetState::Paused)
        );
    }

    #[test]
    fn test_new_file_resets_to_unstarted() {
        let mut t = MpvStateTracker::default();
        t.apply(&named("file-loaded"));
        t.apply(&prop(OBS_DURATION, json!(10.0)));
        t.apply(&prop(OBS_PAUSE, json!(false)));
        assert_eq!(t.probe().state, WidgetState::Playing);

        t.apply(&prop(OBS_PAUSE, json!(true)));
        assert_eq!(
            t.apply(&named("start-file")),
            TrackerUpdate::State(WidgetState::Unstarted)
        );
        assert_eq!(t.probe().duration, 0.0);
        t.apply(&named("file-loaded"));
        assert_eq!(
            t.apply(&prop(OBS_DURATION, json!(99.0))),
            TrackerUpdate::State(WidgetState::Cued)
        );
    }

    #[test]
    fn test_load_error_is_unstarted() {
        let mut t = MpvStateTracker::default();
        t.apply(&named("file-loaded"));
        t.apply(&prop(OBS_PAUSE, json!(false)));
        let ev = MpvEvent {
            raw: json!({"event": "end-file", "reason": "error"}),
        };
        assert_eq!(t.apply(&ev), TrackerUpdate::State(WidgetState::Unstarted));
    }
}
