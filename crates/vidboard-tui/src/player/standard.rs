//! Standard (trimmable) player.
//!
//! Keeps the trim window as percentages of the video duration, persists it
//! per video, and keeps playback inside the window while the poll timer runs.

use super::{Handle, PlayerCommand, PollTimer, StandardView, WidgetProbe, WidgetState};
use tracing::{debug, warn};
use vidboard_proto::catalog::VideoResult;
use vidboard_proto::trim::{TrimRecord, TrimStore, MIN_TRIM_GAP, TRIM_MAX, TRIM_MIN};

pub struct StandardPlayer {
    store: TrimStore,
    video_id: Option<String>,
    ready: bool,
    is_playing: bool,
    duration: f64,
    current_time: f64,
    trim_start: f64,
    trim_end: f64,
    dragging: Option<Handle>,
    loading: bool,
    poll: PollTimer,
}

impl StandardPlayer {
    pub fn new(store: TrimStore) -> Self {
        Self {
            store,
            video_id: None,
            ready: false,
            is_playing: false,
            duration: 0.0,
            current_time: 0.0,
            trim_start: TRIM_MIN,
            trim_end: TRIM_MAX,
            dragging: None,
            loading: false,
            poll: PollTimer::default(),
        }
    }

    /// Widget finished initialising: cue whatever is selected.
    pub fn on_ready(&mut self, selected: Option<&VideoResult>) -> Vec<PlayerCommand> {
        self.ready = true;
        match selected {
            Some(video) => self.load_video(video),
            None => Vec::new(),
        }
    }

    /// Selection changed.  Ignored until the widget is ready; the ready
    /// handler picks up the selection then.
    pub fn on_selected(&mut self, video: &VideoResult) -> Vec<PlayerCommand> {
        if !self.ready || self.video_id.as_deref() == Some(video.video_id()) {
            return Vec::new();
        }
        self.load_video(video)
    }

    pub fn load_video(&mut self, video: &VideoResult) -> Vec<PlayerCommand> {
        let video_id = video.video_id().to_string();
        if video_id.is_empty() {
            debug!("trim: {:?} has no video id; nothing to cue", video.snippet.title);
            return Vec::new();
        }
        self.loading = true;
        let record = self.store.load(&video_id);
        self.trim_start = record.start;
        self.trim_end = record.end;
        debug!(
            "trim: loading {} with window {}..{}",
            video_id, record.start, record.end
        );
        self.video_id = Some(video_id.clone());
        vec![PlayerCommand::Cue { video_id }]
    }

    /// Trim bounds in seconds for the current duration.
    pub fn trim_times(&self) -> (f64, f64) {
        (
            self.trim_start / 100.0 * self.duration,
            self.trim_end / 100.0 * self.duration,
        )
    }

    pub fn on_state_change(&mut self, probe: WidgetProbe) {
        match probe.state {
            WidgetState::Cued => {
                self.duration = probe.duration;
                self.current_time = self.trim_start / 100.0 * self.duration;
                self.loading = false;
            }
            WidgetState::Paused => {
                self.current_time = probe.current_time;
            }
            WidgetState::Ended => {
                if probe.duration > 0.0 {
                    self.duration = probe.duration;
                }
                self.current_time = self.duration;
            }
            _ => {}
        }

        self.is_playing = probe.state == WidgetState::Playing;
        if self.is_playing {
            self.poll.start();
        } else {
            self.poll.stop();
        }
    }

    /// One poll tick.  Keeps playback inside the window unless a handle is
    /// being dragged.
    pub fn on_poll_tick(&mut self, probe: WidgetProbe) -> Vec<PlayerCommand> {
        if !self.poll.is_running() {
            return Vec::new();
        }
        if self.duration <= 0.0 && probe.duration > 0.0 {
            self.duration = probe.duration;
        }
        self.current_time = probe.current_time;
        if self.dragging.is_some() || self.duration <= 0.0 {
            return Vec::new();
        }

        let (start, end) = self.trim_times();
        if probe.current_time >= end || probe.current_time < start {
            debug!(
                "trim: {:.1}s outside {:.1}..{:.1}, seeking to start",
                probe.current_time, start, end
            );
            self.current_time = start;
            return vec![PlayerCommand::SeekTo(start)];
        }
        Vec::new()
    }

    pub fn toggle_play_pause(&mut self, probe: WidgetProbe) -> Vec<PlayerCommand> {
        if !self.ready {
            return Vec::new();
        }
        if self.is_playing {
            return vec![PlayerCommand::Pause];
        }
        let (start, end) = self.trim_times();
        let t = probe.current_time;
        if probe.state == WidgetState::Ended || t >= end || t < start {
            vec![PlayerCommand::SeekTo(start), PlayerCommand::Play]
        } else {
            vec![PlayerCommand::Play]
        }
    }

    pub fn drag_start(&mut self, handle: Handle) {
        self.dragging = Some(handle);
    }

    /// Move one handle, keeping the window at least `MIN_TRIM_GAP` wide.
    pub fn slider_change(&mut self, handle: Handle, position: f64) {
        if !position.is_finite() {
            return;
        }
        let position = position.clamp(TRIM_MIN, TRIM_MAX);
        match handle {
            Handle::Left => {
                self.trim_start = position.min(self.trim_end - MIN_TRIM_GAP).max(TRIM_MIN);
            }
            Handle::Right => {
                self.trim_end = position.max(self.trim_start + MIN_TRIM_GAP).min(TRIM_MAX);
            }
        }
    }

    /// Persist the window and pull playback back inside it if needed.
    pub fn drag_end(&mut self, probe: WidgetProbe) -> Vec<PlayerCommand> {
        self.dragging = None;

        if let Some(video_id) = &self.video_id {
            let record = TrimRecord {
                start: self.trim_start,
                end: self.trim_end,
            };
            if let Err(e) = self.store.save(video_id, record) {
                warn!("trim: failed to save window for {}: {}", video_id, e);
            }
        }

        if self.duration <= 0.0 {
            return Vec::new();
        }
        let (start, end) = self.trim_times();
        let t = probe.current_time;
        if t < start || (t > end && self.is_playing) {
            self.current_time = start;
            vec![PlayerCommand::SeekTo(start)]
        } else {
            Vec::new()
        }
    }

    /// Keyboard nudge: a complete start/change/end drag of `delta` points.
    pub fn nudge(&mut self, handle: Handle, delta: f64, probe: WidgetProbe) -> Vec<PlayerCommand> {
        let current = match handle {
            Handle::Left => self.trim_start,
            Handle::Right => self.trim_end,
        };
        self.drag_start(handle);
        self.slider_change(handle, current + delta);
        self.drag_end(probe)
    }

    /// Unmount: stop the timer and forget the widget.
    pub fn cleanup(&mut self) {
        self.poll.stop();
        self.ready = false;
        self.is_playing = false;
        self.dragging = None;
    }

    pub fn into_store(self) -> TrimStore {
        self.store
    }

    pub fn trim(&self) -> (f64, f64) {
        (self.trim_start, self.trim_end)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[cfg(test)]
    pub fn is_polling(&self) -> bool {
        self.poll.is_running()
    }

    pub fn view(&self, title: String) -> StandardView {
        StandardView {
            title,
            is_playing: self.is_playing,
            loading: self.loading,
            current_time: self.current_time,
            duration: self.duration,
            trim_start: self.trim_start,
            trim_end: self.trim_end,
            dragging: self.dragging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidboard_proto::catalog::{Snippet, Thumbnails, VideoId};

    fn video(id: &str) -> VideoResult {
        VideoResult {
            id: VideoId {
                video_id: id.to_string(),
                channel_id: None,
            },
            snippet: Snippet {
                title: format!("Title {}", id),
                description: None,
                live_broadcast_content: "none".to_string(),
                thumbnails: Thumbnails::default(),
            },
        }
    }

    fn probe(state: WidgetState, current_time: f64, duration: f64) -> WidgetProbe {
        WidgetProbe {
            current_time,
            duration,
            state,
        }
    }

    /// Ready player with `id` cued at 200s and the window set to 10..50%.
    fn cued_player(id: &str) -> StandardPlayer {
        let mut store = TrimStore::in_memory();
        store
            .save(id, TrimRecord { start: 10.0, end: 50.0 })
            .unwrap();
        let mut player = StandardPlayer::new(store);
        player.on_ready(Some(&video(id)));
        player.on_state_change(probe(WidgetState::Cued, 0.0, 200.0));
        player
    }

    #[test]
    fn test_missing_video_id_is_not_cued() {
        let mut player = StandardPlayer::new(TrimStore::in_memory());
        assert!(player.on_ready(Some(&video(""))).is_empty());
        assert!(!player.view("t".into()).loading);
        assert_eq!(player.on_ready(Some(&video("abc"))), vec![PlayerCommand::Cue { video_id: "abc".into() }]);
    }

    #[test]
    fn test_left_handle_keeps_gap() {
        let mut player = StandardPlayer::new(TrimStore::in_memory());
        player.slider_change(Handle::Right, 82.0);
        player.drag_start(Handle::Left);
        player.slider_change(Handle::Left, 80.0);
        assert_eq!(player.trim(), (77.0, 82.0));
    }

    #[test]
    fn test_handles_clamp_to_range() {
        let mut player = StandardPlayer::new(TrimStore::in_memory());
        player.slider_change(Handle::Left, -20.0);
        player.slider_change(Handle::Right, 250.0);
        assert_eq!(player.trim(), (0.0, 100.0));
        player.slider_change(Handle::Right, 1.0);
        assert_eq!(player.trim(), (0.0, 5.0));
        player.slider_change(Handle::Left, 3.0);
        assert_eq!(player.trim(), (0.0, 5.0));
    }

    #[test]
    fn test_window_invariant_holds_for_any_sequence() {
        let mut player = StandardPlayer::new(TrimStore::in_memory());
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..5000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let handle = if seed >> 63 == 0 { Handle::Left } else { Handle::Right };
            let pos = ((seed >> 11) % 14_000) as f64 / 100.0 - 20.0;
            player.slider_change(handle, pos);

            let (start, end) = player.trim();
            assert!(start >= 0.0, "start {}", start);
            assert!(end <= 100.0, "end {}", end);
            assert!(start + MIN_TRIM_GAP <= end + 1e-9, "{}..{}", start, end);
        }
    }

    #[test]
    fn test_corrupt_record_loads_default_window() {
        let mut store = TrimStore::in_memory();
        store.set_item("yt-trim-abc", "{oops").unwrap();
        let mut player = StandardPlayer::new(store);

        let cmds = player.on_ready(Some(&video("abc")));
        assert_eq!(
            cmds,
            vec![PlayerCommand::Cue {
                video_id: "abc".into()
            }]
        );
        assert_eq!(player.trim(), (0.0, 100.0));
    }

    #[test]
    fn test_cued_positions_at_trim_start() {
        let player = cued_player("abc");
        let view = player.view("t".into());
        assert!(!view.loading);
        assert_eq!(view.duration, 200.0);
        assert_eq!(view.current_time, 20.0);
        assert_eq!(player.trim_times(), (20.0, 100.0));
    }

    #[test]
    fn test_selection_before_ready_is_deferred() {
        let mut player = StandardPlayer::new(TrimStore::in_memory());
        assert!(player.on_selected(&video("abc")).is_empty());
        assert_eq!(player.on_ready(Some(&video("abc"))).len(), 1);
        assert!(player.on_selected(&video("abc")).is_empty());
        assert_eq!(
            player.on_selected(&video("def")),
            vec![PlayerCommand::Cue {
                video_id: "def".into()
            }]
        );
    }

    #[test]
    fn test_poll_enforces_window_while_playing() {
        let mut player = cued_player("abc");
        assert!(player
            .on_poll_tick(probe(WidgetState::Cued, 150.0, 200.0))
            .is_empty());

        player.on_state_change(probe(WidgetState::Playing, 20.0, 200.0));
        assert!(player.is_polling());
        assert!(player
            .on_poll_tick(probe(WidgetState::Playing, 60.0, 200.0))
            .is_empty());
        assert_eq!(
            player.on_poll_tick(probe(WidgetState::Playing, 100.0, 200.0)),
            vec![PlayerCommand::SeekTo(20.0)]
        );
        assert_eq!(
            player.on_poll_tick(probe(WidgetState::Playing, 5.0, 200.0)),
            vec![PlayerCommand::SeekTo(20.0)]
        );

        player.drag_start(Handle::Right);
        assert!(player
            .on_poll_tick(probe(WidgetState::Playing, 150.0, 200.0))
            .is_empty());
    }

    #[test]
    fn test_pause_and_end_stop_polling() {
        let mut player = cued_player("abc");
        player.on_state_change(probe(WidgetState::Playing, 20.0, 200.0));
        player.on_state_change(probe(WidgetState::Paused, 42.0, 200.0));
        assert!(!player.is_polling());
        assert!(!player.is_playing());
        assert_eq!(player.view(String::new()).current_time, 42.0);

        player.on_state_change(probe(WidgetState::Ended, 200.0, 200.0));
        assert_eq!(player.view(String::new()).current_time, 200.0);
    }

    #[test]
    fn test_toggle_seeks_into_window_before_play() {
        let mut player = cued_player("abc");
        assert_eq!(
            player.toggle_play_pause(probe(WidgetState::Cued, 0.0, 200.0)),
            vec![PlayerCommand::SeekTo(20.0), PlayerCommand::Play]
        );
        assert_eq!(
            player.toggle_play_pause(probe(WidgetState::Paused, 50.0, 200.0)),
            vec![PlayerCommand::Play]
        );
        assert_eq!(
            player.toggle_play_pause(probe(WidgetState::Ended, 50.0, 200.0)),
            vec![PlayerCommand::SeekTo(20.0), PlayerCommand::Play]
        );

        player.on_state_change(probe(WidgetState::Playing, 50.0, 200.0));
        assert_eq!(
            player.toggle_play_pause(probe(WidgetState::Playing, 50.0, 200.0)),
            vec![PlayerCommand::Pause]
        );
    }

    #[test]
    fn test_drag_end_persists_and_reseeks() {
        let mut player = cued_player("abc");
        player.on_state_change(probe(WidgetState::Playing, 30.0, 200.0));

        player.drag_start(Handle::Left);
        player.slider_change(Handle::Left, 25.0);
        let cmds = player.drag_end(probe(WidgetState::Playing, 30.0, 200.0));
        assert_eq!(cmds, vec![PlayerCommand::SeekTo(50.0)]);

        let store = player.into_store();
        assert_eq!(store.load("abc"), TrimRecord { start: 25.0, end: 50.0 });
    }

    #[test]
    fn test_nudge_is_a_full_drag() {
        let mut player = cued_player("abc");
        let paused = probe(WidgetState::Paused, 60.0, 200.0);
        assert!(player.nudge(Handle::Right, 1.0, paused).is_empty());
        assert_eq!(player.trim(), (10.0, 51.0));
        assert!(player.view(String::new()).dragging.is_none());
        assert_eq!(
            player.into_store().load("abc"),
            TrimRecord { start: 10.0, end: 51.0 }
        );
    }
}
