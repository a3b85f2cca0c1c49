//! Live player: play/pause only, no trim window.

use super::{PlayerCommand, WidgetProbe, WidgetState};
use vidboard_proto::catalog::VideoResult;

#[derive(Debug, Default)]
pub struct LivePlayer {
    video_id: Option<String>,
    ready: bool,
    is_playing: bool,
}

impl LivePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_ready(&mut self, selected: Option<&VideoResult>) -> Vec<PlayerCommand> {
        self.ready = true;
        match selected {
            Some(video) => self.load(video),
            None => Vec::new(),
        }
    }

    pub fn on_selected(&mut self, video: &VideoResult) -> Vec<PlayerCommand> {
        if !self.ready || self.video_id.as_deref() == Some(video.video_id()) {
            return Vec::new();
        }
        self.load(video)
    }

    fn load(&mut self, video: &VideoResult) -> Vec<PlayerCommand> {
        let video_id = video.video_id().to_string();
        if video_id.is_empty() {
            return Vec::new();
        }
        self.video_id = Some(video_id.clone());
        vec![PlayerCommand::Cue { video_id }]
    }

    pub fn on_state_change(&mut self, state: WidgetState) {
        self.is_playing = state == WidgetState::Playing;
    }

    /// Decide from the widget's own state, not the cached flag.
    pub fn toggle_play_pause(&self, probe: WidgetProbe) -> Vec<PlayerCommand> {
        if !self.ready {
            return Vec::new();
        }
        if probe.state == WidgetState::Playing {
            vec![PlayerCommand::Pause]
        } else {
            vec![PlayerCommand::Play]
        }
    }

    pub fn cleanup(&mut self) {
        self.ready = false;
        self.is_playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidboard_proto::catalog::{Snippet, Thumbnails, VideoId};

    fn live(id: &str) -> VideoResult {
        VideoResult {
            id: VideoId {
                video_id: id.to_string(),
                channel_id: None,
            },
            snippet: Snippet {
                title: "On air".to_string(),
                description: None,
                live_broadcast_content: "live".to_string(),
                thumbnails: Thumbnails::default(),
            },
        }
    }

    fn probe(state: WidgetState) -> WidgetProbe {
        WidgetProbe {
            state,
            ..WidgetProbe::default()
        }
    }

    #[test]
    fn test_toggle_follows_widget_state() {
        let mut player = LivePlayer::new();
        assert!(player.toggle_play_pause(probe(WidgetState::Paused)).is_empty());

        player.on_ready(Some(&live("l1")));
        assert_eq!(
            player.toggle_play_pause(probe(WidgetState::Cued)),
            vec![PlayerCommand::Play]
        );
        assert_eq!(
            player.toggle_play_pause(probe(WidgetState::Playing)),
            vec![PlayerCommand::Pause]
        );
    }

    #[test]
    fn test_loads_only_new_ids() {
        let mut player = LivePlayer::new();
        assert!(player.on_selected(&live("l1")).is_empty());
        assert_eq!(player.on_ready(Some(&live("l1"))).len(), 1);
        assert!(player.on_selected(&live("l1")).is_empty());
        assert_eq!(player.on_selected(&live("l2")).len(), 1);
        assert!(player.on_selected(&live("")).is_empty());

        player.on_state_change(WidgetState::Playing);
        assert!(player.is_playing());
        player.cleanup();
        assert!(!player.is_playing());
    }
}
