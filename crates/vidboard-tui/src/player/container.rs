//! Picks the player flavour for the selected video and owns its lifecycle.
//!
//! Each mount gets a fresh instance number.  Widget events carry the number
//! of the widget that produced them, so events from an unmounted widget are
//! recognised and dropped.

use super::live::LivePlayer;
use super::standard::StandardPlayer;
use super::{
    Handle, PlayerCommand, PlayerView, StandardView, WidgetEvent, WidgetEventKind, WidgetProbe,
};
use tracing::{debug, info, warn};
use vidboard_proto::catalog::VideoResult;
use vidboard_proto::trim::{TrimStore, TRIM_MAX, TRIM_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Live,
    Standard,
}

impl PlayerKind {
    pub fn for_video(video: &VideoResult) -> Self {
        if video.is_live() {
            Self::Live
        } else {
            Self::Standard
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Standard => "standard",
        }
    }
}

/// Side effects for the event loop to carry out against the widget host.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerEffect {
    Mount { instance: u64, kind: PlayerKind },
    Unmount { instance: u64 },
    Command { instance: u64, command: PlayerCommand },
}

enum Player {
    Live(LivePlayer),
    Standard(StandardPlayer),
}

struct Mounted {
    instance: u64,
    kind: PlayerKind,
    player: Player,
    probe: WidgetProbe,
}

pub struct PlayerContainer {
    next_instance: u64,
    mounted: Option<Mounted>,
    /// Trim storage while no standard player is mounted.
    parked: Option<TrimStore>,
    selected: Option<VideoResult>,
}

impl PlayerContainer {
    pub fn new(store: TrimStore) -> Self {
        Self {
            next_instance: 1,
            mounted: None,
            parked: Some(store),
            selected: None,
        }
    }

    /// Follow the selection: mount, remount on kind change, or hand the new
    /// video to the mounted player.
    pub fn sync(&mut self, selected: Option<&VideoResult>) -> Vec<ContainerEffect> {
        self.selected = selected.cloned();
        let Some(video) = selected else {
            return self.teardown();
        };
        let kind = PlayerKind::for_video(video);

        if let Some(m) = self.mounted.as_mut() {
            if m.kind == kind {
                let cmds = match &mut m.player {
                    Player::Live(p) => p.on_selected(video),
                    Player::Standard(p) => p.on_selected(video),
                };
                return commands(m.instance, cmds);
            }
        }

        let mut effects = self.teardown();
        let instance = self.next_instance;
        self.next_instance += 1;
        let player = match kind {
            PlayerKind::Live => Player::Live(LivePlayer::new()),
            PlayerKind::Standard => {
                let store = self.parked.take().unwrap_or_else(TrimStore::in_memory);
                Player::Standard(StandardPlayer::new(store))
            }
        };
        info!("player: mounting {} player #{}", kind.key(), instance);
        self.mounted = Some(Mounted {
            instance,
            kind,
            player,
            probe: WidgetProbe::default(),
        });
        effects.push(ContainerEffect::Mount { instance, kind });
        effects
    }

    pub fn on_widget_event(&mut self, event: WidgetEvent) -> Vec<ContainerEffect> {
        let Some(m) = self.mounted.as_mut() else {
            debug!("player: event for #{} with nothing mounted", event.instance);
            return Vec::new();
        };
        if m.instance != event.instance {
            debug!("player: dropping event from stale widget #{}", event.instance);
            return Vec::new();
        }

        match event.kind {
            WidgetEventKind::Ready => {
                debug!("player: widget #{} ready", m.instance);
                let cmds = match &mut m.player {
                    Player::Live(p) => p.on_ready(self.selected.as_ref()),
                    Player::Standard(p) => p.on_ready(self.selected.as_ref()),
                };
                commands(m.instance, cmds)
            }
            WidgetEventKind::Snapshot(probe) => {
                m.probe = probe;
                Vec::new()
            }
            WidgetEventKind::StateChange(probe) => {
                debug!(
                    "player: widget #{} -> {} ({})",
                    m.instance,
                    probe.state.label(),
                    probe.state.code()
                );
                m.probe = probe;
                match &mut m.player {
                    Player::Live(p) => p.on_state_change(probe.state),
                    Player::Standard(p) => p.on_state_change(probe),
                }
                Vec::new()
            }
            WidgetEventKind::Failed(reason) => {
                warn!("player: widget #{} failed: {}", m.instance, reason);
                self.teardown()
            }
        }
    }

    pub fn on_poll_tick(&mut self) -> Vec<ContainerEffect> {
        match self.mounted.as_mut() {
            Some(Mounted {
                instance,
                player: Player::Standard(p),
                probe,
                ..
            }) => commands(*instance, p.on_poll_tick(*probe)),
            _ => Vec::new(),
        }
    }

    pub fn toggle_play_pause(&mut self) -> Vec<ContainerEffect> {
        let Some(m) = self.mounted.as_mut() else {
            return Vec::new();
        };
        let cmds = match &mut m.player {
            Player::Live(p) => p.toggle_play_pause(m.probe),
            Player::Standard(p) => p.toggle_play_pause(m.probe),
        };
        commands(m.instance, cmds)
    }

    pub fn drag_start(&mut self, handle: Handle) {
        if let Some(p) = self.standard_mut() {
            p.drag_start(handle);
        }
    }

    pub fn slider_change(&mut self, handle: Handle, position: f64) {
        if let Some(p) = self.standard_mut() {
            p.slider_change(handle, position);
        }
    }

    pub fn drag_end(&mut self) -> Vec<ContainerEffect> {
        match self.mounted.as_mut() {
            Some(Mounted {
                instance,
                player: Player::Standard(p),
                probe,
                ..
            }) => commands(*instance, p.drag_end(*probe)),
            _ => Vec::new(),
        }
    }

    pub fn nudge(&mut self, handle: Handle, delta: f64) -> Vec<ContainerEffect> {
        match self.mounted.as_mut() {
            Some(Mounted {
                instance,
                player: Player::Standard(p),
                probe,
                ..
            }) => commands(*instance, p.nudge(handle, delta, *probe)),
            _ => Vec::new(),
        }
    }

    /// Unmount whatever is mounted.
    pub fn teardown(&mut self) -> Vec<ContainerEffect> {
        let Some(m) = self.mounted.take() else {
            return Vec::new();
        };
        info!("player: unmounting {} player #{}", m.kind.key(), m.instance);
        match m.player {
            Player::Live(mut p) => p.cleanup(),
            Player::Standard(mut p) => {
                p.cleanup();
                self.parked = Some(p.into_store());
            }
        }
        vec![ContainerEffect::Unmount {
            instance: m.instance,
        }]
    }

    pub fn mounted_instance(&self) -> Option<u64> {
        self.mounted.as_ref().map(|m| m.instance)
    }

    pub fn view(&self) -> PlayerView {
        let Some(video) = &self.selected else {
            return PlayerView::Empty;
        };
        let title = video.display_title();
        match self.mounted.as_ref().map(|m| &m.player) {
            Some(Player::Live(p)) => PlayerView::Live {
                title,
                is_playing: p.is_playing(),
            },
            Some(Player::Standard(p)) => PlayerView::Standard(p.view(title)),
            None if video.is_live() => PlayerView::Live {
                title,
                is_playing: false,
            },
            None => PlayerView::Standard(StandardView {
                title,
                is_playing: false,
                loading: true,
                current_time: 0.0,
                duration: 0.0,
                trim_start: TRIM_MIN,
                trim_end: TRIM_MAX,
                dragging: None,
            }),
        }
    }

    fn standard_mut(&mut self) -> Option<&mut StandardPlayer> {
        match self.mounted.as_mut() {
            Some(Mounted {
                player: Player::Standard(p),
                ..
            }) => Some(p),
            _ => None,
        }
    }
}

fn commands(instance: u64, cmds: Vec<PlayerCommand>) -> Vec<ContainerEffect> {
    cmds.into_iter()
        .map(|command| ContainerEffect::Command { instance, command })
        .collect()
}
