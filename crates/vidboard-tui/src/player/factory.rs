//! Process-wide factory for player widgets.
//!
//! The platform dependency (the mpv binary) is looked up once per process.
//! Each widget is hosted by its own task, which owns the mpv process and
//! reports back through [`WidgetEvent`]s tagged with the widget's instance.

use super::{PlayerCommand, WidgetEvent, WidgetEventKind};
use crate::mpv::tracker::{MpvStateTracker, TrackerUpdate};
use crate::mpv::{MpvDriver, MpvEvent, MpvHandle, MpvOptions};
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use vidboard_proto::catalog::watch_url_for;

static FACTORY: OnceLock<PlayerFactory> = OnceLock::new();

pub struct PlayerFactory {
    mpv_binary: Option<PathBuf>,
}

enum HostMessage {
    Command(PlayerCommand),
    Destroy,
}

/// Owner's end of a hosted widget.  Dropping it also tears the widget down.
pub struct WidgetHandle {
    instance: u64,
    tx: mpsc::Sender<HostMessage>,
}

impl WidgetHandle {
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn send(&self, command: PlayerCommand) {
        if let Err(e) = self.tx.try_send(HostMessage::Command(command)) {
            warn!("player #{}: command dropped: {}", self.instance, e);
        }
    }

    pub fn destroy(self) {
        let _ = self.tx.try_send(HostMessage::Destroy);
    }
}

impl PlayerFactory {
    /// The shared factory, initialising it on first use.
    pub fn global() -> &'static PlayerFactory {
        FACTORY.get_or_init(|| {
            let mpv_binary = vidboard_proto::platform::find_mpv_binary();
            match &mpv_binary {
                Some(path) => info!("player: using mpv at {:?}", path),
                None => warn!("player: mpv binary not found; playback disabled"),
            }
            PlayerFactory { mpv_binary }
        })
    }

    /// A factory that never finds mpv; every widget fails to construct.
    #[cfg(test)]
    pub fn disabled() -> &'static PlayerFactory {
        static DISABLED: PlayerFactory = PlayerFactory { mpv_binary: None };
        &DISABLED
    }

    pub fn is_ready(&self) -> bool {
        self.mpv_binary.is_some()
    }

    /// Construct a widget.  Construction runs in the background; `Ready` or
    /// `Failed` is posted on `events_tx` once it settles.
    pub fn create(
        &self,
        instance: u64,
        options: MpvOptions,
        events_tx: mpsc::Sender<WidgetEvent>,
    ) -> WidgetHandle {
        let (tx, rx) = mpsc::channel(32);
        match self.mpv_binary.clone() {
            Some(binary) => {
                tokio::spawn(host(instance, binary, options, rx, events_tx));
            }
            None => {
                tokio::spawn(async move {
                    let _ = events_tx
                        .send(WidgetEvent {
                            instance,
                            kind: WidgetEventKind::Failed("mpv binary not found".to_string()),
                        })
                        .await;
                });
            }
        }
        WidgetHandle { instance, tx }
    }
}

async fn host(
    instance: u64,
    binary: PathBuf,
    options: MpvOptions,
    mut commands: mpsc::Receiver<HostMessage>,
    events_tx: mpsc::Sender<WidgetEvent>,
) {
    let post = |kind: WidgetEventKind| WidgetEvent { instance, kind };

    let mut driver = MpvDriver::new(instance, options);
    let (mpv_tx, mut mpv_rx) = mpsc::channel::<MpvEvent>(256);
    let handle = match driver.spawn_and_connect(&binary, mpv_tx).await {
        Ok(h) => h,
        Err(e) => {
            let _ = events_tx
                .send(post(WidgetEventKind::Failed(e.to_string())))
                .await;
            driver.kill().await;
            return;
        }
    };
    handle.observe_all_properties().await;
    if events_tx.send(post(WidgetEventKind::Ready)).await.is_err() {
        driver.kill().await;
        return;
    }

    let mut tracker = MpvStateTracker::default();
    loop {
        tokio::select! {
            msg = commands.recv() => match msg {
                Some(HostMessage::Command(command)) => {
                    if let Err(e) = run_command(&handle, &command).await {
                        warn!("player #{}: {:?} failed: {}", instance, command, e);
                    }
                }
                Some(HostMessage::Destroy) | None => break,
            },
            event = mpv_rx.recv() => match event {
                Some(event) => match tracker.apply(&event) {
                    TrackerUpdate::State(state) => {
                        debug!("player #{}: state {}", instance, state.label());
                        let _ = events_tx
                            .send(post(WidgetEventKind::StateChange(tracker.probe())))
                            .await;
                    }
                    // Position updates are frequent; drop them under backpressure.
                    TrackerUpdate::Position => {
                        let _ = events_tx.try_send(post(WidgetEventKind::Snapshot(tracker.probe())));
                    }
                    TrackerUpdate::Nothing => {}
                },
                None => {
                    let _ = events_tx
                        .send(post(WidgetEventKind::Failed("mpv IPC connection closed".to_string())))
                        .await;
                    break;
                }
            },
        }
    }

    debug!("player #{}: destroying widget", instance);
    let _ = handle.quit().await;
    driver.kill().await;
}

async fn run_command(handle: &MpvHandle, command: &PlayerCommand) -> anyhow::Result<()> {
    match command {
        PlayerCommand::Cue { video_id } => handle.cue(&watch_url_for(video_id)).await,
        PlayerCommand::Play => handle.set_pause(false).await,
        PlayerCommand::Pause => handle.set_pause(true).await,
        PlayerCommand::SeekTo(secs) => handle.seek_to(*secs).await,
    }
}
