//! App: component-based event loop for the dashboard.
//!
//! Architecture:
//! - `App` owns both panes, the player container and `AppState` (shared
//!   read-only data for components, including the dashboard controller).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks: terminal input and page fetches.
//! - Player widgets report on a channel of their own; the loop feeds those
//!   events to the container and carries out the effects it returns.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use vidboard_proto::catalog::VideoResult;
use vidboard_proto::config::Config;
use vidboard_proto::pagination::Page;
use vidboard_proto::trim::TrimStore;

use crate::{
    action::{Action, ComponentId},
    api::DataClient,
    app_state::AppState,
    component::Component,
    components::{player_panel::PlayerPanel, side_panel::SidePanel},
    dashboard::{Dashboard, FetchRequest},
    mpv::MpvOptions,
    player::{
        container::{ContainerEffect, PlayerContainer},
        factory::{PlayerFactory, WidgetHandle},
        PlayerView, WidgetEvent, WidgetEventKind,
    },
    theme::C_BG,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    PageLoaded(u32, Page<VideoResult>),
    PageFailed(u32, String),
}

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Last-drawn layout rects, for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    side_panel: Rect,
    player_panel: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    side_panel: SidePanel,
    player_panel: PlayerPanel,
    focus: ComponentId,
    toast: ToastManager,

    // ── Player ────────────────────────────────────────────────────────────────
    container: PlayerContainer,
    factory: &'static PlayerFactory,
    widgets: HashMap<u64, WidgetHandle>,
    player_options: MpvOptions,
    poll_interval: Duration,
    widget_tx: mpsc::Sender<WidgetEvent>,
    widget_rx: Option<mpsc::Receiver<WidgetEvent>>,

    // ── IO ────────────────────────────────────────────────────────────────────
    client: DataClient,
    tx: Option<mpsc::Sender<AppMessage>>,
    log_rx: Option<mpsc::UnboundedReceiver<String>>,

    should_quit: bool,
    pane_areas: PaneAreas,
}

impl App {
    pub fn new(
        config: &Config,
        server_url: String,
        store: TrimStore,
        log_path: PathBuf,
        log_rx: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self::with_factory(
            config,
            server_url,
            store,
            log_path,
            Some(log_rx),
            PlayerFactory::global(),
        )
    }

    fn with_factory(
        config: &Config,
        server_url: String,
        store: TrimStore,
        log_path: PathBuf,
        log_rx: Option<mpsc::UnboundedReceiver<String>>,
        factory: &'static PlayerFactory,
    ) -> Self {
        let (widget_tx, widget_rx) = mpsc::channel(256);
        Self {
            state: AppState::new(Dashboard::new(config.dashboard.page_size), log_path),
            side_panel: SidePanel::new(Duration::from_millis(config.dashboard.search_debounce_ms)),
            player_panel: PlayerPanel::new(),
            focus: ComponentId::SidePanel,
            toast: ToastManager::new(),
            container: PlayerContainer::new(store),
            factory,
            widgets: HashMap::new(),
            player_options: MpvOptions {
                volume: config.player.volume,
                show_video: config.player.show_video,
            },
            poll_interval: Duration::from_millis(config.dashboard.poll_interval_ms.max(10)),
            widget_tx,
            widget_rx: Some(widget_rx),
            client: DataClient::new(server_url),
            tx: None,
            log_rx,
            should_quit: false,
            pane_areas: PaneAreas::default(),
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut widget_rx) = self.widget_rx.take() else {
            anyhow::bail!("dashboard event loop already ran");
        };
        // a closed stand-in keeps the select arm below uniform
        let mut log_rx = self
            .log_rx
            .take()
            .unwrap_or_else(|| mpsc::unbounded_channel().1);

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.tx = Some(tx.clone());
        info!("dashboard started against {}", self.client.base_url());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        if !self.factory.is_ready() {
            self.toast.warning("mpv not found; playback disabled");
        }
        let first = self.state.dashboard.start();
        self.spawn_fetch(first);

        // ── Periodic timers ───────────────────────────────────────────────────
        // Component maintenance: debounce deadlines, overflow checks, toasts.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Trim-window enforcement for the standard player.
        let mut poll_tick = tokio::time::interval(self.poll_interval);
        poll_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        terminal.draw(|f| self.draw(f))?;
        while !self.should_quit {
            let needs_redraw = tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    self.handle_message(msg);
                    let mut drained = 0usize;
                    while drained < MAX_DRAIN {
                        let Ok(next) = rx.try_recv() else {
                            break;
                        };
                        drained += 1;
                        self.handle_message(next);
                    }
                    true
                }

                Some(event) = widget_rx.recv() => {
                    self.on_widget_event(event);
                    true
                }

                Some(line) = log_rx.recv() => {
                    self.state.push_log(line);
                    true
                }

                _ = ui_tick.tick() => {
                    self.on_ui_tick(Instant::now());
                    true
                }

                _ = poll_tick.tick() => self.on_poll_tick(),
            };
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        let effects = self.container.teardown();
        self.apply_effects(effects);
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for action in self.handle_mouse(mouse) {
                    self.dispatch(action);
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::PageLoaded(page, data) => {
                self.state.connected = true;
                if let Some(first) = self.state.dashboard.on_page_loaded(page, data) {
                    info!("auto-selected {}", first.video_id());
                    self.sync_player();
                }
            }
            AppMessage::PageFailed(page, cause) => {
                self.state.connected = false;
                self.state.dashboard.on_page_failed(page, &cause);
            }
        }
    }

    fn on_widget_event(&mut self, event: WidgetEvent) {
        if let WidgetEventKind::Failed(reason) = &event.kind {
            if self.container.mounted_instance() == Some(event.instance) {
                self.toast.error(format!("player: {}", reason));
            }
        }
        let effects = self.container.on_widget_event(event);
        self.apply_effects(effects);
    }

    fn on_ui_tick(&mut self, now: Instant) {
        self.toast.tick();
        let tick_actions: Vec<Action> = {
            let s = &self.state;
            let mut all = Vec::new();
            all.extend(self.side_panel.tick(now, s));
            all.extend(self.player_panel.tick(now, s));
            all
        };
        for action in tick_actions {
            self.dispatch(action);
        }
    }

    /// Returns whether the pane needs a redraw.
    fn on_poll_tick(&mut self) -> bool {
        let effects = self.container.on_poll_tick();
        self.apply_effects(effects);
        matches!(&self.state.player, PlayerView::Standard(v) if v.is_playing)
    }

    // ── Fetching ──────────────────────────────────────────────────────────────

    fn spawn_fetch(&self, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        let Some(tx) = self.tx.clone() else {
            debug!("fetch for page {} before the loop started", request.page);
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let msg = match client.fetch_page(request).await {
                Ok(page) => AppMessage::PageLoaded(request.page, page),
                Err(e) => AppMessage::PageFailed(request.page, e.to_string()),
            };
            let _ = tx.send(msg).await;
        });
    }

    // ── Player ────────────────────────────────────────────────────────────────

    fn sync_player(&mut self) {
        let effects = self.container.sync(self.state.dashboard.selected());
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<ContainerEffect>) {
        for effect in effects {
            match effect {
                ContainerEffect::Mount { instance, kind } => {
                    debug!("creating widget #{} for the {} player", instance, kind.key());
                    let handle =
                        self.factory
                            .create(instance, self.player_options, self.widget_tx.clone());
                    self.widgets.insert(instance, handle);
                }
                ContainerEffect::Unmount { instance } => {
                    if let Some(handle) = self.widgets.remove(&instance) {
                        handle.destroy();
                    }
                }
                ContainerEffect::Command { instance, command } => {
                    match self.widgets.get(&instance) {
                        Some(handle) => handle.send(command),
                        None => debug!("no widget #{} for {:?}", instance, command),
                    }
                }
            }
        }
        self.state.player = self.container.view();
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                if self.state.input_mode == InputMode::Normal {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                if self.state.input_mode == InputMode::Search {
                    return vec![Action::CloseSearch, Action::FocusNext];
                }
                return vec![Action::FocusNext];
            }
            _ => {}
        }

        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::SidePanel)],
                KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::PlayerPanel)],
                KeyCode::Char('R') if self.state.dashboard.error().is_some() => {
                    return vec![Action::Retry];
                }
                _ => {}
            }
        }

        let s = &self.state;
        match self.focus {
            ComponentId::SidePanel => self.side_panel.handle_key(key, s),
            ComponentId::PlayerPanel => self.player_panel.handle_key(key, s),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let areas = self.pane_areas;
        let s = &self.state;

        // A held trim handle keeps receiving the drag wherever the pointer goes.
        if matches!(event.kind, MouseEventKind::Drag(_) | MouseEventKind::Up(_)) {
            if self.player_panel.is_dragging() {
                return self.player_panel.handle_mouse(event, areas.player_panel, s);
            }
            return vec![];
        }

        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let (id, mut actions) = if hit(areas.side_panel, event.column, event.row) {
            (
                ComponentId::SidePanel,
                self.side_panel.handle_mouse(event, areas.side_panel, s),
            )
        } else if hit(areas.player_panel, event.column, event.row) {
            (
                ComponentId::PlayerPanel,
                self.player_panel.handle_mouse(event, areas.player_panel, s),
            )
        } else {
            return vec![];
        };

        // Focus follows the click
        if self.focus != id && matches!(event.kind, MouseEventKind::Down(_)) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast to both panes first
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.side_panel.on_action(&action, s));
            out.extend(self.player_panel.on_action(&action, s));
            out
        };

        self.apply_action(action);

        // Secondary actions, one level deep
        for a in secondary {
            self.apply_action(a);
        }
        self.state.player = self.container.view();
    }

    fn apply_action(&mut self, action: Action) {
        match &action {
            Action::SliderChange(..) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Catalog ───────────────────────────────────────────────────────
            Action::LoadMore => {
                let request = self.state.dashboard.load_more();
                self.spawn_fetch(request);
            }
            Action::Retry => {
                let request = self.state.dashboard.retry();
                self.spawn_fetch(request);
            }

            // ── Selection ─────────────────────────────────────────────────────
            Action::SelectVideo(video) => {
                self.state.dashboard.select(video);
                self.sync_player();
                self.set_focus(ComponentId::PlayerPanel);
            }
            Action::OpenUrl(url) => match vidboard_proto::platform::open_url(&url) {
                Ok(()) => {
                    info!("opened {}", url);
                    self.toast.info("opened in browser");
                }
                Err(e) => {
                    warn!("failed to open {}: {}", url, e);
                    self.toast.error(format!("could not open browser: {}", e));
                }
            },
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            // ── Player ────────────────────────────────────────────────────────
            Action::TogglePlay => {
                let effects = self.container.toggle_play_pause();
                self.apply_effects(effects);
            }
            Action::DragStart(handle) => self.container.drag_start(handle),
            Action::SliderChange(handle, position) => {
                self.container.slider_change(handle, position)
            }
            Action::DragEnd => {
                let effects = self.container.drag_end();
                self.apply_effects(effects);
            }
            Action::Nudge(handle, delta) => {
                let effects = self.container.nudge(handle, delta);
                self.apply_effects(effects);
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => self.set_focus(self.focus.other()),
            Action::FocusPane(id) => self.set_focus(id),

            // ── Search ────────────────────────────────────────────────────────
            Action::OpenSearch => {
                self.state.input_mode = InputMode::Search;
                self.focus = ComponentId::SidePanel;
            }
            Action::CloseSearch => {
                self.state.input_mode = InputMode::Normal;
            }
            Action::SearchApplied(term) => {
                debug!("search applied: {:?}", term);
            }

            // ── System ────────────────────────────────────────────────────────
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn set_focus(&mut self, id: ComponentId) {
        if id != ComponentId::SidePanel && self.state.input_mode == InputMode::Search {
            self.side_panel.search.deactivate();
            self.state.input_mode = InputMode::Normal;
        }
        self.focus = id;
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let banner_h = if self.state.dashboard.error().is_some() {
            1
        } else {
            0
        };
        let [banner_area, body_area, separator_area, log_area, keys_area] = Layout::vertical([
            Constraint::Length(banner_h),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(message) = self.state.dashboard.error() {
            status_bar::draw_error_banner(frame, banner_area, message);
        }

        let [side_area, player_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body_area);
        self.pane_areas = PaneAreas {
            side_panel: side_area,
            player_panel: player_area,
        };
        self.side_panel.draw(
            frame,
            side_area,
            self.focus == ComponentId::SidePanel,
            &self.state,
        );
        self.player_panel.draw(
            frame,
            player_area,
            self.focus == ComponentId::PlayerPanel,
            &self.state,
        );

        status_bar::draw_separator(frame, separator_area);
        let log_line = self.state.log_bar_text();
        status_bar::draw_log_bar(frame, log_area, &log_line, self.state.connected);
        status_bar::draw_keys_bar(frame, keys_area, self.state.input_mode, self.focus);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}
