//! Action enum: all user-initiated intents and internal events.

use vidboard_proto::catalog::VideoResult;

use crate::player::Handle;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    SidePanel,
    PlayerPanel,
}

impl ComponentId {
    pub fn other(self) -> Self {
        match self {
            Self::SidePanel => Self::PlayerPanel,
            Self::PlayerPanel => Self::SidePanel,
        }
    }
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Catalog ──────────────────────────────────────────────────────────────
    LoadMore,
    Retry,

    // ── Selection ────────────────────────────────────────────────────────────
    SelectVideo(VideoResult),
    OpenUrl(String),
    CopyToClipboard(String),

    // ── Player ───────────────────────────────────────────────────────────────
    TogglePlay,
    DragStart(Handle),
    SliderChange(Handle, f64),
    DragEnd,
    Nudge(Handle, f64),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPane(ComponentId),

    // ── Search ───────────────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    /// Debounced term, applied to the list.
    SearchApplied(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
