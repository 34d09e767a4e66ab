//! Typed input and output events of a session.

use super::panels::PanelId;
use crate::error::RejectReason;
use crate::keybindings::{FocusContext, KeyChord, ShortcutAction};
use crate::output_buffer::OutputLine;
use crate::split::SplitId;
use crate::tab::{TabId, TabKind};
use tokio::sync::broadcast;

/// Something the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key chord, resolved against the current focus
    Key(KeyChord),
    /// A global action chosen directly (menu, meta-command), bypassing chords
    Shortcut(ShortcutAction),
    Focus(FocusContext),
    /// The command line text changed
    SetCommandLine(String),
    /// Submit this text as a command in the active tab
    Submit(String),
    /// The history search box changed; matches are recomputed
    SetSearchQuery(String),
    /// Text currently selected in the active tab, used by copy
    SetSelection(Option<String>),
    /// Paths dropped onto the active tab
    FileDrop(Vec<String>),
    CreateTab(TabKind),
    ActivateTab(TabId),
    CloseTab(TabId),
    MoveTab { tab: TabId, split: SplitId },
    ResizeSplit { split: SplitId, size: f32 },
    RenameTab { tab: TabId, name: String },
    SetTabModified { tab: TabId, modified: bool },
    /// Per-tab theme override; `None` falls back to the session theme
    SetTabTheme { tab: TabId, theme: Option<String> },
    /// Pick a layout id offered by the theme provider
    SelectLayout(String),
    /// Print the telemetry summary to the active tab
    ShowStats,
    Shutdown,
}

/// Something that changed, for whoever renders the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TabCreated(TabId),
    TabClosed(TabId),
    TabActivated(TabId),
    OutputAppended { tab: TabId, lines: Vec<OutputLine> },
    OutputCleared(TabId),
    /// Name, modified flag, or theme override of a tab changed
    TabUpdated(TabId),
    SplitCreated(SplitId),
    SplitRemoved(SplitId),
    PanelToggled { panel: PanelId, visible: bool },
    ThemeChanged(String),
    LayoutChanged(String),
    FontSizeChanged(f32),
    CommandCompleted {
        tab: TabId,
        command: String,
        success: bool,
        elapsed_ms: f64,
    },
    ActionRejected(RejectReason),
    UiHidden(bool),
}

/// Broadcast channel carrying [`SessionEvent`]s to any number of listeners.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("Session event dropped: no subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
