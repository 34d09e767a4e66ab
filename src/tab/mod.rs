//! Tab management for multi-session support
//!
//! This module provides the core tab infrastructure including:
//! - `Tab`: One independent session with its own output and history
//! - `TabKind`: Closed set of session kinds with their names and icons
//! - `TabManager`: Owns all tabs and the split layout they live in
//! - `TabId`: Unique identifier for each tab

mod manager;

pub use manager::TabManager;

use crate::command_history::{HistoryDirection, HistoryEntry, TabHistory};
use crate::output_buffer::{OutputBuffer, OutputLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a tab
pub type TabId = u64;

/// What a tab is for. Drives its default name and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Console,
    File,
    Git,
    Package,
    Build,
    Test,
    Deploy,
    Debug,
    Network,
}

impl TabKind {
    pub const ALL: [TabKind; 9] = [
        TabKind::Console,
        TabKind::File,
        TabKind::Git,
        TabKind::Package,
        TabKind::Build,
        TabKind::Test,
        TabKind::Deploy,
        TabKind::Debug,
        TabKind::Network,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            TabKind::Console => "Console",
            TabKind::File => "Files",
            TabKind::Git => "Git",
            TabKind::Package => "Packages",
            TabKind::Build => "Build",
            TabKind::Test => "Tests",
            TabKind::Deploy => "Deploy",
            TabKind::Debug => "Debug",
            TabKind::Network => "Network",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TabKind::Console => "🖥",
            TabKind::File => "📁",
            TabKind::Git => "🌿",
            TabKind::Package => "📦",
            TabKind::Build => "🔨",
            TabKind::Test => "🧪",
            TabKind::Deploy => "🚀",
            TabKind::Debug => "🐛",
            TabKind::Network => "🌐",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TabKind::Console => "console",
            TabKind::File => "file",
            TabKind::Git => "git",
            TabKind::Package => "package",
            TabKind::Build => "build",
            TabKind::Test => "test",
            TabKind::Deploy => "deploy",
            TabKind::Debug => "debug",
            TabKind::Network => "network",
        }
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TabKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("unknown tab kind '{s}'"))
    }
}

/// A single session tab
#[derive(Debug, Clone)]
pub struct Tab {
    /// Unique identifier
    id: TabId,
    /// Display name shown in the tab bar
    name: String,
    kind: TabKind,
    output: OutputBuffer,
    history: TabHistory,
    pinned: bool,
    /// Set when the tab has unsaved work the user should be warned about
    modified: bool,
    last_activity: DateTime<Utc>,
    working_directory: String,
    /// Per-tab theme override; `None` follows the session theme
    theme: Option<String>,
}

impl Tab {
    pub(crate) fn new(
        id: TabId,
        kind: TabKind,
        name: String,
        working_directory: String,
        max_output_lines: usize,
        history_capacity: usize,
    ) -> Self {
        let mut output = OutputBuffer::new(max_output_lines);
        output.push(OutputLine::info(format!(
            "Welcome to {name} {} ({})",
            kind.icon(),
            working_directory
        )));

        Self {
            id,
            name,
            kind,
            output,
            history: TabHistory::new(history_capacity),
            pinned: false,
            modified: false,
            last_activity: Utc::now(),
            working_directory,
            theme: None,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TabKind {
        self.kind
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn history(&self) -> &TabHistory {
        &self.history
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    fn append(&mut self, line: OutputLine) -> usize {
        self.touch();
        self.output.push(line)
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.touch();
        self.history.record(entry);
    }

    fn navigate(&mut self, direction: HistoryDirection) -> String {
        self.history.navigate(direction)
    }
}
