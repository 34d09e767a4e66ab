//! Tab manager: owns every tab, the active-tab pointer, and the split layout

use super::{Tab, TabId, TabKind};
use crate::command_history::{CommandHistory, HistoryDirection, HistoryEntry};
use crate::config::Config;
use crate::error::{ActionOutcome, InvariantViolation, RejectReason};
use crate::output_buffer::OutputLine;
use crate::split::{Orientation, SplitId, SplitLayout};

/// Manages the tab set of a session
#[derive(Debug)]
pub struct TabManager {
    /// All tabs, in order
    tabs: Vec<Tab>,
    /// Currently active tab ID
    active_tab_id: Option<TabId>,
    /// Counter for generating unique tab IDs
    next_tab_id: TabId,
    layout: SplitLayout,
    /// Session-wide history fed by every tab
    history: CommandHistory,
    default_directory: String,
    max_output_lines: usize,
    history_capacity: usize,
}

impl TabManager {
    /// Create a new empty tab manager
    pub fn new(config: &Config) -> Self {
        Self {
            tabs: Vec::new(),
            active_tab_id: None,
            next_tab_id: 1,
            layout: SplitLayout::from_config(config),
            history: CommandHistory::new(config.global_history_capacity),
            default_directory: config.default_directory.clone(),
            max_output_lines: config.max_output_lines,
            history_capacity: config.history_capacity,
        }
    }

    fn allocate_tab(&mut self, kind: TabKind, directory: Option<&str>) -> TabId {
        let id = self.next_tab_id;
        self.next_tab_id += 1;

        let same_kind = self.tabs.iter().filter(|t| t.kind == kind).count();
        let name = if same_kind == 0 {
            kind.display_name().to_string()
        } else {
            format!("{} {}", kind.display_name(), same_kind + 1)
        };
        let directory = directory
            .map(str::to_string)
            .unwrap_or_else(|| self.default_directory.clone());

        self.tabs.push(Tab::new(
            id,
            kind,
            name,
            directory,
            self.max_output_lines,
            self.history_capacity,
        ));
        id
    }

    /// Create a new tab in the target split and return its ID.
    ///
    /// The tab is not activated unless no tab is active yet.
    pub fn create_tab(&mut self, kind: TabKind, directory: Option<&str>) -> TabId {
        let id = self.allocate_tab(kind, directory);
        let split = self.layout.insert_tab(id);

        if self.active_tab_id.is_none() {
            self.active_tab_id = Some(id);
        }

        log::info!(
            "Created {} tab {} in split {} (total: {})",
            kind,
            id,
            split,
            self.tabs.len()
        );
        self.verify();
        id
    }

    /// Close a tab by ID.
    ///
    /// Pinned tabs and the last remaining tab cannot be closed.
    pub fn close_tab(&mut self, id: TabId) -> ActionOutcome {
        let Some(idx) = self.tabs.iter().position(|t| t.id == id) else {
            return self.reject(RejectReason::UnknownTab(id));
        };
        if self.tabs[idx].pinned {
            return self.reject(RejectReason::PinnedTab(id));
        }
        if self.tabs.len() == 1 {
            return self.reject(RejectReason::LastTab(id));
        }

        log::info!("Closing tab {} (index {})", id, idx);
        self.tabs.remove(idx);
        self.layout.remove_tab(id);

        if self.active_tab_id == Some(id) {
            self.active_tab_id = self.tabs.first().map(|t| t.id);
        }

        self.verify();
        ActionOutcome::Applied(())
    }

    /// Keep one unpinned console tab (creating it if needed) and drop the rest.
    ///
    /// The layout collapses to a single horizontal split holding the kept
    /// tab, which becomes active.
    pub fn close_all_tabs(&mut self) -> TabId {
        let kept = self
            .tabs
            .iter()
            .find(|t| t.kind == TabKind::Console && !t.pinned)
            .map(|t| t.id);
        let kept = match kept {
            Some(id) => id,
            None => self.allocate_tab(TabKind::Console, None),
        };

        let closed = self.tabs.len() - 1;
        self.tabs.retain(|t| t.id == kept);
        self.layout.reset_with(kept);
        self.active_tab_id = Some(kept);

        log::info!("Closed {} tab(s), keeping tab {}", closed, kept);
        self.verify();
        kept
    }

    /// Make `id` the only active tab.
    pub fn activate(&mut self, id: TabId) -> ActionOutcome {
        if !self.contains(id) {
            return self.reject(RejectReason::UnknownTab(id));
        }
        self.active_tab_id = Some(id);
        log::debug!("Switched to tab {}", id);
        ActionOutcome::Applied(())
    }

    /// Switch to the next tab (wraps around)
    pub fn next_tab(&mut self) -> Option<TabId> {
        self.cycle(1)
    }

    /// Switch to the previous tab (wraps around)
    pub fn previous_tab(&mut self) -> Option<TabId> {
        self.cycle(-1)
    }

    fn cycle(&mut self, step: isize) -> Option<TabId> {
        let count = self.tabs.len();
        if count <= 1 {
            return self.active_tab_id;
        }
        let current = self.active_index().unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(count as isize) as usize;
        let id = self.tabs[next].id;
        self.active_tab_id = Some(id);
        log::debug!("Switched to tab {}", id);
        Some(id)
    }

    /// Push an output line into a tab's buffer.
    pub fn append_output(&mut self, id: TabId, line: OutputLine) -> ActionOutcome {
        let Some(tab) = self.get_tab_mut(id) else {
            return self.reject(RejectReason::UnknownTab(id));
        };
        let evicted = tab.append(line);
        if evicted > 0 {
            log::trace!("Tab {} evicted {} output line(s)", id, evicted);
        }
        ActionOutcome::Applied(())
    }

    /// Record a submitted command in the tab's history and the global history.
    pub fn record_command(&mut self, id: TabId, text: &str) -> ActionOutcome {
        let entry = HistoryEntry::new(text);
        let Some(tab) = self.get_tab_mut(id) else {
            return self.reject(RejectReason::UnknownTab(id));
        };
        tab.record(entry.clone());
        self.history.push(entry);
        ActionOutcome::Applied(())
    }

    /// Step a tab's history cursor; `None` if the tab does not exist.
    pub fn navigate_history(&mut self, id: TabId, direction: HistoryDirection) -> Option<String> {
        self.get_tab_mut(id).map(|tab| tab.navigate(direction))
    }

    pub fn rename_tab(&mut self, id: TabId, name: &str) -> ActionOutcome {
        self.update(id, |tab| tab.name = name.to_string())
    }

    pub fn set_pinned(&mut self, id: TabId, pinned: bool) -> ActionOutcome {
        self.update(id, |tab| tab.pinned = pinned)
    }

    pub fn set_modified(&mut self, id: TabId, modified: bool) -> ActionOutcome {
        self.update(id, |tab| tab.modified = modified)
    }

    pub fn set_working_directory(&mut self, id: TabId, directory: &str) -> ActionOutcome {
        self.update(id, |tab| {
            tab.working_directory = directory.to_string();
            tab.touch();
        })
    }

    pub fn set_theme(&mut self, id: TabId, theme: Option<&str>) -> ActionOutcome {
        self.update(id, |tab| tab.theme = theme.map(str::to_string))
    }

    /// Drop every output line of a tab.
    pub fn clear_output(&mut self, id: TabId) -> ActionOutcome {
        self.update(id, |tab| tab.output.clear())
    }

    fn update(&mut self, id: TabId, f: impl FnOnce(&mut Tab)) -> ActionOutcome {
        match self.get_tab_mut(id) {
            Some(tab) => {
                f(tab);
                ActionOutcome::Applied(())
            }
            None => self.reject(RejectReason::UnknownTab(id)),
        }
    }

    /// Open a new split seeded with fresh console tabs.
    ///
    /// A grid split gets three tabs, other orientations one. Capacity is
    /// checked before any tab is created, and the first new tab is activated.
    pub fn split(&mut self, orientation: Orientation) -> ActionOutcome<SplitId> {
        if let Err(e) = self.layout.can_create(orientation) {
            log::warn!("Split rejected: {}", e);
            return self.reject(e.into());
        }

        let directory = self.active_tab().map(|t| t.working_directory.clone());
        let count = match orientation {
            Orientation::Grid => 3,
            Orientation::Horizontal | Orientation::Vertical => 1,
        };
        let seeds: Vec<TabId> = (0..count)
            .map(|_| self.allocate_tab(TabKind::Console, directory.as_deref()))
            .collect();

        let size = 100.0 / (self.layout.len() + 1) as f32;
        match self.layout.create_split(orientation, &seeds, size) {
            Ok(split) => {
                self.active_tab_id = seeds.first().copied();
                self.verify();
                ActionOutcome::Applied(split)
            }
            Err(e) => {
                log::warn!("Split creation failed after capacity check: {}", e);
                for &tab in &seeds {
                    self.layout.insert_tab(tab);
                }
                self.verify();
                ActionOutcome::Rejected(e.into())
            }
        }
    }

    /// Move a tab into another split (drag and drop between splits).
    pub fn move_tab_to_split(&mut self, tab: TabId, split: SplitId) -> ActionOutcome {
        if !self.contains(tab) {
            return self.reject(RejectReason::UnknownTab(tab));
        }
        let outcome = match self.layout.move_tab_to_split(tab, split) {
            Ok(()) => ActionOutcome::Applied(()),
            Err(e) => self.reject(e.into()),
        };
        self.verify();
        outcome
    }

    pub fn resize_split(&mut self, split: SplitId, size: f32) -> ActionOutcome<bool> {
        match self.layout.resize_split(split, size) {
            Ok(resized) => ActionOutcome::Applied(resized),
            Err(e) => self.reject(e.into()),
        }
    }

    fn reject<T>(&self, reason: RejectReason) -> ActionOutcome<T> {
        log::debug!("Request ignored: {}", reason);
        ActionOutcome::Rejected(reason)
    }

    /// Check the single-active-tab and split-partition invariants.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        match self.active_tab_id {
            None if !self.tabs.is_empty() => return Err(InvariantViolation::NoActiveTab),
            Some(id) if !self.contains(id) => {
                return Err(InvariantViolation::ActiveTabMissing(id));
            }
            _ => {}
        }
        let open: Vec<TabId> = self.tabs.iter().map(|t| t.id).collect();
        self.layout.check_partition(&open)
    }

    fn verify(&self) {
        if let Err(e) = self.check_invariants() {
            debug_panic!("tab manager invariant violated: {}", e);
        }
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.get_tab(id))
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    pub fn is_active(&self, id: TabId) -> bool {
        self.active_tab_id == Some(id)
    }

    fn active_index(&self) -> Option<usize> {
        let id = self.active_tab_id?;
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    fn get_tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.iter().any(|t| t.id == id)
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn layout(&self) -> &SplitLayout {
        &self.layout
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }
}
