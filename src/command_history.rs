//! Command history: the session-wide log and the per-tab navigable log.
//!
//! Both are append-only and capacity-trimmed from the oldest end. Entries
//! are stored oldest first.

use chrono::{DateTime, Utc};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single submitted command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Direction of a history navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Older,
    Newer,
}

/// Result of one navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    /// `None` means "not browsing".
    pub cursor: Option<usize>,
    /// Text to place on the command line; empty when not browsing.
    pub command: String,
}

/// Move a history cursor one step.
///
/// From "not browsing", `Older` jumps to the newest entry. `Older` clamps at
/// the oldest entry. `Newer` past the newest entry leaves browsing and yields
/// an empty command.
pub fn step(
    cursor: Option<usize>,
    entries: &[HistoryEntry],
    direction: HistoryDirection,
) -> HistoryStep {
    let not_browsing = HistoryStep {
        cursor: None,
        command: String::new(),
    };
    if entries.is_empty() {
        return not_browsing;
    }

    let last = entries.len() - 1;
    let next = match (cursor, direction) {
        (None, HistoryDirection::Older) => Some(last),
        (None, HistoryDirection::Newer) => None,
        (Some(i), HistoryDirection::Older) => Some(i.min(last).saturating_sub(1)),
        (Some(i), HistoryDirection::Newer) if i >= last => None,
        (Some(i), HistoryDirection::Newer) => Some(i + 1),
    };

    match next {
        Some(i) => HistoryStep {
            cursor: Some(i),
            command: entries[i].command.clone(),
        },
        None => not_browsing,
    }
}

/// A tab's own history with its browsing cursor.
#[derive(Debug, Clone)]
pub struct TabHistory {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    cursor: Option<usize>,
}

impl TabHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            cursor: None,
        }
    }

    /// Append an entry and stop browsing.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        let excess = self.entries.len().saturating_sub(self.capacity);
        self.entries.drain(..excess);
        self.cursor = None;
    }

    /// Step the cursor and return the command to show.
    pub fn navigate(&mut self, direction: HistoryDirection) -> String {
        let HistoryStep { cursor, command } = step(self.cursor, &self.entries, direction);
        self.cursor = cursor;
        command
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session-wide command log shared by all tabs.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
    dirty: bool,
}

impl CommandHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
            dirty: false,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        self.truncate();
        self.dirty = true;
    }

    /// Replace the contents with previously saved entries (oldest first).
    pub fn restore(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries.into();
        self.truncate();
        self.dirty = false;
        log::info!("Restored {} command history entries", self.entries.len());
    }

    /// Fuzzy-search commands, best match first; ties keep the newer entry first.
    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        if query.is_empty() {
            return self.entries.iter().rev().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut matches: Vec<(i64, usize, &HistoryEntry)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                matcher
                    .fuzzy_match(&entry.command, query)
                    .map(|score| (score, i, entry))
            })
            .collect();
        matches.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        matches.into_iter().map(|(_, _, entry)| entry).collect()
    }

    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn truncate(&mut self) {
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(commands: &[&str]) -> Vec<HistoryEntry> {
        commands.iter().map(|c| HistoryEntry::new(*c)).collect()
    }

    #[test]
    fn test_step_walks_older_then_clamps() {
        let history = entries(&["a", "b", "c"]);
        let mut cursor = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            let next = step(cursor, &history, HistoryDirection::Older);
            cursor = next.cursor;
            seen.push(next.command);
        }
        assert_eq!(seen, vec!["c", "b", "a", "a"]);
        assert_eq!(cursor, Some(0));

        let newer = step(cursor, &history, HistoryDirection::Newer);
        assert_eq!(newer.command, "b");
        assert_eq!(newer.cursor, Some(1));
    }

    #[test]
    fn test_step_newer_past_end_stops_browsing() {
        let history = entries(&["a", "b"]);
        let result = step(Some(1), &history, HistoryDirection::Newer);
        assert_eq!(result.cursor, None);
        assert_eq!(result.command, "");
    }

    #[test]
    fn test_step_newer_from_not_browsing_is_noop() {
        let history = entries(&["a"]);
        let result = step(None, &history, HistoryDirection::Newer);
        assert_eq!(result.cursor, None);
        assert!(result.command.is_empty());
    }

    #[test]
    fn test_step_empty_history() {
        let result = step(None, &[], HistoryDirection::Older);
        assert_eq!(result.cursor, None);
        assert!(result.command.is_empty());
    }

    #[test]
    fn test_tab_history_record_resets_cursor() {
        let mut history = TabHistory::new(10);
        history.record(HistoryEntry::new("ls"));
        assert_eq!(history.navigate(HistoryDirection::Older), "ls");
        assert_eq!(history.cursor(), Some(0));

        history.record(HistoryEntry::new("pwd"));
        assert_eq!(history.cursor(), None);
        assert_eq!(history.navigate(HistoryDirection::Older), "pwd");
    }

    #[test]
    fn test_tab_history_trims_oldest() {
        let mut history = TabHistory::new(2);
        for c in ["a", "b", "c"] {
            history.record(HistoryEntry::new(c));
        }
        let commands: Vec<_> = history.entries().iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["b", "c"]);
    }

    #[test]
    fn test_global_history_capacity_and_dirty() {
        let mut history = CommandHistory::new(2);
        assert!(!history.is_dirty());
        for c in ["a", "b", "c"] {
            history.push(HistoryEntry::new(c));
        }
        assert!(history.is_dirty());
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].command, "b");

        history.mark_saved();
        assert!(!history.is_dirty());
    }

    #[test]
    fn test_search_filters_and_ranks() {
        let mut history = CommandHistory::new(10);
        for c in ["git status", "ls -la", "git commit"] {
            history.push(HistoryEntry::new(c));
        }
        let found: Vec<_> = history.search("git").iter().map(|e| e.command.as_str()).collect();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&"git status"));
        assert!(found.contains(&"git commit"));

        let all: Vec<_> = history.search("").iter().map(|e| e.command.as_str()).collect();
        assert_eq!(all, vec!["git commit", "ls -la", "git status"]);
    }
}
