//! Logical actions a chord can resolve to.

use crate::parser::ParseError;
use std::fmt;
use std::str::FromStr;

/// Global shortcut actions, resolved while no text input is focused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    NewTab,
    NextTab,
    PreviousTab,
    SplitVertical,
    SplitHorizontal,
    SplitGrid,
    CloseTab,
    CloseAllTabs,
    ToggleFileTree,
    ToggleHistory,
    ToggleSearch,
    ClearSearch,
    ToggleSettings,
    ToggleHelp,
    TogglePerformance,
    ToggleDebug,
    CycleTheme,
    FontIncrease,
    FontDecrease,
    FontReset,
    ToggleMaximize,
    ToggleFullscreen,
    ToggleBackgroundJob,
    CancelBackgroundJob,
    CopySelection,
    ClearActiveTab,
    ClearCommandLine,
    #[default]
    None,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 28] = [
        ShortcutAction::NewTab,
        ShortcutAction::NextTab,
        ShortcutAction::PreviousTab,
        ShortcutAction::SplitVertical,
        ShortcutAction::SplitHorizontal,
        ShortcutAction::SplitGrid,
        ShortcutAction::CloseTab,
        ShortcutAction::CloseAllTabs,
        ShortcutAction::ToggleFileTree,
        ShortcutAction::ToggleHistory,
        ShortcutAction::ToggleSearch,
        ShortcutAction::ClearSearch,
        ShortcutAction::ToggleSettings,
        ShortcutAction::ToggleHelp,
        ShortcutAction::TogglePerformance,
        ShortcutAction::ToggleDebug,
        ShortcutAction::CycleTheme,
        ShortcutAction::FontIncrease,
        ShortcutAction::FontDecrease,
        ShortcutAction::FontReset,
        ShortcutAction::ToggleMaximize,
        ShortcutAction::ToggleFullscreen,
        ShortcutAction::ToggleBackgroundJob,
        ShortcutAction::CancelBackgroundJob,
        ShortcutAction::CopySelection,
        ShortcutAction::ClearActiveTab,
        ShortcutAction::ClearCommandLine,
        ShortcutAction::None,
    ];

    /// Config-file name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            ShortcutAction::NewTab => "new_tab",
            ShortcutAction::NextTab => "next_tab",
            ShortcutAction::PreviousTab => "previous_tab",
            ShortcutAction::SplitVertical => "split_vertical",
            ShortcutAction::SplitHorizontal => "split_horizontal",
            ShortcutAction::SplitGrid => "split_grid",
            ShortcutAction::CloseTab => "close_tab",
            ShortcutAction::CloseAllTabs => "close_all_tabs",
            ShortcutAction::ToggleFileTree => "toggle_file_tree",
            ShortcutAction::ToggleHistory => "toggle_history",
            ShortcutAction::ToggleSearch => "toggle_search",
            ShortcutAction::ClearSearch => "clear_search",
            ShortcutAction::ToggleSettings => "toggle_settings",
            ShortcutAction::ToggleHelp => "toggle_help",
            ShortcutAction::TogglePerformance => "toggle_performance",
            ShortcutAction::ToggleDebug => "toggle_debug",
            ShortcutAction::CycleTheme => "cycle_theme",
            ShortcutAction::FontIncrease => "font_increase",
            ShortcutAction::FontDecrease => "font_decrease",
            ShortcutAction::FontReset => "font_reset",
            ShortcutAction::ToggleMaximize => "toggle_maximize",
            ShortcutAction::ToggleFullscreen => "toggle_fullscreen",
            ShortcutAction::ToggleBackgroundJob => "toggle_background_job",
            ShortcutAction::CancelBackgroundJob => "cancel_background_job",
            ShortcutAction::CopySelection => "copy_selection",
            ShortcutAction::ClearActiveTab => "clear_active_tab",
            ShortcutAction::ClearCommandLine => "clear_command_line",
            ShortcutAction::None => "none",
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseError::UnknownAction(s.to_string()))
    }
}

/// Actions scoped to the focused command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLineAction {
    HistoryOlder,
    HistoryNewer,
    Complete,
    Escape,
    Paste,
    Interrupt,
    Submit,
}

impl CommandLineAction {
    pub const ALL: [CommandLineAction; 7] = [
        CommandLineAction::HistoryOlder,
        CommandLineAction::HistoryNewer,
        CommandLineAction::Complete,
        CommandLineAction::Escape,
        CommandLineAction::Paste,
        CommandLineAction::Interrupt,
        CommandLineAction::Submit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandLineAction::HistoryOlder => "history_older",
            CommandLineAction::HistoryNewer => "history_newer",
            CommandLineAction::Complete => "complete",
            CommandLineAction::Escape => "escape",
            CommandLineAction::Paste => "paste",
            CommandLineAction::Interrupt => "interrupt",
            CommandLineAction::Submit => "submit",
        }
    }
}

impl fmt::Display for CommandLineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandLineAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseError::UnknownAction(s.to_string()))
    }
}
