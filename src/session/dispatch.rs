//! Global shortcut and command-line action handling.

use super::panels::PanelId;
use super::{PendingCommand, SessionEvent, SessionOrchestrator};
use crate::autocomplete::Completion;
use crate::command_history::HistoryDirection;
use crate::config::defaults::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::keybindings::{CommandLineAction, ShortcutAction};
use crate::output_buffer::OutputLine;
use crate::split::Orientation;
use crate::tab::TabKind;

const FONT_STEP: f32 = 1.0;

impl SessionOrchestrator {
    /// Perform a global shortcut action.
    pub fn dispatch(&mut self, action: ShortcutAction) {
        if action == ShortcutAction::None {
            return;
        }
        log::debug!("Dispatching shortcut action {}", action);
        self.telemetry.track_user_action(action.as_str());

        match action {
            ShortcutAction::NewTab => {
                self.new_tab(TabKind::Console);
            }
            ShortcutAction::NextTab => {
                self.mutate(|tabs| tabs.next_tab());
            }
            ShortcutAction::PreviousTab => {
                self.mutate(|tabs| tabs.previous_tab());
            }
            ShortcutAction::SplitVertical => self.split(Orientation::Vertical),
            ShortcutAction::SplitHorizontal => self.split(Orientation::Horizontal),
            ShortcutAction::SplitGrid => self.split(Orientation::Grid),
            ShortcutAction::CloseTab => {
                if let Some(id) = self.tabs.active_tab_id() {
                    let _ = self.apply(|tabs| tabs.close_tab(id));
                }
            }
            ShortcutAction::CloseAllTabs => {
                self.mutate(|tabs| tabs.close_all_tabs());
            }
            ShortcutAction::ToggleFileTree => self.toggle_panel(PanelId::FileTree),
            ShortcutAction::ToggleHistory => self.toggle_panel(PanelId::History),
            ShortcutAction::ToggleSearch => self.toggle_panel(PanelId::Search),
            ShortcutAction::ClearSearch => {
                self.search_query.clear();
                self.search_results.clear();
                if self.panels.is_visible(PanelId::Search) {
                    self.toggle_panel(PanelId::Search);
                }
            }
            ShortcutAction::ToggleSettings => self.toggle_panel(PanelId::Settings),
            ShortcutAction::ToggleHelp => self.toggle_panel(PanelId::Help),
            ShortcutAction::TogglePerformance => self.toggle_panel(PanelId::Performance),
            ShortcutAction::ToggleDebug => self.toggle_panel(PanelId::Debug),
            ShortcutAction::CycleTheme => self.cycle_theme(),
            ShortcutAction::FontIncrease => self.set_font_size(self.display.font_size + FONT_STEP),
            ShortcutAction::FontDecrease => self.set_font_size(self.display.font_size - FONT_STEP),
            ShortcutAction::FontReset => self.set_font_size(self.default_font_size),
            ShortcutAction::ToggleMaximize => {
                self.display.maximized = !self.display.maximized;
                log::debug!("Maximized: {}", self.display.maximized);
            }
            ShortcutAction::ToggleFullscreen => self.toggle_fullscreen(),
            ShortcutAction::ToggleBackgroundJob => {
                self.background_job = !self.background_job;
                let state = if self.background_job { "started" } else { "paused" };
                self.append_to_active(OutputLine::system(format!("Background job {state}")));
            }
            ShortcutAction::CancelBackgroundJob => {
                if self.background_job {
                    self.background_job = false;
                    self.append_to_active(OutputLine::system("Background job cancelled"));
                }
            }
            ShortcutAction::CopySelection => self.copy_selection(),
            ShortcutAction::ClearActiveTab => {
                if let Some(id) = self.tabs.active_tab_id() {
                    self.clear_tab_output(id);
                }
            }
            ShortcutAction::ClearCommandLine => {
                self.command_line.clear();
                self.autocomplete.dismiss();
            }
            ShortcutAction::None => {}
        }
    }

    /// Perform a command-line action. Submitting may start a command.
    pub fn command_line_action(&mut self, action: CommandLineAction) -> Option<PendingCommand> {
        match action {
            CommandLineAction::HistoryOlder => {
                if self.autocomplete.is_open() {
                    self.autocomplete.select_previous();
                } else {
                    self.browse_history(HistoryDirection::Older);
                }
            }
            CommandLineAction::HistoryNewer => {
                if self.autocomplete.is_open() {
                    self.autocomplete.select_next();
                } else {
                    self.browse_history(HistoryDirection::Newer);
                }
            }
            CommandLineAction::Complete => {
                if self.autocomplete.is_open() {
                    self.autocomplete.select_next();
                } else {
                    self.complete();
                }
            }
            CommandLineAction::Escape => {
                if self.autocomplete.is_open() {
                    self.autocomplete.dismiss();
                } else {
                    self.command_line.clear();
                }
            }
            CommandLineAction::Paste => match self.services.clipboard.paste() {
                Ok(text) => self.command_line.push_str(&text),
                Err(e) => self.report_platform_error("paste", &e),
            },
            CommandLineAction::Interrupt => {
                self.autocomplete.dismiss();
                let line = format!("{}^C", self.command_line);
                self.command_line.clear();
                self.append_to_active(OutputLine::system(line));
            }
            CommandLineAction::Submit => {
                if let Some(value) = self.autocomplete.accept() {
                    self.command_line = value;
                } else {
                    let text = std::mem::take(&mut self.command_line);
                    return self.begin_submission(&text);
                }
            }
        }
        None
    }

    /// Rank completions for the command line and apply them.
    pub fn complete(&mut self) -> Completion {
        let cwd = self
            .tabs
            .active_tab()
            .map(|t| t.working_directory().to_string())
            .unwrap_or_default();
        let options = self.ranker.rank(&self.command_line, &cwd);
        let completion = self.autocomplete.complete(options);
        if let Completion::Replaced(value) = &completion {
            self.command_line = value.clone();
        }
        completion
    }

    fn browse_history(&mut self, direction: HistoryDirection) {
        let Some(id) = self.tabs.active_tab_id() else {
            return;
        };
        if let Some(command) = self.tabs.navigate_history(id, direction) {
            self.command_line = command;
        }
    }

    fn split(&mut self, orientation: Orientation) {
        let _ = self.apply(|tabs| tabs.split(orientation));
    }

    fn toggle_panel(&mut self, panel: PanelId) {
        let visible = self.panels.toggle(panel);
        log::debug!("Panel {:?} visible: {}", panel, visible);
        self.bus.publish(SessionEvent::PanelToggled { panel, visible });
    }

    fn cycle_theme(&mut self) {
        let themes = self.services.themes.list_themes();
        if themes.is_empty() {
            return;
        }
        let next = themes
            .iter()
            .position(|t| *t == self.display.theme)
            .map_or(0, |i| (i + 1) % themes.len());
        self.set_theme(&themes[next]);
    }

    /// Select a theme by id and forward it to the theme provider.
    pub fn set_theme(&mut self, theme: &str) {
        if self.display.theme == theme {
            return;
        }
        self.display.theme = theme.to_string();
        self.services.themes.set_active(theme);
        log::info!("Theme changed to {}", theme);
        self.bus.publish(SessionEvent::ThemeChanged(theme.to_string()));
    }

    /// Select a layout offered by the theme provider; unknown ids are refused.
    pub fn set_layout(&mut self, layout: &str) {
        if self.display.layout == layout {
            return;
        }
        if !self.services.themes.list_layouts().iter().any(|l| l == layout) {
            log::warn!("Ignoring unknown layout '{}'", layout);
            self.append_to_active(OutputLine::warning(format!("Unknown layout: {layout}")));
            return;
        }
        self.display.layout = layout.to_string();
        self.services.themes.set_active(layout);
        log::info!("Layout changed to {}", layout);
        self.bus.publish(SessionEvent::LayoutChanged(layout.to_string()));
    }

    fn set_font_size(&mut self, size: f32) {
        let size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        if (size - self.display.font_size).abs() < f32::EPSILON {
            return;
        }
        self.display.font_size = size;
        self.bus.publish(SessionEvent::FontSizeChanged(size));
    }

    fn toggle_fullscreen(&mut self) {
        let result = if self.display.fullscreen {
            self.services.fullscreen.exit()
        } else {
            self.services.fullscreen.enter()
        };
        match result {
            Ok(()) => self.display.fullscreen = !self.display.fullscreen,
            Err(e) => self.report_platform_error("fullscreen", &e),
        }
    }

    /// Copy the selection, or the active tab's last line when nothing is selected.
    fn copy_selection(&mut self) {
        let text = self.selection.clone().or_else(|| {
            self.tabs
                .active_tab()
                .and_then(|t| t.output().last())
                .map(|line| line.text().to_string())
        });
        let Some(text) = text else {
            return;
        };
        if let Err(e) = self.services.clipboard.copy(&text) {
            self.report_platform_error("copy", &e);
        }
    }
}
