//! Session orchestrator
//!
//! The façade over the tab manager, split layout, shortcut resolver,
//! autocomplete, and telemetry. Input arrives as [`InputEvent`]s; every
//! resulting change is announced on the [`EventBus`] and the full state can
//! be read back as a [`SessionSnapshot`].
//!
//! - `dispatch`: global shortcut and command-line actions
//! - `submission`: command submission and completion
//! - `runner`: the async event loop with timers
//! - `snapshot`: renderable state

mod dispatch;
mod events;
mod panels;
mod runner;
mod snapshot;
mod submission;

pub use events::{EventBus, InputEvent, SessionEvent};
pub use panels::{PanelId, PanelVisibility};
pub use snapshot::{SessionSnapshot, TabSnapshot};
pub use submission::{CompletedCommand, PendingCommand};

use crate::autocomplete::{AutocompleteRanker, AutocompleteState};
use crate::config::Config;
use crate::error::{ActionOutcome, PlatformError};
use crate::keybindings::{FocusContext, Resolution, ShortcutResolver};
use crate::output_buffer::OutputLine;
use crate::split::SplitId;
use crate::tab::{TabId, TabKind, TabManager};
use crate::telemetry::{CPU_METRIC, MEMORY_METRIC, TelemetryAggregator};
use crate::timers::TimerEvent;
use crate::traits::{
    ClipboardService, CommandCatalog, CommandProcessor, DirectoryProvider, EnvironmentProvider,
    FullscreenService, ThemeProvider,
};
use crate::traits_impl::{
    BuiltinProcessor, FsDirectoryProvider, HeadlessFullscreen, MemoryClipboard,
    ProcessEnvironment, StaticCommandCatalog, StaticThemeProvider,
};
use std::sync::Arc;
use std::time::Duration;

/// Most history matches kept for the search panel.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// External collaborators a session talks to.
#[derive(Clone)]
pub struct Services {
    pub processor: Arc<dyn CommandProcessor>,
    pub catalog: Arc<dyn CommandCatalog>,
    pub directories: Arc<dyn DirectoryProvider>,
    pub environment: Arc<dyn EnvironmentProvider>,
    pub themes: Arc<dyn ThemeProvider>,
    pub clipboard: Arc<dyn ClipboardService>,
    pub fullscreen: Arc<dyn FullscreenService>,
}

impl Services {
    /// Built-in demo processor with real file system and environment.
    pub fn builtin() -> Self {
        Self {
            processor: Arc::new(BuiltinProcessor),
            catalog: Arc::new(StaticCommandCatalog::builtin()),
            directories: Arc::new(FsDirectoryProvider),
            environment: Arc::new(ProcessEnvironment),
            themes: Arc::new(StaticThemeProvider::default()),
            clipboard: Arc::new(MemoryClipboard::default()),
            fullscreen: Arc::new(HeadlessFullscreen),
        }
    }
}

/// Window-level presentation state.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub theme: String,
    pub layout: String,
    pub font_size: f32,
    pub maximized: bool,
    pub fullscreen: bool,
    /// Set by the idle timer, cleared by any input
    pub ui_hidden: bool,
}

/// Tab and split ids before a mutation, used to announce what changed.
struct Shape {
    tabs: Vec<TabId>,
    splits: Vec<SplitId>,
    active: Option<TabId>,
}

impl Shape {
    fn capture(tabs: &TabManager) -> Self {
        Self {
            tabs: tabs.tabs().iter().map(|t| t.id()).collect(),
            splits: tabs.layout().splits().iter().map(|s| s.id).collect(),
            active: tabs.active_tab_id(),
        }
    }
}

/// One running session.
pub struct SessionOrchestrator {
    tabs: TabManager,
    resolver: ShortcutResolver,
    telemetry: TelemetryAggregator,
    ranker: AutocompleteRanker,
    autocomplete: AutocompleteState,
    services: Services,
    bus: EventBus,
    panels: PanelVisibility,
    display: DisplayState,
    default_font_size: f32,
    background_job: bool,
    command_line: String,
    search_query: String,
    search_results: Vec<String>,
    selection: Option<String>,
    focus: FocusContext,
    metrics_interval: Duration,
    idle_timeout: Duration,
}

impl SessionOrchestrator {
    /// Create a session with one console tab.
    pub fn new(config: &Config, services: Services, bus: EventBus) -> Self {
        let ranker = AutocompleteRanker::new(
            Arc::clone(&services.catalog),
            Arc::clone(&services.directories),
            Arc::clone(&services.environment),
        );
        let mut session = Self {
            tabs: TabManager::new(config),
            resolver: ShortcutResolver::from_config(
                &config.global_keybindings,
                &config.command_line_keybindings,
            ),
            telemetry: TelemetryAggregator::new(config.telemetry_capacity),
            ranker,
            autocomplete: AutocompleteState::new(),
            services,
            bus,
            panels: PanelVisibility::default(),
            display: DisplayState {
                theme: config.theme.clone(),
                layout: config.layout.clone(),
                font_size: config.font_size,
                maximized: false,
                fullscreen: false,
                ui_hidden: false,
            },
            default_font_size: config.font_size,
            background_job: false,
            command_line: String::new(),
            search_query: String::new(),
            search_results: Vec::new(),
            selection: None,
            focus: FocusContext::CommandLine,
            metrics_interval: Duration::from_millis(config.metrics_refresh_interval_ms),
            idle_timeout: Duration::from_secs(config.idle_hide_timeout_secs),
        };
        session.services.themes.set_active(&session.display.theme);
        session.mutate(|tabs| tabs.create_tab(TabKind::Console, None));
        log::info!("Session started (telemetry session {})", session.telemetry.session_id());
        session
    }

    /// Apply one input event.
    ///
    /// A submission that needs the command processor is returned as a
    /// [`PendingCommand`]; the caller runs it and hands the result to
    /// [`complete_submission`](Self::complete_submission).
    pub fn handle_input(&mut self, event: InputEvent) -> Option<PendingCommand> {
        if self.display.ui_hidden {
            self.display.ui_hidden = false;
            self.bus.publish(SessionEvent::UiHidden(false));
        }

        match event {
            InputEvent::Key(chord) => match self.resolver.resolve(&chord, self.focus) {
                Resolution::Global(action) => {
                    self.dispatch(action);
                    None
                }
                Resolution::CommandLine(action) => self.command_line_action(action),
                Resolution::Unbound => None,
            },
            InputEvent::Shortcut(action) => {
                self.dispatch(action);
                None
            }
            InputEvent::Focus(focus) => {
                self.focus = focus;
                None
            }
            InputEvent::SetCommandLine(text) => {
                self.command_line = text;
                self.autocomplete.dismiss();
                None
            }
            InputEvent::Submit(text) => self.begin_submission(&text),
            InputEvent::SetSearchQuery(query) => {
                self.search_query = query;
                self.refresh_search();
                None
            }
            InputEvent::SetSelection(selection) => {
                self.selection = selection;
                None
            }
            InputEvent::FileDrop(paths) => {
                self.handle_file_drop(&paths);
                None
            }
            InputEvent::CreateTab(kind) => {
                self.new_tab(kind);
                None
            }
            InputEvent::ActivateTab(id) => {
                let _ = self.apply(|tabs| tabs.activate(id));
                None
            }
            InputEvent::CloseTab(id) => {
                let _ = self.apply(|tabs| tabs.close_tab(id));
                None
            }
            InputEvent::MoveTab { tab, split } => {
                let _ = self.apply(|tabs| tabs.move_tab_to_split(tab, split));
                None
            }
            InputEvent::ResizeSplit { split, size } => {
                let _ = self.apply(|tabs| tabs.resize_split(split, size));
                None
            }
            InputEvent::RenameTab { tab, name } => {
                self.update_tab(tab, |tabs| tabs.rename_tab(tab, &name));
                None
            }
            InputEvent::SetTabModified { tab, modified } => {
                self.update_tab(tab, |tabs| tabs.set_modified(tab, modified));
                None
            }
            InputEvent::SetTabTheme { tab, theme } => {
                self.update_tab(tab, |tabs| tabs.set_theme(tab, theme.as_deref()));
                None
            }
            InputEvent::SelectLayout(layout) => {
                self.set_layout(&layout);
                None
            }
            InputEvent::ShowStats => {
                self.report_stats();
                None
            }
            InputEvent::Shutdown => None,
        }
    }

    /// Apply a timer tick.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::MetricsRefresh(sample) => {
                self.telemetry
                    .track_performance(CPU_METRIC, f64::from(sample.cpu_percent));
                self.telemetry
                    .track_performance(MEMORY_METRIC, f64::from(sample.memory_percent));
            }
            TimerEvent::IdleHide => {
                if !self.display.ui_hidden {
                    log::debug!("Hiding UI after inactivity");
                    self.display.ui_hidden = true;
                    self.bus.publish(SessionEvent::UiHidden(true));
                }
            }
        }
    }

    /// Create a tab of `kind` in the active tab's directory and switch to it.
    pub fn new_tab(&mut self, kind: TabKind) -> TabId {
        let directory = self
            .tabs
            .active_tab()
            .map(|t| t.working_directory().to_string());
        self.mutate(|tabs| {
            let id = tabs.create_tab(kind, directory.as_deref());
            let _ = tabs.activate(id);
            id
        })
    }

    /// Run a tab-manager operation and announce the resulting changes.
    fn mutate<T>(&mut self, f: impl FnOnce(&mut TabManager) -> T) -> T {
        let before = Shape::capture(&self.tabs);
        let result = f(&mut self.tabs);
        self.announce(before);
        result
    }

    /// Like [`mutate`](Self::mutate), also announcing a rejection.
    fn apply<T>(
        &mut self,
        f: impl FnOnce(&mut TabManager) -> ActionOutcome<T>,
    ) -> ActionOutcome<T> {
        let outcome = self.mutate(f);
        if let ActionOutcome::Rejected(reason) = &outcome {
            self.bus.publish(SessionEvent::ActionRejected(reason.clone()));
        }
        outcome
    }

    fn announce(&self, before: Shape) {
        let after = Shape::capture(&self.tabs);
        for id in before.tabs.iter().filter(|id| !after.tabs.contains(id)) {
            self.bus.publish(SessionEvent::TabClosed(*id));
        }
        for split in before.splits.iter().filter(|s| !after.splits.contains(s)) {
            self.bus.publish(SessionEvent::SplitRemoved(*split));
        }
        for split in after.splits.iter().filter(|s| !before.splits.contains(s)) {
            self.bus.publish(SessionEvent::SplitCreated(*split));
        }
        for id in after.tabs.iter().filter(|id| !before.tabs.contains(id)) {
            self.bus.publish(SessionEvent::TabCreated(*id));
        }
        if after.active != before.active
            && let Some(active) = after.active
        {
            self.bus.publish(SessionEvent::TabActivated(active));
        }
    }

    /// Change one tab's attributes and announce it.
    fn update_tab(&mut self, tab: TabId, f: impl FnOnce(&mut TabManager) -> ActionOutcome) {
        if self.apply(f).is_applied() {
            self.bus.publish(SessionEvent::TabUpdated(tab));
        }
    }

    /// Recompute history matches for the current search query.
    ///
    /// An empty query shows nothing.
    fn refresh_search(&mut self) {
        self.search_results = if self.search_query.is_empty() {
            Vec::new()
        } else {
            self.tabs
                .history()
                .search(&self.search_query)
                .into_iter()
                .take(MAX_SEARCH_RESULTS)
                .map(|entry| entry.command.clone())
                .collect()
        };
        log::trace!(
            "History search '{}' matched {} command(s)",
            self.search_query,
            self.search_results.len()
        );
    }

    /// Drop a tab's output and announce it.
    fn clear_tab_output(&mut self, tab: TabId) {
        if self.tabs.clear_output(tab).is_applied() {
            self.bus.publish(SessionEvent::OutputCleared(tab));
        }
    }

    /// Append lines to a tab; dropped silently if the tab is gone.
    fn append_lines(&mut self, tab: TabId, lines: impl IntoIterator<Item = OutputLine>) {
        let mut appended = Vec::new();
        for line in lines {
            if !self.tabs.append_output(tab, line.clone()).is_applied() {
                return;
            }
            appended.push(line);
        }
        if !appended.is_empty() {
            self.bus.publish(SessionEvent::OutputAppended {
                tab,
                lines: appended,
            });
        }
    }

    fn append_to_active(&mut self, line: OutputLine) {
        if let Some(tab) = self.tabs.active_tab_id() {
            self.append_lines(tab, [line]);
        }
    }

    /// Surface a platform failure on the active tab.
    fn report_platform_error(&mut self, source: &str, error: &PlatformError) {
        log::warn!("{} failed: {}", source, error);
        self.telemetry.track_warning(source, error.to_string());
        self.append_to_active(OutputLine::warning(error.to_string()));
    }

    /// Print the telemetry summary to the active tab.
    fn report_stats(&mut self) {
        let summary = self.telemetry.summary();
        let mut lines = vec![OutputLine::info(format!(
            "Commands: {}  errors: {} ({:.1}%)  avg: {:.1} ms",
            summary.command_count,
            summary.error_count,
            summary.error_rate * 100.0,
            summary.average_execution_ms
        ))];
        if !summary.top_commands.is_empty() {
            let top: Vec<String> = summary
                .top_commands
                .iter()
                .map(|(name, count)| format!("{name} ({count})"))
                .collect();
            lines.push(OutputLine::info(format!("Top commands: {}", top.join(", "))));
        }
        for event in &summary.recent_errors {
            lines.push(OutputLine::warning(format!(
                "{} {}: {}",
                event.timestamp.format("%H:%M:%S"),
                event.name,
                event.detail.as_deref().unwrap_or("")
            )));
        }
        if let Some(point) = summary.cpu_trend.last() {
            lines.push(OutputLine::info(format!("CPU: {:.1}%", point.value)));
        }
        if let Some(point) = summary.memory_trend.last() {
            lines.push(OutputLine::info(format!("Memory: {:.1}%", point.value)));
        }
        if let Some(tab) = self.tabs.active_tab_id() {
            self.append_lines(tab, lines);
        }
    }

    /// List dropped paths and print their entries to the active tab.
    fn handle_file_drop(&mut self, paths: &[String]) {
        self.telemetry.track_user_action("file_drop");
        for path in paths {
            match self.services.directories.list(path) {
                Ok(entries) => {
                    let mut lines = vec![OutputLine::info(format!(
                        "{}: {} entries",
                        path,
                        entries.len()
                    ))];
                    lines.extend(entries.iter().map(|entry| {
                        let suffix = match entry.kind {
                            crate::traits::EntryKind::Directory => "/",
                            crate::traits::EntryKind::File => "",
                        };
                        OutputLine::info(format!("  {}{}", entry.name, suffix))
                    }));
                    if let Some(tab) = self.tabs.active_tab_id() {
                        self.append_lines(tab, lines);
                    }
                }
                Err(e) => self.report_platform_error("file_drop", &e),
            }
        }
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut TabManager {
        &mut self.tabs
    }

    pub fn telemetry(&self) -> &TelemetryAggregator {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut TelemetryAggregator {
        &mut self.telemetry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn panels(&self) -> PanelVisibility {
        self.panels
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Global history matches for the search query, best first
    pub fn search_results(&self) -> &[String] {
        &self.search_results
    }

    pub fn autocomplete(&self) -> &AutocompleteState {
        &self.autocomplete
    }

    pub fn focus(&self) -> FocusContext {
        self.focus
    }

    pub fn is_background_job_running(&self) -> bool {
        self.background_job
    }
}
