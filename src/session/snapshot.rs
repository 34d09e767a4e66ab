//! Renderable view of a session.

use super::panels::PanelId;
use super::SessionOrchestrator;
use crate::split::Panel;
use crate::tab::{TabId, TabKind};
use crate::telemetry::AnalyticsSummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub name: String,
    pub kind: TabKind,
    pub icon: &'static str,
    pub active: bool,
    pub pinned: bool,
    pub modified: bool,
    pub line_count: usize,
    pub working_directory: String,
}

/// Everything a renderer needs, detached from the live session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tabs: Vec<TabSnapshot>,
    pub panels: Vec<Panel>,
    pub visible_panels: Vec<PanelId>,
    pub theme: String,
    pub layout: String,
    pub font_size: f32,
    pub maximized: bool,
    pub fullscreen: bool,
    pub ui_hidden: bool,
    pub background_job: bool,
    pub command_line: String,
    pub search_query: String,
    pub search_results: Vec<String>,
    pub autocomplete: Vec<String>,
    pub autocomplete_selected: Option<usize>,
    pub telemetry: AnalyticsSummary,
}

impl SessionOrchestrator {
    pub fn snapshot(&self) -> SessionSnapshot {
        let tabs = self
            .tabs
            .tabs()
            .iter()
            .map(|tab| TabSnapshot {
                id: tab.id(),
                name: tab.name().to_string(),
                kind: tab.kind(),
                icon: tab.kind().icon(),
                active: self.tabs.is_active(tab.id()),
                pinned: tab.is_pinned(),
                modified: tab.is_modified(),
                line_count: tab.output().len(),
                working_directory: tab.working_directory().to_string(),
            })
            .collect();

        SessionSnapshot {
            tabs,
            panels: self.tabs.layout().resolve_tabs_for_render(),
            visible_panels: self.panels.visible(),
            theme: self.display.theme.clone(),
            layout: self.display.layout.clone(),
            font_size: self.display.font_size,
            maximized: self.display.maximized,
            fullscreen: self.display.fullscreen,
            ui_hidden: self.display.ui_hidden,
            background_job: self.background_job,
            command_line: self.command_line.clone(),
            search_query: self.search_query.clone(),
            search_results: self.search_results.clone(),
            autocomplete: self
                .autocomplete
                .options()
                .iter()
                .map(|o| o.value.clone())
                .collect(),
            autocomplete_selected: self.autocomplete.selected_index(),
            telemetry: self.telemetry.summary(),
        }
    }
}
