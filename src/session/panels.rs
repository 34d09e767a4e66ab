//! Visibility of the side panels as a single bitset.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    FileTree,
    History,
    Search,
    Settings,
    Help,
    Performance,
    Debug,
}

impl PanelId {
    pub const ALL: [PanelId; 7] = [
        PanelId::FileTree,
        PanelId::History,
        PanelId::Search,
        PanelId::Settings,
        PanelId::Help,
        PanelId::Performance,
        PanelId::Debug,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Which panels are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelVisibility(u8);

impl PanelVisibility {
    pub fn is_visible(self, panel: PanelId) -> bool {
        self.0 & panel.bit() != 0
    }

    pub fn set(&mut self, panel: PanelId, visible: bool) {
        if visible {
            self.0 |= panel.bit();
        } else {
            self.0 &= !panel.bit();
        }
    }

    /// Flip a panel and return its new visibility.
    pub fn toggle(&mut self, panel: PanelId) -> bool {
        self.0 ^= panel.bit();
        self.is_visible(panel)
    }

    pub fn visible(self) -> Vec<PanelId> {
        PanelId::ALL
            .into_iter()
            .filter(|&p| self.is_visible(p))
            .collect()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_independent_per_panel() {
        let mut panels = PanelVisibility::default();
        assert!(panels.is_empty());

        assert!(panels.toggle(PanelId::Search));
        assert!(panels.toggle(PanelId::Debug));
        assert_eq!(panels.visible(), vec![PanelId::Search, PanelId::Debug]);

        assert!(!panels.toggle(PanelId::Search));
        assert!(panels.is_visible(PanelId::Debug));
        panels.set(PanelId::Debug, false);
        assert!(panels.is_empty());
    }
}
