//! Command-line autocomplete
//!
//! - [`AutocompleteRanker`] merges and orders candidates from the command
//!   catalog, the directory provider, and the environment.
//! - [`AutocompleteState`] holds the dropdown shown for one completion
//!   request and its selection cursor.

mod ranker;

pub use ranker::{AutocompleteRanker, MAX_OPTIONS};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionCategory {
    Command,
    File,
    Directory,
    Variable,
}

/// One ranked suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteOption {
    /// Full text the command line becomes when accepted
    pub value: String,
    pub description: String,
    pub category: OptionCategory,
    /// Ordering weight in `[0, 1]`, only meaningful within one ranking
    pub score: f32,
}

/// What an explicit completion request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    NoMatches,
    /// Exactly one candidate: the command line becomes this text
    Replaced(String),
    /// Several candidates: a dropdown with this many entries is open
    DropdownOpened(usize),
}

/// Dropdown state for the command line.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteState {
    options: Vec<AutocompleteOption>,
    selected: usize,
}

impl AutocompleteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ranking produced for an explicit "complete" request.
    pub fn complete(&mut self, options: Vec<AutocompleteOption>) -> Completion {
        self.dismiss();
        match options.len() {
            0 => Completion::NoMatches,
            1 => Completion::Replaced(format!("{} ", options[0].value)),
            n => {
                self.options = options;
                Completion::DropdownOpened(n)
            }
        }
    }

    pub fn select_next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }

    /// Commit the selected option, closing the dropdown.
    pub fn accept(&mut self) -> Option<String> {
        let value = self.selected_option().map(|o| format!("{} ", o.value));
        self.dismiss();
        value
    }

    pub fn dismiss(&mut self) {
        self.options.clear();
        self.selected = 0;
    }

    pub fn is_open(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.is_open().then_some(self.selected)
    }

    pub fn selected_option(&self) -> Option<&AutocompleteOption> {
        self.options.get(self.selected)
    }

    pub fn options(&self) -> &[AutocompleteOption] {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: &str) -> AutocompleteOption {
        AutocompleteOption {
            value: value.to_string(),
            description: String::new(),
            category: OptionCategory::Command,
            score: 1.0,
        }
    }

    #[test]
    fn test_single_option_replaces_without_dropdown() {
        let mut state = AutocompleteState::new();
        assert_eq!(
            state.complete(vec![option("git")]),
            Completion::Replaced("git ".to_string())
        );
        assert!(!state.is_open());
    }

    #[test]
    fn test_no_options() {
        let mut state = AutocompleteState::new();
        assert_eq!(state.complete(Vec::new()), Completion::NoMatches);
        assert_eq!(state.accept(), None);
    }

    #[test]
    fn test_dropdown_cycles_and_accepts() {
        let mut state = AutocompleteState::new();
        let result = state.complete(vec![option("git"), option("given"), option("gzip")]);
        assert_eq!(result, Completion::DropdownOpened(3));
        assert_eq!(state.selected_index(), Some(0));

        state.select_previous();
        assert_eq!(state.selected_index(), Some(2));
        state.select_next();
        state.select_next();
        assert_eq!(state.selected_index(), Some(1));

        assert_eq!(state.accept(), Some("given ".to_string()));
        assert!(!state.is_open());
        assert_eq!(state.selected_index(), None);
    }
}
