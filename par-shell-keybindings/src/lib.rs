//! Keyboard shortcut resolution for par-shell.
//!
//! Bindings come from the user's config.yaml as `"Ctrl+Shift+T" -> "new_tab"`
//! pairs in two scopes:
//!
//! - global shortcuts, resolved only while no text input holds focus
//! - command-line shortcuts, resolved only while the command line holds focus
//!
//! A chord bound in both scopes keeps its command-line meaning; the global
//! entry is dropped when the resolver is built. This is what makes plain
//! Ctrl+C an interrupt and never a copy.

mod action;
mod chord;
mod matcher;
pub mod parser;
mod platform;

pub use action::{CommandLineAction, ShortcutAction};
pub use chord::{FocusContext, KeyChord};
pub use matcher::KeybindingMatcher;
pub use parser::{KeyCombo, ParseError, parse_key_combo};

use par_shell_config::KeyBinding;
use std::str::FromStr;

/// Outcome of resolving one chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Global(ShortcutAction),
    CommandLine(CommandLineAction),
    Unbound,
}

/// Registry of both binding scopes.
#[derive(Debug, Default)]
pub struct ShortcutResolver {
    global: Vec<(KeyCombo, ShortcutAction)>,
    command_line: Vec<(KeyCombo, CommandLineAction)>,
}

impl ShortcutResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver from config keybindings.
    ///
    /// Invalid key strings and unknown action names are logged and skipped.
    /// Global bindings whose chord collides with a command-line binding are
    /// dropped with a warning.
    pub fn from_config(global: &[KeyBinding], command_line: &[KeyBinding]) -> Self {
        log::info!(
            "Building shortcut resolver from {} global and {} command-line keybindings",
            global.len(),
            command_line.len()
        );

        let command_line: Vec<(KeyCombo, CommandLineAction)> = parse_bindings(command_line);
        let mut resolver = Self {
            global: Vec::new(),
            command_line,
        };

        for (combo, action) in parse_bindings::<ShortcutAction>(global) {
            if action == ShortcutAction::None {
                continue;
            }
            let resolved = combo.resolved();
            if let Some((_, cl_action)) = resolver
                .command_line
                .iter()
                .find(|(cl, _)| cl.resolved() == resolved)
            {
                log::warn!(
                    "Chord {} is bound to both '{}' and command-line '{}'; keeping the command-line binding",
                    combo,
                    action,
                    cl_action
                );
                continue;
            }
            resolver.global.push((combo, action));
        }

        log::info!(
            "Shortcut resolver initialized with {} global and {} command-line bindings",
            resolver.global.len(),
            resolver.command_line.len()
        );
        resolver
    }

    /// Resolve a chord in the given focus context.
    pub fn resolve(&self, chord: &KeyChord, focus: FocusContext) -> Resolution {
        match focus {
            FocusContext::None => match self.resolve_global(chord, focus) {
                ShortcutAction::None => Resolution::Unbound,
                action => Resolution::Global(action),
            },
            FocusContext::CommandLine => self
                .resolve_command_line(chord, focus)
                .map_or(Resolution::Unbound, Resolution::CommandLine),
            FocusContext::OtherTextInput => Resolution::Unbound,
        }
    }

    /// Global action for a chord, or [`ShortcutAction::None`] when a text
    /// input has focus or nothing matches.
    pub fn resolve_global(&self, chord: &KeyChord, focus: FocusContext) -> ShortcutAction {
        if focus != FocusContext::None {
            return ShortcutAction::None;
        }
        let matcher = KeybindingMatcher::from_chord(chord);
        self.global
            .iter()
            .find(|(combo, _)| matcher.matches(combo))
            .map_or(ShortcutAction::None, |(_, action)| *action)
    }

    /// Command-line action for a chord; only fires while the command line is focused.
    pub fn resolve_command_line(
        &self,
        chord: &KeyChord,
        focus: FocusContext,
    ) -> Option<CommandLineAction> {
        if focus != FocusContext::CommandLine {
            return None;
        }
        let matcher = KeybindingMatcher::from_chord(chord);
        self.command_line
            .iter()
            .find(|(combo, _)| matcher.matches(combo))
            .map(|(_, action)| *action)
    }

    /// Check if the resolver has any bindings.
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.command_line.is_empty()
    }

    /// Get the number of registered bindings across both scopes.
    pub fn len(&self) -> usize {
        self.global.len() + self.command_line.len()
    }
}

fn parse_bindings<A>(bindings: &[KeyBinding]) -> Vec<(KeyCombo, A)>
where
    A: FromStr<Err = ParseError>,
{
    let mut parsed = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let combo = match parse_key_combo(&binding.key) {
            Ok(combo) => combo,
            Err(e) => {
                log::warn!(
                    "Invalid keybinding '{}' for action '{}': {}",
                    binding.key,
                    binding.action,
                    e
                );
                continue;
            }
        };
        match binding.action.parse::<A>() {
            Ok(action) => {
                log::debug!("Registered keybinding: {} -> {}", binding.key, binding.action);
                parsed.push((combo, action));
            }
            Err(e) => log::warn!("Skipping keybinding '{}': {}", binding.key, e),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resolver() {
        let resolver = ShortcutResolver::new();
        assert!(resolver.is_empty());
        assert_eq!(
            resolver.resolve(&KeyChord::new("t").ctrl(), FocusContext::None),
            Resolution::Unbound
        );
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let global = vec![
            KeyBinding::new("InvalidKey", "new_tab"),
            KeyBinding::new("Ctrl+A", "not_an_action"),
            KeyBinding::new("Ctrl+B", "toggle_file_tree"),
        ];
        let resolver = ShortcutResolver::from_config(&global, &[]);
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_colliding_global_binding_dropped() {
        let global = vec![KeyBinding::new("Ctrl+C", "copy_selection")];
        let command_line = vec![KeyBinding::new("Ctrl+C", "interrupt")];
        let resolver = ShortcutResolver::from_config(&global, &command_line);

        assert_eq!(resolver.len(), 1);
        let chord = KeyChord::new("c").ctrl();
        assert_eq!(
            resolver.resolve(&chord, FocusContext::CommandLine),
            Resolution::CommandLine(CommandLineAction::Interrupt)
        );
        assert_eq!(
            resolver.resolve(&chord, FocusContext::None),
            Resolution::Unbound
        );
    }
}
