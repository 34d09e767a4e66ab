//! Key event matching.
//!
//! Matches structured key chords against parsed KeyCombos.

use crate::chord::KeyChord;
use crate::parser::{KeyCombo, Modifiers, NamedKey, ParsedKey};
use crate::platform::{parse_named_key, resolve_cmd_or_ctrl};

/// Matcher for comparing key chords against keybindings.
#[derive(Debug)]
pub struct KeybindingMatcher {
    /// Active modifiers from the event
    modifiers: Modifiers,
    /// The logical key from the event
    key: Option<ParsedKey>,
}

impl KeybindingMatcher {
    /// Create a matcher from a key chord.
    pub fn from_chord(chord: &KeyChord) -> Self {
        let modifiers = Modifiers {
            ctrl: chord.ctrl,
            alt: chord.alt,
            shift: chord.shift,
            meta: chord.meta,
            cmd_or_ctrl: false,
        };

        Self {
            modifiers,
            key: normalize_key(&chord.key),
        }
    }

    /// Check if this event matches the given key combo.
    pub fn matches(&self, combo: &KeyCombo) -> bool {
        let key_matches = match (&self.key, &combo.key) {
            (Some(ParsedKey::Character(event_char)), ParsedKey::Character(combo_char)) => {
                event_char.eq_ignore_ascii_case(combo_char)
            }
            (Some(ParsedKey::Named(event_named)), ParsedKey::Named(combo_named)) => {
                event_named == combo_named
            }
            _ => false,
        };

        key_matches && self.modifiers_match(&combo.modifiers)
    }

    /// Check if modifiers match, handling CmdOrCtrl specially.
    fn modifiers_match(&self, combo_mods: &Modifiers) -> bool {
        let (expected_ctrl, expected_meta) =
            resolve_cmd_or_ctrl(combo_mods.cmd_or_ctrl, combo_mods.ctrl, combo_mods.meta);

        self.modifiers.ctrl == expected_ctrl
            && self.modifiers.alt == combo_mods.alt
            && self.modifiers.shift == combo_mods.shift
            && self.modifiers.meta == expected_meta
    }
}

/// Turn a reported key name into a comparable key.
///
/// Single printable characters are uppercased so that Shift+T (`"T"`) and
/// T (`"t"`) compare equal; the shift flag distinguishes them.
fn normalize_key(key: &str) -> Option<ParsedKey> {
    if key == " " {
        return Some(ParsedKey::Named(NamedKey::Space));
    }

    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(ParsedKey::Character(c.to_ascii_uppercase())),
        (Some(_), Some(_)) => parse_named_key(key).map(ParsedKey::Named),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_key_combo;

    fn matches(chord: KeyChord, combo: &str) -> bool {
        let combo = parse_key_combo(combo).unwrap();
        KeybindingMatcher::from_chord(&chord).matches(&combo)
    }

    #[test]
    fn test_character_matching_ignores_case() {
        assert!(matches(KeyChord::new("t").ctrl().shift(), "Ctrl+Shift+T"));
        assert!(matches(KeyChord::new("T").ctrl().shift(), "Ctrl+Shift+T"));
        assert!(!matches(KeyChord::new("y").ctrl().shift(), "Ctrl+Shift+T"));
    }

    #[test]
    fn test_named_key_matching() {
        assert!(matches(KeyChord::new("ArrowUp"), "ArrowUp"));
        assert!(matches(KeyChord::new("Escape").shift(), "Shift+Escape"));
        assert!(matches(KeyChord::new(" "), "Space"));
        assert!(!matches(KeyChord::new("ArrowDown"), "ArrowUp"));
    }

    #[test]
    fn test_modifier_mismatch() {
        assert!(!matches(KeyChord::new("c").ctrl(), "Ctrl+Shift+C"));
        assert!(!matches(KeyChord::new("c").ctrl().shift(), "Ctrl+C"));
        assert!(!matches(KeyChord::new("Tab").ctrl(), "Tab"));
        assert!(!matches(KeyChord::new("b").ctrl().alt(), "Ctrl+B"));
    }

    #[test]
    fn test_cmd_or_ctrl_follows_platform() {
        assert!(matches(KeyChord::new("v").cmd_or_ctrl(), "CmdOrCtrl+V"));
        #[cfg(not(target_os = "macos"))]
        assert!(!matches(KeyChord::new("v").meta(), "CmdOrCtrl+V"));
        #[cfg(target_os = "macos")]
        assert!(!matches(KeyChord::new("v").ctrl(), "CmdOrCtrl+V"));
    }

    #[test]
    fn test_unknown_multi_char_key_never_matches() {
        assert!(!matches(KeyChord::new("Unidentified"), "U"));
        assert!(!matches(KeyChord::new(""), "A"));
    }
}
