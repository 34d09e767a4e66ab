//! Platform-specific keybinding resolution and key name tables.

use crate::parser::NamedKey;

/// Resolve the `CmdOrCtrl` modifier for the current platform.
///
/// Returns `(expected_ctrl, expected_meta)` given a `cmd_or_ctrl` flag and the
/// raw `ctrl`/`meta` values from the parsed combo.
///
/// - macOS: `CmdOrCtrl` maps to Meta (Cmd key).
/// - All other platforms: `CmdOrCtrl` maps to Ctrl.
#[inline]
pub fn resolve_cmd_or_ctrl(cmd_or_ctrl: bool, ctrl: bool, meta: bool) -> (bool, bool) {
    if cmd_or_ctrl {
        #[cfg(target_os = "macos")]
        {
            (ctrl, true)
        }
        #[cfg(not(target_os = "macos"))]
        {
            (true, meta)
        }
    } else {
        (ctrl, meta)
    }
}

/// Parse a named key string into a [`NamedKey`].
///
/// Matching is case-insensitive and accepts common aliases (`Esc`,
/// `Return`, `Up`, `PgDn`). Returns `None` for unrecognised strings.
pub fn parse_named_key(s: &str) -> Option<NamedKey> {
    match s.to_lowercase().as_str() {
        "f1" => Some(NamedKey::F1),
        "f2" => Some(NamedKey::F2),
        "f3" => Some(NamedKey::F3),
        "f4" => Some(NamedKey::F4),
        "f5" => Some(NamedKey::F5),
        "f6" => Some(NamedKey::F6),
        "f7" => Some(NamedKey::F7),
        "f8" => Some(NamedKey::F8),
        "f9" => Some(NamedKey::F9),
        "f10" => Some(NamedKey::F10),
        "f11" => Some(NamedKey::F11),
        "f12" => Some(NamedKey::F12),

        "enter" | "return" => Some(NamedKey::Enter),
        "escape" | "esc" => Some(NamedKey::Escape),
        "space" => Some(NamedKey::Space),
        "tab" => Some(NamedKey::Tab),
        "backspace" => Some(NamedKey::Backspace),
        "delete" | "del" => Some(NamedKey::Delete),
        "insert" | "ins" => Some(NamedKey::Insert),
        "home" => Some(NamedKey::Home),
        "end" => Some(NamedKey::End),
        "pageup" | "pgup" => Some(NamedKey::PageUp),
        "pagedown" | "pgdn" => Some(NamedKey::PageDown),

        "arrowup" | "up" => Some(NamedKey::ArrowUp),
        "arrowdown" | "down" => Some(NamedKey::ArrowDown),
        "arrowleft" | "left" => Some(NamedKey::ArrowLeft),
        "arrowright" | "right" => Some(NamedKey::ArrowRight),

        _ => None,
    }
}

/// Map punctuation aliases that cannot be written literally inside a
/// `+`-separated combo string.
pub fn parse_char_alias(s: &str) -> Option<char> {
    match s.to_lowercase().as_str() {
        "plus" => Some('+'),
        "minus" => Some('-'),
        "comma" => Some(','),
        "period" => Some('.'),
        "equal" | "equals" => Some('='),
        "slash" => Some('/'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_modifiers_pass_through() {
        assert_eq!(resolve_cmd_or_ctrl(false, true, false), (true, false));
        assert_eq!(resolve_cmd_or_ctrl(false, false, true), (false, true));
    }

    #[test]
    #[cfg(not(target_os = "macos"))]
    fn test_cmd_or_ctrl_is_ctrl_off_macos() {
        assert_eq!(resolve_cmd_or_ctrl(true, false, false), (true, false));
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn test_cmd_or_ctrl_is_meta_on_macos() {
        assert_eq!(resolve_cmd_or_ctrl(true, false, false), (false, true));
    }

    #[test]
    fn test_named_key_aliases() {
        assert_eq!(parse_named_key("Esc"), Some(NamedKey::Escape));
        assert_eq!(parse_named_key("RETURN"), Some(NamedKey::Enter));
        assert_eq!(parse_named_key("up"), Some(NamedKey::ArrowUp));
        assert_eq!(parse_named_key("f13"), None);
    }

    #[test]
    fn test_char_aliases() {
        assert_eq!(parse_char_alias("Comma"), Some(','));
        assert_eq!(parse_char_alias("Minus"), Some('-'));
        assert_eq!(parse_char_alias("x"), None);
    }
}
