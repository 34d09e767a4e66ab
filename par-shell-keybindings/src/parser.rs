//! Key combination parser.
//!
//! Parses human-readable key strings like "Ctrl+Shift+B" into KeyCombo structs.

use crate::platform::{parse_char_alias, parse_named_key, resolve_cmd_or_ctrl};
use std::fmt;
use thiserror::Error;

/// Error type for key parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty key combination")]
    Empty,
    #[error("Key combination ends with modifier, no key specified")]
    MissingKey,
    #[error("Multiple keys specified: already have key, found '{0}'")]
    MultipleKeys(String),
    #[error("Unknown key: '{0}'")]
    UnknownKey(String),
    #[error("Unknown action: '{0}'")]
    UnknownAction(String),
}

/// Named (non-printable) keys a binding can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Escape,
    Tab,
    Space,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
}

/// Set of active modifiers for a key combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// If true, this represents CmdOrCtrl (Cmd on macOS, Ctrl elsewhere)
    pub cmd_or_ctrl: bool,
}

impl Modifiers {
    /// Fold `cmd_or_ctrl` into the concrete modifier for this platform.
    pub fn resolved(self) -> Self {
        let (ctrl, meta) = resolve_cmd_or_ctrl(self.cmd_or_ctrl, self.ctrl, self.meta);
        Self {
            ctrl,
            meta,
            cmd_or_ctrl: false,
            ..self
        }
    }
}

/// The actual key (either a character or a named key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character key, stored uppercased (e.g., 'A', '1', '=')
    Character(char),
    Named(NamedKey),
}

/// A parsed key combination (modifiers + key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

impl KeyCombo {
    /// The combo as it fires on this platform, with `CmdOrCtrl` expanded.
    pub fn resolved(&self) -> Self {
        Self {
            modifiers: self.modifiers.resolved(),
            key: self.key,
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.cmd_or_ctrl {
            parts.push("CmdOrCtrl".to_string());
        }
        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        if self.modifiers.meta {
            parts.push("Meta".to_string());
        }

        match &self.key {
            ParsedKey::Character(c) => parts.push(c.to_string()),
            ParsedKey::Named(n) => parts.push(format!("{:?}", n)),
        }

        write!(f, "{}", parts.join("+"))
    }
}

/// Parse a key combination string into a KeyCombo.
///
/// Supported format: "Modifier+Modifier+Key"
///
/// Modifiers:
/// - `Ctrl`, `Control`
/// - `Alt`, `Option`
/// - `Shift`
/// - `Meta`, `Super`, `Cmd`, `Command`, `Win`
/// - `CmdOrCtrl` - Cmd on macOS, Ctrl on other platforms
///
/// Keys:
/// - Single characters: `A`, `1`, `=`, etc.
/// - Named keys: `F1`-`F12`, `Enter`, `Escape`, `Tab`, arrows, etc.
/// - Punctuation aliases: `Plus`, `Minus`, `Comma`, `Period`, `Equal`, `Slash`
pub fn parse_key_combo(s: &str) -> Result<KeyCombo, ParseError> {
    if s.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let parts: Vec<&str> = s.split('+').map(str::trim).collect();

    let mut modifiers = Modifiers::default();
    let mut key_part = None;

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1;

        let is_modifier = match part.to_lowercase().as_str() {
            "ctrl" | "control" => {
                modifiers.ctrl = true;
                true
            }
            "alt" | "option" => {
                modifiers.alt = true;
                true
            }
            "shift" => {
                modifiers.shift = true;
                true
            }
            "meta" | "super" | "cmd" | "command" | "win" => {
                modifiers.meta = true;
                true
            }
            "cmdorctrl" => {
                modifiers.cmd_or_ctrl = true;
                true
            }
            _ => false,
        };

        if !is_modifier {
            if part.is_empty() {
                return Err(ParseError::UnknownKey(s.to_string()));
            }
            if key_part.is_some() {
                return Err(ParseError::MultipleKeys(part.to_string()));
            }
            key_part = Some(*part);
        } else if is_last {
            return Err(ParseError::MissingKey);
        }
    }

    let key_str = key_part.ok_or(ParseError::MissingKey)?;
    let key = parse_key(key_str)?;

    Ok(KeyCombo { modifiers, key })
}

/// Parse a key string into a ParsedKey.
pub(crate) fn parse_key(s: &str) -> Result<ParsedKey, ParseError> {
    if let Some(named) = parse_named_key(s) {
        return Ok(ParsedKey::Named(named));
    }

    if let Some(c) = parse_char_alias(s) {
        return Ok(ParsedKey::Character(c));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(ParsedKey::Character(c.to_ascii_uppercase())),
        _ => Err(ParseError::UnknownKey(s.to_string())),
    }
}
