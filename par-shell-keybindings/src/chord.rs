//! Structured key events as delivered by the input layer.

/// A single key press with its modifier state.
///
/// `key` carries the logical key name the way a browser reports it:
/// a printable character (`"t"`, `"="`, `" "`) or a named key
/// (`"Enter"`, `"ArrowUp"`, `"F11"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    pub key: String,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl on Linux/Windows, Meta (Cmd) on macOS.
    pub fn cmd_or_ctrl(self) -> Self {
        #[cfg(target_os = "macos")]
        {
            self.meta()
        }
        #[cfg(not(target_os = "macos"))]
        {
            self.ctrl()
        }
    }
}

/// Which element currently owns keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusContext {
    /// No text input is focused; global shortcuts apply.
    #[default]
    None,
    /// The command line is focused; only command-line shortcuts apply.
    CommandLine,
    /// Some other text input (search box, rename field) is focused.
    OtherTextInput,
}
