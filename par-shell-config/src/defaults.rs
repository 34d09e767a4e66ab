//! Default values for `Config` fields.

use crate::types::{KeyBinding, LogLevel};

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_true() -> bool {
    true
}

// ── Buffers and history ────────────────────────────────────────────────────

pub fn max_output_lines() -> usize {
    1000
}

pub fn history_capacity() -> usize {
    500
}

pub fn global_history_capacity() -> usize {
    1000
}

pub fn telemetry_capacity() -> usize {
    1000
}

// ── Split layout ───────────────────────────────────────────────────────────

pub fn max_splits() -> usize {
    4
}

pub fn max_grid_splits() -> usize {
    3
}

/// Share of a grid split given to its first nested child, in percent.
pub fn grid_primary_share() -> f32 {
    60.0
}

// ── Timers ─────────────────────────────────────────────────────────────────

pub const MIN_METRICS_REFRESH_MS: u64 = 2000;
pub const MAX_METRICS_REFRESH_MS: u64 = 5000;

pub fn metrics_refresh_interval_ms() -> u64 {
    MIN_METRICS_REFRESH_MS
}

pub fn idle_hide_timeout_secs() -> u64 {
    60
}

// ── Session defaults ───────────────────────────────────────────────────────

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 32.0;

pub fn default_directory() -> String {
    "~".to_string()
}

pub fn theme() -> String {
    "dark".to_string()
}

pub fn layout() -> String {
    "default".to_string()
}

pub fn font_size() -> f32 {
    14.0
}

pub fn log_level() -> LogLevel {
    LogLevel::Warn
}

// ── Keybindings ────────────────────────────────────────────────────────────

/// Shortcuts that resolve only while no text input holds focus.
///
/// `CmdOrCtrl` is Cmd on macOS and Ctrl elsewhere. Copy uses the Shift
/// variant so that plain Ctrl+C stays free for the command-line interrupt.
pub fn global_keybindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("CmdOrCtrl+Shift+T", "new_tab"),
        KeyBinding::new("Ctrl+Tab", "next_tab"),
        KeyBinding::new("Ctrl+Shift+Tab", "previous_tab"),
        KeyBinding::new("CmdOrCtrl+Shift+D", "split_vertical"),
        KeyBinding::new("CmdOrCtrl+Shift+E", "split_horizontal"),
        KeyBinding::new("CmdOrCtrl+Shift+G", "split_grid"),
        KeyBinding::new("CmdOrCtrl+Shift+W", "close_tab"),
        KeyBinding::new("CmdOrCtrl+Shift+Q", "close_all_tabs"),
        KeyBinding::new("CmdOrCtrl+B", "toggle_file_tree"),
        KeyBinding::new("CmdOrCtrl+H", "toggle_history"),
        KeyBinding::new("CmdOrCtrl+F", "toggle_search"),
        KeyBinding::new("Shift+Escape", "clear_search"),
        KeyBinding::new("CmdOrCtrl+Comma", "toggle_settings"),
        KeyBinding::new("F1", "toggle_help"),
        KeyBinding::new("CmdOrCtrl+Shift+P", "toggle_performance"),
        KeyBinding::new("F12", "toggle_debug"),
        KeyBinding::new("CmdOrCtrl+Shift+K", "cycle_theme"),
        KeyBinding::new("CmdOrCtrl+=", "font_increase"),
        KeyBinding::new("CmdOrCtrl+Minus", "font_decrease"),
        KeyBinding::new("CmdOrCtrl+0", "font_reset"),
        KeyBinding::new("CmdOrCtrl+Shift+M", "toggle_maximize"),
        KeyBinding::new("F11", "toggle_fullscreen"),
        KeyBinding::new("CmdOrCtrl+Shift+J", "toggle_background_job"),
        KeyBinding::new("CmdOrCtrl+Shift+Z", "cancel_background_job"),
        KeyBinding::new("CmdOrCtrl+Shift+C", "copy_selection"),
        KeyBinding::new("CmdOrCtrl+L", "clear_active_tab"),
        KeyBinding::new("CmdOrCtrl+U", "clear_command_line"),
    ]
}

/// Shortcuts that resolve only while the command line holds focus.
pub fn command_line_keybindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("ArrowUp", "history_older"),
        KeyBinding::new("ArrowDown", "history_newer"),
        KeyBinding::new("Tab", "complete"),
        KeyBinding::new("Escape", "escape"),
        KeyBinding::new("CmdOrCtrl+V", "paste"),
        KeyBinding::new("Ctrl+C", "interrupt"),
        KeyBinding::new("Enter", "submit"),
    ]
}
