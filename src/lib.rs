// Library exports for testing and potential library use
//
// # Ownership Policy
//
// The tab set, split layout, and global history are owned by `TabManager`
// and mutated only through it. The session orchestrator owns the tab
// manager and the telemetry aggregator; nothing else holds them.
//
//   - Work that outlives one event (command execution, timers) runs in
//     tokio tasks and reports back over channels. It never holds a
//     reference into session state.
//
//   - `parking_lot::Mutex` is used for small sync-only shared state (idle
//     timer instant, in-memory clipboard, log file).

/// Application version (root crate version, for use by sub-crates).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod app;
pub mod autocomplete;
pub mod cli;
pub mod command_history;
pub mod config {
    //! Configuration re-exports from the par-shell-config crate.
    pub use par_shell_config::*;
}
pub mod error;
pub mod keybindings {
    //! Shortcut resolution re-exports from the par-shell-keybindings crate.
    pub use par_shell_keybindings::*;
}
pub mod output_buffer;
pub mod persistence;
pub mod session;
pub mod split;
pub mod tab;
pub mod telemetry;
pub mod timers;
pub mod traits;
pub mod traits_impl;
