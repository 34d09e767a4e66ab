//! Configuration system for the par-shell session multiplexer.
//!
//! This crate provides configuration loading, saving, and default values
//! for the shell. It includes:
//!
//! - The `Config` struct with buffer, history, split, and timer limits
//! - Default keybinding tables for the global and command-line scopes
//! - YAML persistence with atomic writes
//! - Typed `ConfigError` for callers that want to match on failures

pub mod config;
pub mod defaults;
mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{KeyBinding, LogLevel};
