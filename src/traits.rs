//! Shared trait definitions for par-shell collaborators.
//!
//! These traits are the seams between the session core and everything it
//! treats as external: command execution, the directory listing used by
//! autocomplete and file drops, themes, and platform services. The CLI
//! wires in the implementations from [`crate::traits_impl`]; tests wire in
//! fakes.

use crate::error::{ExecutionError, PlatformError};
use crate::output_buffer::OutputLine;
use crate::tab::TabId;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by a [`CommandProcessor`].
pub type ProcessFuture = Pin<Box<dyn Future<Output = Result<Vec<OutputLine>, ExecutionError>> + Send>>;

/// What a processor may know about the tab it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub tab_id: TabId,
    pub working_directory: String,
    pub theme: String,
}

// ── Command execution ──────────────────────────────────────────────────────

/// Turns a command string into output lines.
///
/// Implementations must be callable concurrently for different tabs; the
/// returned future owns everything it needs.
pub trait CommandProcessor: Send + Sync {
    fn process(&self, command: &str, context: &CommandContext) -> ProcessFuture;
}

// ── Autocomplete providers ─────────────────────────────────────────────────

/// Whether a directory entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

/// Lists directories for autocomplete and file-drop handling.
pub trait DirectoryProvider: Send + Sync {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, PlatformError>;
}

/// A command known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: description.into(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Source of command names for autocomplete.
pub trait CommandCatalog: Send + Sync {
    fn commands(&self) -> Vec<CommandSpec>;
}

/// Source of environment variables for `$` completion.
pub trait EnvironmentProvider: Send + Sync {
    /// `(name, value)` pairs in a stable order
    fn variables(&self) -> Vec<(String, String)>;
}

// ── Presentation and platform services ─────────────────────────────────────

/// Available themes and layouts. The core only stores the selected id.
pub trait ThemeProvider: Send + Sync {
    fn list_themes(&self) -> Vec<String>;
    fn list_layouts(&self) -> Vec<String>;
    fn set_active(&self, id: &str);
}

pub trait ClipboardService: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), PlatformError>;
    fn paste(&self) -> Result<String, PlatformError>;
}

pub trait FullscreenService: Send + Sync {
    fn enter(&self) -> Result<(), PlatformError>;
    fn exit(&self) -> Result<(), PlatformError>;
}
