//! Shared integration test helpers for par-shell.
//!
//! Fakes for every collaborator trait plus factory functions for sessions
//! wired to them.
//!
//! ```ignore
//! mod common;
//! use common::{test_session, FakeCatalog};
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers is used per file.

#![allow(dead_code)]

use par_shell::config::Config;
use par_shell::error::{ExecutionError, PlatformError};
use par_shell::output_buffer::OutputLine;
use par_shell::session::{EventBus, Services, SessionOrchestrator};
use par_shell::traits::{
    ClipboardService, CommandCatalog, CommandContext, CommandProcessor, CommandSpec, DirEntry,
    DirectoryProvider, EntryKind, EnvironmentProvider, FullscreenService, ProcessFuture,
    ThemeProvider,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Processor that echoes the command, or fails for commands starting with `fail`.
#[derive(Debug, Default)]
pub struct FakeProcessor;

impl CommandProcessor for FakeProcessor {
    fn process(&self, command: &str, context: &CommandContext) -> ProcessFuture {
        let command = command.to_string();
        let tab = context.tab_id;
        Box::pin(async move {
            if command.starts_with("fail") {
                Err(ExecutionError::Failed(format!("{command} failed")))
            } else {
                Ok(vec![OutputLine::success(format!("tab {tab}: {command}"))])
            }
        })
    }
}

/// Processor that reports the theme it was handed.
#[derive(Debug, Default)]
pub struct ThemeEchoProcessor;

impl CommandProcessor for ThemeEchoProcessor {
    fn process(&self, _command: &str, context: &CommandContext) -> ProcessFuture {
        let theme = context.theme.clone();
        Box::pin(async move { Ok(vec![OutputLine::info(format!("theme {theme}"))]) })
    }
}

/// Processor that answers after a fixed delay.
#[derive(Debug)]
pub struct SlowProcessor(pub Duration);

impl CommandProcessor for SlowProcessor {
    fn process(&self, command: &str, _context: &CommandContext) -> ProcessFuture {
        let command = command.to_string();
        let delay = self.0;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(vec![OutputLine::success(format!("{command} done"))])
        })
    }
}

/// Catalog with `git` (alias `g`), `given`, and `ls` (alias `gils`).
#[derive(Debug, Clone)]
pub struct FakeCatalog(pub Vec<CommandSpec>);

impl Default for FakeCatalog {
    fn default() -> Self {
        Self(vec![
            CommandSpec::new("git", "Version control").with_alias("g"),
            CommandSpec::new("given", "A given command"),
            CommandSpec::new("ls", "List").with_alias("gils"),
        ])
    }
}

impl CommandCatalog for FakeCatalog {
    fn commands(&self) -> Vec<CommandSpec> {
        self.0.clone()
    }
}

/// Directory listings keyed by path.
#[derive(Debug, Default, Clone)]
pub struct FakeDirectories(pub HashMap<String, Vec<DirEntry>>);

impl FakeDirectories {
    pub fn with(mut self, path: &str, entries: &[(&str, EntryKind)]) -> Self {
        self.0.insert(
            path.to_string(),
            entries
                .iter()
                .map(|(name, kind)| DirEntry {
                    name: name.to_string(),
                    kind: *kind,
                    size: 42,
                })
                .collect(),
        );
        self
    }
}

impl DirectoryProvider for FakeDirectories {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, PlatformError> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| PlatformError::Directory {
                path: path.into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeEnvironment(pub Vec<(String, String)>);

impl FakeEnvironment {
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.push((name.to_string(), value.to_string()));
        self
    }
}

impl EnvironmentProvider for FakeEnvironment {
    fn variables(&self) -> Vec<(String, String)> {
        self.0.clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeThemes {
    pub activated: Mutex<Vec<String>>,
}

impl ThemeProvider for FakeThemes {
    fn list_themes(&self) -> Vec<String> {
        vec!["dark".to_string(), "light".to_string(), "nord".to_string()]
    }

    fn list_layouts(&self) -> Vec<String> {
        vec!["default".to_string(), "compact".to_string()]
    }

    fn set_active(&self, id: &str) {
        self.activated.lock().push(id.to_string());
    }
}

/// Clipboard that always fails.
#[derive(Debug, Default)]
pub struct BrokenClipboard;

impl ClipboardService for BrokenClipboard {
    fn copy(&self, _text: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Clipboard("permission denied".to_string()))
    }

    fn paste(&self) -> Result<String, PlatformError> {
        Err(PlatformError::Clipboard("permission denied".to_string()))
    }
}

/// Clipboard that records copies and pastes fixed text.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    pub copied: Mutex<Vec<String>>,
}

impl ClipboardService for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), PlatformError> {
        self.copied.lock().push(text.to_string());
        Ok(())
    }

    fn paste(&self) -> Result<String, PlatformError> {
        Ok("pasted".to_string())
    }
}

#[derive(Debug, Default)]
pub struct FakeFullscreen {
    pub fail: bool,
}

impl FullscreenService for FakeFullscreen {
    fn enter(&self) -> Result<(), PlatformError> {
        if self.fail {
            Err(PlatformError::Fullscreen("not supported".to_string()))
        } else {
            Ok(())
        }
    }

    fn exit(&self) -> Result<(), PlatformError> {
        self.enter()
    }
}

/// Services wired entirely to fakes.
pub fn test_services() -> Services {
    Services {
        processor: Arc::new(FakeProcessor),
        catalog: Arc::new(FakeCatalog::default()),
        directories: Arc::new(
            FakeDirectories::default()
                .with("/work", &[("src", EntryKind::Directory), ("main.rs", EntryKind::File)]),
        ),
        environment: Arc::new(FakeEnvironment::default().with("HOME", "/root")),
        themes: Arc::new(FakeThemes::default()),
        clipboard: Arc::new(RecordingClipboard::default()),
        fullscreen: Arc::new(FakeFullscreen::default()),
    }
}

/// Config whose tabs start in `/work`.
pub fn test_config() -> Config {
    Config::default().with_default_directory("/work")
}

pub fn test_session() -> SessionOrchestrator {
    SessionOrchestrator::new(&test_config(), test_services(), EventBus::default())
}

pub fn test_session_with(services: Services) -> (SessionOrchestrator, EventBus) {
    let bus = EventBus::default();
    (
        SessionOrchestrator::new(&test_config(), services, bus.clone()),
        bus,
    )
}
