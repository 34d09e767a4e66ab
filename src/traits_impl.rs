//! Concrete implementations of the traits defined in [`crate::traits`].
//!
//! These back the `par-shell` binary: a small built-in command processor,
//! a directory provider over the real file system, the process environment,
//! and in-memory platform services for a headless session.

use crate::error::{ExecutionError, PlatformError};
use crate::output_buffer::OutputLine;
use crate::traits::{
    ClipboardService, CommandCatalog, CommandContext, CommandProcessor, CommandSpec, DirEntry,
    DirectoryProvider, EntryKind, EnvironmentProvider, FullscreenService, ProcessFuture,
    ThemeProvider,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::time::Duration;

/// Demo command processor with a handful of built-in commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinProcessor;

impl BuiltinProcessor {
    const HELP: &'static [(&'static str, &'static str)] = &[
        ("echo <text>", "print text"),
        ("pwd", "print the tab's working directory"),
        ("date", "print the current UTC time"),
        ("sleep <ms>", "wait, then report"),
        ("fail [message]", "fail with an execution error"),
        ("clear", "clear this tab"),
        ("history", "show this tab's history"),
    ];
}

impl CommandProcessor for BuiltinProcessor {
    fn process(&self, command: &str, context: &CommandContext) -> ProcessFuture {
        let command = command.trim().to_string();
        let directory = context.working_directory.clone();

        Box::pin(async move {
            let (name, rest) = match command.split_once(char::is_whitespace) {
                Some((name, rest)) => (name, rest.trim()),
                None => (command.as_str(), ""),
            };

            match name {
                "echo" => Ok(vec![OutputLine::success(rest)]),
                "pwd" => Ok(vec![OutputLine::success(directory)]),
                "date" => Ok(vec![OutputLine::success(
                    Utc::now().format("%a %b %e %H:%M:%S UTC %Y").to_string(),
                )]),
                "sleep" => {
                    let Ok(ms) = rest.parse::<u64>() else {
                        return Err(ExecutionError::Failed(format!("invalid duration '{rest}'")));
                    };
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(vec![OutputLine::info(format!("slept {ms} ms"))])
                }
                "fail" => Err(ExecutionError::Failed(if rest.is_empty() {
                    "command failed".to_string()
                } else {
                    rest.to_string()
                })),
                "help" => Ok(Self::HELP
                    .iter()
                    .map(|(usage, about)| OutputLine::info(format!("{usage:<16} {about}")))
                    .collect()),
                other => Err(ExecutionError::CommandNotFound(other.to_string())),
            }
        })
    }
}

/// Command catalog backed by a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticCommandCatalog {
    commands: Vec<CommandSpec>,
}

impl StaticCommandCatalog {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self { commands }
    }

    /// Catalog matching [`BuiltinProcessor`] plus common shell commands.
    pub fn builtin() -> Self {
        Self::new(vec![
            CommandSpec::new("echo", "Print text"),
            CommandSpec::new("pwd", "Print working directory"),
            CommandSpec::new("date", "Print the current time"),
            CommandSpec::new("sleep", "Wait for a number of milliseconds"),
            CommandSpec::new("fail", "Fail with an execution error"),
            CommandSpec::new("help", "List commands").with_alias("?"),
            CommandSpec::new("clear", "Clear the tab").with_alias("cls"),
            CommandSpec::new("history", "Show command history").with_alias("hist"),
            CommandSpec::new("git", "Version control").with_alias("g"),
            CommandSpec::new("ls", "List directory contents").with_alias("dir"),
            CommandSpec::new("cd", "Change directory"),
            CommandSpec::new("cat", "Print file contents"),
        ])
    }
}

impl CommandCatalog for StaticCommandCatalog {
    fn commands(&self) -> Vec<CommandSpec> {
        self.commands.clone()
    }
}

/// Directory provider over `std::fs`, expanding a leading `~`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirectoryProvider;

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~')
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest.trim_start_matches('/'));
    }
    PathBuf::from(path)
}

impl DirectoryProvider for FsDirectoryProvider {
    fn list(&self, path: &str) -> Result<Vec<DirEntry>, PlatformError> {
        let dir = expand_home(path);
        let read = std::fs::read_dir(&dir).map_err(|source| PlatformError::Directory {
            path: dir.clone(),
            source,
        })?;

        let mut entries: Vec<DirEntry> = read
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                Some(DirEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    kind: if metadata.is_dir() {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    },
                    size: metadata.len(),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Environment variables of the running process, sorted by name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentProvider for ProcessEnvironment {
    fn variables(&self) -> Vec<(String, String)> {
        let mut vars: Vec<(String, String)> = std::env::vars().collect();
        vars.sort();
        vars
    }
}

/// Fixed theme and layout lists with a remembered selection.
#[derive(Debug)]
pub struct StaticThemeProvider {
    themes: Vec<String>,
    layouts: Vec<String>,
    active: Mutex<Option<String>>,
}

impl StaticThemeProvider {
    pub fn new(themes: Vec<String>, layouts: Vec<String>) -> Self {
        Self {
            themes,
            layouts,
            active: Mutex::new(None),
        }
    }

    pub fn active(&self) -> Option<String> {
        self.active.lock().clone()
    }
}

impl Default for StaticThemeProvider {
    fn default() -> Self {
        let owned = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect();
        Self::new(
            owned(&["dark", "light", "solarized", "dracula", "nord"]),
            owned(&["default", "compact", "wide"]),
        )
    }
}

impl ThemeProvider for StaticThemeProvider {
    fn list_themes(&self) -> Vec<String> {
        self.themes.clone()
    }

    fn list_layouts(&self) -> Vec<String> {
        self.layouts.clone()
    }

    fn set_active(&self, id: &str) {
        log::debug!("Active theme set to {}", id);
        *self.active.lock() = Some(id.to_string());
    }
}

/// Process-local clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl ClipboardService for MemoryClipboard {
    fn copy(&self, text: &str) -> Result<(), PlatformError> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }

    fn paste(&self) -> Result<String, PlatformError> {
        self.contents
            .lock()
            .clone()
            .ok_or_else(|| PlatformError::Clipboard("clipboard is empty".to_string()))
    }
}

/// Fullscreen service for sessions without a display.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFullscreen;

impl FullscreenService for HeadlessFullscreen {
    fn enter(&self) -> Result<(), PlatformError> {
        Err(PlatformError::Fullscreen("no display attached".to_string()))
    }

    fn exit(&self) -> Result<(), PlatformError> {
        Err(PlatformError::Fullscreen("no display attached".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CommandContext {
        CommandContext {
            tab_id: 1,
            working_directory: "/work".to_string(),
            theme: "dark".to_string(),
        }
    }

    #[tokio::test]
    async fn test_builtin_commands() {
        let processor = BuiltinProcessor;
        let lines = processor.process("echo hello world", &context()).await.unwrap();
        assert_eq!(lines[0].text(), "hello world");

        let lines = processor.process("pwd", &context()).await.unwrap();
        assert_eq!(lines[0].text(), "/work");

        let err = processor.process("fail boom", &context()).await.unwrap_err();
        assert_eq!(err, ExecutionError::Failed("boom".to_string()));

        let err = processor.process("nope", &context()).await.unwrap_err();
        assert_eq!(err, ExecutionError::CommandNotFound("nope".to_string()));
    }

    #[test]
    fn test_fs_directory_provider_lists_sorted() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("b.txt"), "abc").unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();

        let entries = FsDirectoryProvider
            .list(&temp.path().to_string_lossy())
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].size, 3);
    }

    #[test]
    fn test_missing_directory_is_platform_error() {
        let result = FsDirectoryProvider.list("/definitely/not/here");
        assert!(matches!(result, Err(PlatformError::Directory { .. })));
    }

    #[test]
    fn test_memory_clipboard() {
        let clipboard = MemoryClipboard::default();
        assert!(clipboard.paste().is_err());
        clipboard.copy("ls -la").unwrap();
        assert_eq!(clipboard.paste().unwrap(), "ls -la");
    }
}
