//! Command submission
//!
//! Submitting is split in two so other input can be handled while a command
//! runs: [`SessionOrchestrator::begin_submission`] records history and
//! returns a [`PendingCommand`], and
//! [`SessionOrchestrator::complete_submission`] applies its result later.
//! The result is matched to its tab by id, so a tab closed in the meantime
//! simply drops it.

use super::{SessionEvent, SessionOrchestrator};
use crate::error::ExecutionError;
use crate::output_buffer::OutputLine;
use crate::tab::TabId;
use crate::traits::{CommandContext, ProcessFuture};
use std::time::{Duration, Instant};

/// A command handed to the processor but not yet finished.
pub struct PendingCommand {
    pub tab: TabId,
    pub command: String,
    future: ProcessFuture,
}

impl PendingCommand {
    /// Await the processor.
    pub async fn run(self) -> CompletedCommand {
        let start = Instant::now();
        let result = self.future.await;
        CompletedCommand {
            tab: self.tab,
            command: self.command,
            result,
            elapsed: start.elapsed(),
        }
    }
}

impl std::fmt::Debug for PendingCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingCommand")
            .field("tab", &self.tab)
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

/// A processor result waiting to be applied.
#[derive(Debug)]
pub struct CompletedCommand {
    pub tab: TabId,
    pub command: String,
    pub result: Result<Vec<OutputLine>, ExecutionError>,
    pub elapsed: Duration,
}

/// Name a command is counted under in telemetry.
fn command_name(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or(command)
}

impl SessionOrchestrator {
    /// Record `text` in the active tab and start it.
    ///
    /// `clear` and `history` are handled here and return `None`, as does
    /// blank input.
    pub fn begin_submission(&mut self, text: &str) -> Option<PendingCommand> {
        let command = text.trim();
        if command.is_empty() {
            return None;
        }
        let tab = self.tabs.active_tab_id()?;

        self.autocomplete.dismiss();
        let _ = self.tabs.record_command(tab, command);
        if !self.search_query.is_empty() {
            self.refresh_search();
        }
        self.append_lines(tab, [OutputLine::system(format!("$ {command}"))]);

        match command {
            "clear" => {
                self.clear_tab_output(tab);
                self.telemetry.track_command("clear", 0.0, true);
                None
            }
            "history" => {
                let lines: Vec<OutputLine> = self
                    .tabs
                    .get_tab(tab)
                    .map(|t| {
                        t.history()
                            .entries()
                            .iter()
                            .enumerate()
                            .map(|(i, entry)| {
                                OutputLine::info(format!("{:>4}  {}", i + 1, entry.command))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                self.append_lines(tab, lines);
                self.telemetry.track_command("history", 0.0, true);
                None
            }
            _ => {
                let context = self.command_context(tab)?;
                log::debug!("Submitting '{}' in tab {}", command, tab);
                Some(PendingCommand {
                    tab,
                    command: command.to_string(),
                    future: self.services.processor.process(command, &context),
                })
            }
        }
    }

    /// Apply a finished command to its tab.
    pub fn complete_submission(&mut self, done: CompletedCommand) {
        let name = command_name(&done.command);
        let elapsed_ms = done.elapsed.as_secs_f64() * 1000.0;
        let success = done.result.is_ok();

        match &done.result {
            Ok(_) => self.telemetry.track_command(name, elapsed_ms, true),
            Err(e) => self
                .telemetry
                .track_command_failure(name, elapsed_ms, e.to_string()),
        }

        if !self.tabs.contains(done.tab) {
            log::debug!(
                "Dropping result of '{}': tab {} was closed",
                done.command,
                done.tab
            );
            return;
        }

        match done.result {
            Ok(lines) => self.append_lines(done.tab, lines),
            Err(e) => self.append_lines(done.tab, [OutputLine::error(e.to_string())]),
        }

        self.bus.publish(SessionEvent::CommandCompleted {
            tab: done.tab,
            command: done.command,
            success,
            elapsed_ms,
        });
    }

    /// Submit and wait for the result in place.
    pub async fn submit_and_wait(&mut self, text: &str) {
        if let Some(pending) = self.begin_submission(text) {
            let done = pending.run().await;
            self.complete_submission(done);
        }
    }

    fn command_context(&self, tab: TabId) -> Option<CommandContext> {
        let t = self.tabs.get_tab(tab)?;
        Some(CommandContext {
            tab_id: tab,
            working_directory: t.working_directory().to_string(),
            theme: t.theme().unwrap_or(&self.display.theme).to_string(),
        })
    }
}
