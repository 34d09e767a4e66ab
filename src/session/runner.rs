//! Async event loop for a session.

use super::{CompletedCommand, InputEvent, SessionOrchestrator};
use crate::timers::Ticker;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

/// How long shutdown waits for commands still in flight.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

impl SessionOrchestrator {
    /// Drive the session until `Shutdown` arrives or the input channel closes.
    ///
    /// Commands run as tasks in a [`JoinSet`] owned by the loop, so input
    /// keeps flowing while one is in flight. On exit the timers stop first,
    /// then running commands get [`SHUTDOWN_GRACE`] to finish and have their
    /// results applied; anything still running after that is aborted.
    /// Returns the session so the caller can persist its state.
    pub async fn run(mut self, mut input: mpsc::UnboundedReceiver<InputEvent>) -> Self {
        let (timer_tx, mut timers) = mpsc::unbounded_channel();
        let mut ticker = Ticker::start(self.metrics_interval, self.idle_timeout, timer_tx);
        let mut commands: JoinSet<CompletedCommand> = JoinSet::new();

        log::info!("Session event loop started");
        loop {
            tokio::select! {
                event = input.recv() => {
                    let Some(event) = event else { break };
                    if event == InputEvent::Shutdown {
                        break;
                    }
                    ticker.touch();
                    if let Some(pending) = self.handle_input(event) {
                        commands.spawn(pending.run());
                    }
                }
                Some(joined) = commands.join_next() => self.finish_command(joined),
                Some(timer) = timers.recv() => self.handle_timer(timer),
            }
        }

        ticker.stop();
        self.drain_commands(&mut commands).await;
        log::info!("Session event loop stopped");
        self
    }

    fn finish_command(&mut self, joined: Result<CompletedCommand, JoinError>) {
        match joined {
            Ok(done) => self.complete_submission(done),
            Err(e) if e.is_cancelled() => log::debug!("Command task cancelled"),
            Err(e) => log::error!("Command task failed: {}", e),
        }
    }

    async fn drain_commands(&mut self, commands: &mut JoinSet<CompletedCommand>) {
        if commands.is_empty() {
            return;
        }
        log::info!("Waiting for {} running command(s)", commands.len());
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while let Some(joined) = commands.join_next().await {
                self.finish_command(joined);
            }
        })
        .await;

        if drained.is_err() {
            log::warn!("Aborting {} command(s) still running at shutdown", commands.len());
            commands.abort_all();
            while commands.join_next().await.is_some() {}
        }
    }
}
