//! Interactive line-mode front end for a session.
//!
//! Reads commands from stdin, feeds them to the session event loop, and
//! prints the active tab's new output as it arrives. Lines starting with `:`
//! are session commands rather than shell commands.

use crate::cli::RuntimeOptions;
use crate::config::Config;
use crate::keybindings::ShortcutAction;
use crate::persistence;
use crate::session::{EventBus, InputEvent, Services, SessionEvent, SessionOrchestrator};
use crate::split::Orientation;
use crate::tab::{TabId, TabKind};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tokio::sync::{broadcast, mpsc};

const META_HELP: &str = "\
:new [kind]        open a tab (console, file, git, package, build, test, deploy, debug, network)
:close             close the active tab
:closeall          close every tab but one console
:split <h|v|g>     open a split
:next / :prev      switch tabs
:theme             cycle the theme
:layout <id>       select a layout
:stats             show telemetry
:quit              exit";

/// Main application state
pub struct App {
    config: Config,
    options: RuntimeOptions,
    runtime: Arc<Runtime>,
}

impl App {
    /// Load configuration and prepare the session.
    pub fn new(runtime: Arc<Runtime>, options: RuntimeOptions) -> Result<Self> {
        let config = match &options.config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
        .context("Failed to load configuration")?;
        crate::debug::apply_config_level(config.log_level.to_level_filter());

        Ok(Self {
            config,
            options,
            runtime,
        })
    }

    /// Run until stdin closes or `:quit`.
    pub fn run(self) -> Result<()> {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.run_session())
    }

    fn persistence_enabled(&self, configured: bool) -> bool {
        configured && !self.options.no_persist
    }

    async fn run_session(self) -> Result<()> {
        let bus = EventBus::default();
        let mut session = SessionOrchestrator::new(&self.config, Services::builtin(), bus.clone());

        if self.persistence_enabled(self.config.persist_history)
            && let Err(e) =
                persistence::load_history(session.tabs_mut().history_mut(), &Config::history_path())
        {
            log::warn!("Could not load command history: {}", e);
        }
        if self.persistence_enabled(self.config.persist_telemetry)
            && let Err(e) =
                persistence::load_telemetry(session.telemetry_mut(), &Config::telemetry_path())
        {
            log::warn!("Could not load telemetry: {}", e);
        }

        let printer = tokio::spawn(print_output(
            bus.subscribe(),
            session.tabs().active_tab_id(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_stdin(tx));

        println!("par-shell {} - type :help for session commands", crate::VERSION);
        let mut session = session.run(rx).await;
        reader.abort();
        printer.abort();

        self.save(&mut session)
    }

    fn save(&self, session: &mut SessionOrchestrator) -> Result<()> {
        if self.persistence_enabled(self.config.persist_history) {
            persistence::save_history(session.tabs_mut().history_mut(), &Config::history_path())
                .context("Failed to save command history")?;
        }
        if self.persistence_enabled(self.config.persist_telemetry) {
            persistence::save_telemetry(session.telemetry_mut(), &Config::telemetry_path())
                .context("Failed to save telemetry")?;
        }
        Ok(())
    }
}

/// Turn one line of stdin into session input.
///
/// `Err` carries a message for the user instead of an event.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, String> {
    let line = line.trim();
    let Some(meta) = line.strip_prefix(':') else {
        return Ok((!line.is_empty()).then(|| InputEvent::Submit(line.to_string())));
    };

    let mut parts = meta.split_whitespace();
    let command = parts.next().unwrap_or("");
    let arg = parts.next();
    let event = match command {
        "new" => {
            let kind = match arg {
                Some(kind) => kind.parse::<TabKind>()?,
                None => TabKind::Console,
            };
            InputEvent::CreateTab(kind)
        }
        "close" => InputEvent::Shortcut(ShortcutAction::CloseTab),
        "closeall" => InputEvent::Shortcut(ShortcutAction::CloseAllTabs),
        "split" => {
            let orientation = arg.unwrap_or("h").parse::<Orientation>()?;
            InputEvent::Shortcut(match orientation {
                Orientation::Horizontal => ShortcutAction::SplitHorizontal,
                Orientation::Vertical => ShortcutAction::SplitVertical,
                Orientation::Grid => ShortcutAction::SplitGrid,
            })
        }
        "next" => InputEvent::Shortcut(ShortcutAction::NextTab),
        "prev" => InputEvent::Shortcut(ShortcutAction::PreviousTab),
        "theme" => InputEvent::Shortcut(ShortcutAction::CycleTheme),
        "layout" => match arg {
            Some(layout) => InputEvent::SelectLayout(layout.to_string()),
            None => return Err("usage: :layout <id>".to_string()),
        },
        "stats" => InputEvent::ShowStats,
        "quit" | "q" => InputEvent::Shutdown,
        "help" => return Err(META_HELP.to_string()),
        other => return Err(format!("unknown session command ':{other}' (try :help)")),
    };
    Ok(Some(event))
}

async fn read_stdin(tx: mpsc::UnboundedSender<InputEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_line(&line) {
                Ok(Some(event)) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(message) => println!("{message}"),
            },
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }
    let _ = tx.send(InputEvent::Shutdown);
}

/// Print output of the active tab and tab changes.
async fn print_output(mut events: broadcast::Receiver<SessionEvent>, mut active: Option<TabId>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Output printer skipped {} events", skipped);
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        match event {
            SessionEvent::OutputAppended { tab, lines } if Some(tab) == active => {
                for line in lines {
                    println!("[{}] {}", line.kind().label(), line.text());
                }
            }
            SessionEvent::TabActivated(tab) => {
                active = Some(tab);
                println!("-- switched to tab {tab}");
            }
            SessionEvent::TabClosed(tab) => println!("-- closed tab {tab}"),
            SessionEvent::SplitCreated(split) => println!("-- opened split {split}"),
            SessionEvent::ThemeChanged(theme) => println!("-- theme: {theme}"),
            SessionEvent::LayoutChanged(layout) => println!("-- layout: {layout}"),
            SessionEvent::OutputCleared(tab) if Some(tab) == active => println!("-- cleared"),
            SessionEvent::ActionRejected(reason) => println!("-- ignored: {reason}"),
            _ => {}
        }
    }
}
