//! Logging infrastructure for par-shell
//!
//! Routes every `log::info!()` etc. to a debug log file in the temp dir
//! (`par_shell_debug.log`) so log output never interleaves with the
//! interactive prompt. When `RUST_LOG` is set, lines are mirrored to stderr.
//!
//! Level precedence: `--log-level` on the command line, then `RUST_LOG`,
//! then `log_level` from the config file (applied once it is loaded).

use chrono::Utc;
use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Panic in debug builds, log an error in release builds.
///
/// For "this shouldn't happen" invariants that must not take the session
/// down in production.
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            let backtrace = std::backtrace::Backtrace::capture();
            log::error!("{}\n{:?}", format_args!($($fmt_arg)*), backtrace);
        }
    };
}

struct LogBridge {
    file: Option<Mutex<File>>,
    mirror_stderr: bool,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = &self.file {
            let mut file = file.lock();
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Set when the level came from the CLI or `RUST_LOG`; the config level is
/// then ignored.
static LEVEL_OVERRIDDEN: AtomicBool = AtomicBool::new(false);

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("par_shell_debug.log")
}

fn env_level() -> Option<LevelFilter> {
    let value = std::env::var("RUST_LOG").ok()?;
    // Only a bare level is understood; module filters fall back to info.
    Some(value.trim().parse().unwrap_or(LevelFilter::Info))
}

fn open_log_file() -> Option<File> {
    let path = log_path();
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
        .ok()?;
    let rule = "=".repeat(80);
    let _ = writeln!(
        file,
        "{rule}\npar-shell session started at {}\n{rule}",
        timestamp()
    );
    Some(file)
}

/// Install the log bridge. Safe to call more than once; only the first
/// call installs a logger.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env = env_level();
    let level = cli_level.or(env);
    LEVEL_OVERRIDDEN.store(level.is_some(), Ordering::Relaxed);

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        file: open_log_file().map(Mutex::new),
        mirror_stderr: env.is_some(),
    });
    if log::set_logger(bridge).is_err() {
        return;
    }
    log::set_max_level(level.unwrap_or(LevelFilter::Warn));
}

/// Apply the level from the config file unless the CLI or `RUST_LOG`
/// already chose one.
pub fn apply_config_level(level: LevelFilter) {
    if LEVEL_OVERRIDDEN.load(Ordering::Relaxed) {
        return;
    }
    log::set_max_level(level);
    log::info!("Log level set to {} from config", level);
}
