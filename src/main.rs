use anyhow::Result;
use par_shell::app::App;
use par_shell::cli;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    // Routes all log::info!() etc. to the debug log file; mirrors to stderr
    // when RUST_LOG is set. The config level is applied once it is loaded.
    par_shell::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting par-shell {}", par_shell::VERSION);

    let runtime = Arc::new(Runtime::new()?);
    let app = App::new(Arc::clone(&runtime), runtime_options)?;
    let result = app.run();

    log::info!("Session exited, shutting down runtime");
    if let Ok(rt) = Arc::try_unwrap(runtime) {
        rt.shutdown_timeout(std::time::Duration::from_secs(2));
    }

    if let Err(ref e) = result {
        eprintln!("par-shell: error: {e:#}");
    }
    result
}
