//! Binary entry point: resolve the file layout, start logging, open the
//! database, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use library_manager::logging::init_tracing;
use library_manager::{run_app, App, Config, LibraryController, SqliteConnector};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Logging is best effort; the UI still works without a log file.
    if let Err(err) = init_tracing(&config.log_path) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let connector = SqliteConnector::open(&config.db_path).with_context(|| {
        format!(
            "failed to open library database at {}",
            config.db_path.display()
        )
    })?;
    tracing::info!(db = %connector.path().display(), "starting library manager");

    let mut app = App::new(LibraryController::new(Box::new(connector)));
    run_app(&mut app)
}
