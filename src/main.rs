use anyhow::Context;
use clap::Parser;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use todos::terminal::{self, TerminalGuard};
use todos::{config::Settings, logging, ui, App, FileStore};

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    logging::init(&settings.log_file, &settings.log_level)?;
    info!(data_dir = %settings.data_dir.display(), "starting");

    let mut app = App::new(FileStore::new(&settings.data_dir), settings.confirm_delete);
    let mut view = ui::View::new();
    view.attach(&mut app);
    app.hydrate();

    // Terminal setup; the guard restores it on every exit path
    terminal::install_panic_hook();
    let guard = TerminalGuard::enter(io::stdout()).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let result = ui::run_app(&mut terminal, &mut app, &mut view, settings.tick());

    // Restore terminal
    drop(guard);

    result.context("running todo list")?;
    info!(items = app.todos().len(), "exiting");
    Ok(())
}
