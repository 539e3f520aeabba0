use anyhow::{Context, Result};
use app::App;
use config::Config;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;

mod app;
mod config;
mod connector;
mod editor;
mod error;
mod file_tree;
mod highlighting;
mod input;
mod resource_path;
mod sync;
mod theme;
mod ui;

fn main() -> Result<()> {
    // Logs go to stderr; raise with RUST_LOG=info
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let root = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir().context("reading current directory")?,
    };
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let config = Config::load();
    // First run: leave an editable copy of the defaults behind
    if Config::config_path().map_or(false, |p| !p.exists()) {
        if let Err(e) = config.save() {
            log::warn!("could not write default config: {e:#}");
        }
    }

    // Open the resource root before touching the terminal so errors print normally
    let mut app = App::new(config, root)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }

    Ok(())
}
