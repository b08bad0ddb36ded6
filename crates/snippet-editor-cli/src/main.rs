mod app;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use snippet_editor_config::Config;
use snippet_editor_engine::models::seed;
use snippet_editor_engine::{Document, EditorSession, HotkeyMap, SnippetLists};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    process,
};

use app::App;

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    init_logging(&config)?;

    let hotkeys = HotkeyMap::from_names(config.hotkey_pairs())?;
    let lists = SnippetLists::seeded(config.snippets.available, config.snippets.selected);
    let session =
        EditorSession::new(Document::new(seed::welcome_blocks()), lists).with_hotkeys(hotkeys);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("editor loop failed: {err:?}");
        println!("{err:?}");
    }

    Ok(())
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging(config: &Config) -> Result<()> {
    let path = config
        .log_path
        .clone()
        .unwrap_or_else(|| env::temp_dir().join("snippet-editor.log"));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("snippet-editor starting up, logging to {}", path.display());
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && app.handle_key(key)
        {
            return Ok(());
        }
    }
}
