//! Folio TUI - terminal admin panel for portfolio projects
//!
//! Browse, create, edit and delete the projects held by the PHP record
//! store. Requests run on a background runtime so the panel keeps drawing
//! while they are in flight; logs go to a file in the config directory.

mod app;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::config::Config;
use folio_core::store::HttpProjectStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info};

use app::{Action, App, Request, Response};

const LOG_FILE: &str = "folio-tui.log";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let config = Config::load()?;
    let store = Arc::new(HttpProjectStore::from_config(&config.backend)?);
    let runtime = Runtime::new()?;
    let mut app = App::new(
        config.backend.base_url.clone(),
        config.assets.root_url.clone(),
    );
    info!(base_url = %config.backend.base_url, "Starting folio-tui");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &runtime, &store, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "Panel exited with error");
    }
    result
}

fn init_logging() -> anyhow::Result<()> {
    let dir = Config::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("folio=info".parse()?),
        )
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &Runtime,
    store: &Arc<HttpProjectStore>,
    app: &mut App,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(runtime, store, &tx, app.start());

    loop {
        terminal.draw(|frame| ui::draw(frame, &*app))?;

        while let Ok(response) = rx.try_recv() {
            if let Some(next) = app.apply(response) {
                dispatch(runtime, store, &tx, next);
            }
        }

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.handle_key(key) {
                    Action::Quit => return Ok(()),
                    Action::Send(request) => dispatch(runtime, store, &tx, request),
                    Action::None => {}
                }
            }
        }
    }
}

fn dispatch(
    runtime: &Runtime,
    store: &Arc<HttpProjectStore>,
    tx: &UnboundedSender<Response>,
    request: Request,
) {
    let store = Arc::clone(store);
    let tx = tx.clone();
    runtime.spawn(async move {
        let response = app::execute(store.as_ref(), request).await;
        // Receiver is gone once the panel has quit
        let _ = tx.send(response);
    });
}
