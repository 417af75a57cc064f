use std::{fs::OpenOptions, path::Path, sync::{Arc, Mutex}, time::Duration};

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing_subscriber::EnvFilter;

use todo_app::{
    application::todo_api::TodoApi,
    config::ClientConfig,
    domain::remote::TodoRemote,
    infrastructure::rest_remote::RestTodoRemote,
    ui::{app::{execute as run_command, App, Command, Control, Outcome}, view},
};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = ClientConfig::from_env();
    init_logging(&config.log_file)?;
    tracing::info!(api_url = %config.api_url, "starting");
    let api = Arc::new(TodoApi::new(RestTodoRemote::new(&config.api_url)));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, api, &config.api_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

/// Logs go to a file; stdout belongs to the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app<R: TodoRemote>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, api: Arc<TodoApi<R>>, api_url: &str) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new();
    spawn_command(&api, &tx, app.start());

    loop {
        while let Ok(outcome) = rx.try_recv() {
            if let Some(follow_up) = app.apply(outcome) {
                spawn_command(&api, &tx, follow_up);
            }
        }
        terminal.draw(|f| view::draw(f, &mut app, api_url))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                match app.handle_key(key) {
                    Control::Quit => break,
                    Control::Run(command) => spawn_command(&api, &tx, command),
                    Control::Continue => {}
                }
            }
        }
    }
    tracing::info!(pending = app.in_flight, "quit");
    Ok(())
}

/// Runs `command` off the render loop; the outcome comes back through `tx`.
fn spawn_command<R: TodoRemote>(api: &Arc<TodoApi<R>>, tx: &UnboundedSender<Outcome>, command: Command) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(run_command(&api, command).await);
    });
}
