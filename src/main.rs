mod app;
mod config;
mod domain;
mod input;
mod notifications;
mod persistence;
mod session;
mod task_list;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::Parser;
use config::{Cli, Commands, Config};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{format_duration, list_rows, predicted_finish_time, status_glyph, time_remaining_today};
use notifications::StatusIndicator;
use persistence::{init_local_data_dir, RunningTaskPointer, TaskStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::SessionManager;
use std::io;
use std::path::Path;
use std::sync::Arc;
use task_list::TaskList;
use ticker::SystemClock;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.command == Some(Commands::Init) {
        let data_dir = init_local_data_dir()?;
        println!("Initialized focusly directory: {}", data_dir.display());
        println!();
        println!("Focusly will now use this local directory for task storage.");
        println!("Run 'focusly' to start tracking tasks.");
        return Ok(());
    }

    let config = Config::load(&cli)?;

    // Logs go to a file; the terminal belongs to the interface
    let _log_guard = init_logging(&config.log_level, &config.log_path);
    tracing::info!(data_dir = %config.data_dir.display(), "focusly starting");

    let result = match cli.command {
        Some(Commands::List) => print_list(&config),
        Some(Commands::Host) => run_host(&config).await,
        _ => run_tui(&config).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "focusly exiting with error");
    } else {
        tracing::info!("focusly exiting");
    }
    result
}

/// Initialize file-based logging
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// entries are flushed. `RUST_LOG` overrides the configured level.
fn init_logging(level: &str, log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Everything a session needs, opened from the data directory
struct Components {
    store: Arc<TaskStore>,
    indicator: Arc<StatusIndicator>,
    session: SessionManager,
}

fn open_components(config: &Config) -> Result<Components> {
    let store = Arc::new(
        TaskStore::open(&config.db_path)
            .with_context(|| format!("Failed to open task store: {}", config.db_path.display()))?,
    );
    let indicator = Arc::new(StatusIndicator::new(true));
    let session = SessionManager::new(
        Arc::clone(&store),
        RunningTaskPointer::new(&config.pointer_path),
        Arc::new(SystemClock),
        indicator.clone(),
    );
    Ok(Components {
        store,
        indicator,
        session,
    })
}

/// Print the task list with the same figures the list view shows
fn print_list(config: &Config) -> Result<()> {
    let store = TaskStore::open(&config.db_path)?;
    let tasks = store.all()?;
    let now = chrono::Local::now();

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for row in list_rows(&tasks) {
        let task = row.task;
        let finish = row
            .finish_offset
            .map(|offset| format!("  finish by {}", predicted_finish_time(now, offset)))
            .unwrap_or_default();
        println!(
            "{} {}  {}{}",
            status_glyph(task, config.use_emoji),
            task.name,
            format_duration(task.remaining_seconds),
            finish
        );
    }

    let remaining = time_remaining_today(&tasks);
    println!();
    println!(
        "Time remaining today: {} (finish by {})",
        format_duration(remaining),
        predicted_finish_time(now, remaining)
    );
    Ok(())
}

/// Keep the running task counting down without the interface
///
/// Ctrl-C leaves the running-task pointer in place so the next launch
/// resumes the same task.
async fn run_host(config: &Config) -> Result<()> {
    let Components {
        indicator,
        mut session,
        ..
    } = open_components(config)?;

    if !session.resume().await? {
        println!("No running task.");
        return Ok(());
    }

    let mut refresh = tokio::time::interval(ticker::ui_tick());
    let mut last_line = String::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("host interrupted, leaving session to resume later");
                break;
            }
            _ = refresh.tick() => {
                if !session.is_ticking() {
                    println!("Session ended.");
                    break;
                }
                if let Some(view) = indicator.current() {
                    let line = format!("{}  {}", view.title, view.time_text);
                    if line != last_line {
                        println!("{}", line);
                        last_line = line;
                    }
                }
            }
        }
    }

    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    let Components {
        store,
        indicator,
        session,
    } = open_components(config)?;

    let mut app = AppState::new(TaskList::new(store), session, indicator, config.use_emoji);
    app.resume().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        eprintln!("Error: {}", err);
    }
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let tick_rate = ticker::ui_tick();

    loop {
        // Pick up whatever the session loop wrote since the last frame
        app.refresh();

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key).await? {
                    return Ok(());
                }
            }
        }
    }
}
