//! pomo - Task-driven pomodoro timer
//!
//! "One task, one interval, then a break."
//!
//! Usage:
//!   pomo                        Open the timer with configured defaults
//!   pomo --work 50 --break 10   Override interval lengths for this run
//!   pomo --config PATH          Read defaults from another config file

mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomo::{AppState, TimerConfig};
use pomo_core::{Config, Paths};
use ratatui::prelude::*;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use tui::App;

/// Pomo - Task-driven pomodoro timer
#[derive(Parser)]
#[command(name = "pomo")]
#[command(about = "Task-driven pomodoro timer with daily focus statistics")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Log what you are about to work on, pick a task, and run focus
    intervals against it. Time is credited to the selected task and
    today's totals show up on the Statistics tab.

EXAMPLES:
    pomo                    # 25 min focus, 5 min break
    pomo --work 50 -b 10    # Longer intervals for this run
    RUST_LOG=pomo=debug pomo

KEY BINDINGS:
    q           Quit
    Tab, 1-3    Switch between Tasks, Timer and Statistics
    Space       Start / pause / resume the timer
    r           Reset the timer
    s           Change work and break minutes
    a           Add a task (Tasks tab)
    e           Edit the selected task
    d           Remove the selected task
    c           Complete the selected task
    Enter, w    Work on the selected task

CONFIG:
    ~/.config/pomo/config.json
    {"work_minutes": 25, "break_minutes": 5}

LOGS:
    ~/.local/share/pomo/pomo.log (level from RUST_LOG)
"#)]
struct Args {
    /// Focus interval length in minutes (1-60)
    #[arg(short, long, value_name = "MINS")]
    work: Option<u32>,

    /// Advisory break length in minutes (1-30)
    #[arg(short = 'b', long = "break", value_name = "MINS")]
    break_minutes: Option<u32>,

    /// Config file to read instead of the default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = Paths::new();

    init_logging(&paths.log_file())?;

    let config_path = args.config.unwrap_or_else(|| paths.config_file());
    let config = Config::load(&config_path)?;
    let timer_config = TimerConfig::new(
        args.work.unwrap_or(config.work_minutes),
        args.break_minutes.unwrap_or(config.break_minutes),
    )
    .context("Invalid timer configuration")?;

    tracing::info!(
        work_minutes = timer_config.work_minutes(),
        break_minutes = timer_config.break_minutes(),
        "Starting pomo"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(AppState::with_system_clock(timer_config));
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("{err:#}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file, since the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn run_app<B: Backend + Write>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    app.update();

    loop {
        terminal.draw(|f| tui::ui::draw(f, app))?;

        if app.take_bell() {
            let backend = terminal.backend_mut();
            write!(backend, "\x07")?;
            Write::flush(backend)?;
        }

        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        app.update();
    }
}
