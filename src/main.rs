use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mockable::DefaultClock;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tasknest::config::{Config, Overrides, DEFAULT_CONFIG_FILE};
use tasknest::editor::FormEditor;
use tasknest::kanban_board::KanbanBoard;
use tasknest::state::{AppState, Reducer};
use tasknest::ui::run_app;

/// Terminal kanban board: To Do, In Progress, Done.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON config file (defaults to ./tasknest.json when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in light mode
    #[arg(long)]
    light: bool,

    /// Start with an empty board
    #[arg(long)]
    no_samples: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path, true)?,
            None => Config::load(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };
        Ok(config.with_overrides(Overrides {
            light: self.light,
            no_samples: self.no_samples,
            log_file: self.log_file.clone(),
        }))
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_in_alternate_screen(
    state: AppState,
    reducer: &mut Reducer<DefaultClock, FormEditor>,
) -> Result<AppState> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    run_app(&mut terminal, state, reducer).context("event loop failed")
}

/// Undoes every terminal mode change, attempting each step even when an
/// earlier one fails.
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("disable raw mode");
    let screen = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
        .context("leave alternate screen");
    raw.and(screen)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }
    info!(?config, "starting");

    let board = if config.sample_tasks {
        KanbanBoard::with_sample_tasks()
    } else {
        KanbanBoard::new()
    };
    let mut state = AppState::new(board);
    state.display_mode = config.display_mode;
    state.input.target = config.target_column;
    let mut reducer =
        Reducer::new(DefaultClock, FormEditor::new()).with_date_format(config.date_format);

    enable_raw_mode().context("enable raw mode")?;
    let result = run_in_alternate_screen(state, &mut reducer);
    // Restore terminal before reporting anything
    let restored = restore_terminal();
    let state = result?;
    restored?;
    info!(tasks = state.board.total_tasks(), "board discarded on exit");
    Ok(())
}
