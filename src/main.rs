//! rosterboard - Season scoring leaders for one grade cohort
//!
//! Fetches the season stats feed, scrapes every team's roster page for
//! grades and positions, and shows the top scorers of the chosen grade in a
//! terminal UI or as a plain table or JSON on stdout.

mod app;
mod ui;

use std::io::{self, Stdout};
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use app::{App, AppState};
use rosterboard::cache::CacheManager;
use rosterboard::cli::{Cli, OutputFormat, RunConfig};
use rosterboard::leaderboard::Leaderboard;
use rosterboard::logging::{self, LogTarget};
use rosterboard::pipeline::Presenter;
use rosterboard::progress::Progress;
use rosterboard::render::format_table;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match &app.state {
        AppState::Loading(message) => ui::render_loading(frame, message),
        AppState::Leaderboard => ui::render_leaderboard(frame, app),
        AppState::Failed(message) => ui::render_error(frame, message),
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Redraws the loading screen on every status update
struct TerminalProgress<'a> {
    terminal: &'a mut Tui,
}

impl Progress for TerminalProgress<'_> {
    fn status(&mut self, message: &str) {
        if let Err(e) = self.terminal.draw(|f| ui::render_loading(f, message)) {
            warn!(error = %e, "failed to draw loading screen");
        }
    }
}

/// Prints status lines to stderr so stdout stays clean for the result
struct StderrProgress;

impl Progress for StderrProgress {
    fn status(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Writes the leaderboard to stdout as a table or JSON
struct StdoutPresenter {
    format: OutputFormat,
}

impl Presenter for StdoutPresenter {
    fn show_error(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn show_leaderboard(&mut self, board: &Leaderboard) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string_pretty(board) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: failed to encode leaderboard: {}", e),
            },
            _ => print!("{}", format_table(board)),
        }
    }
}

/// Picks where logs go: a file beside the cache in TUI mode, stderr otherwise
fn log_target(config: &RunConfig) -> Option<LogTarget> {
    if config.output != OutputFormat::Tui {
        return Some(LogTarget::Stderr);
    }
    config
        .cache_dir
        .clone()
        .or_else(|| CacheManager::new().map(|cache| cache.dir().to_path_buf()))
        .map(|dir| LogTarget::file_in(&dir))
}

async fn run_tui(config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    terminal.draw(|f| render_ui(f, &app))?;

    let mut pipeline = config.build_pipeline();
    {
        let mut progress = TerminalProgress {
            terminal: &mut terminal,
        };
        pipeline.run_and_present(&mut progress, &mut app).await;
    }

    // Main event loop
    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Some(target) = log_target(&config) {
        if let Err(e) = logging::init(&config.log_level, &target) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }

    match config.output {
        OutputFormat::Tui => match run_tui(&config).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        format => {
            let mut pipeline = config.build_pipeline();
            let mut presenter = StdoutPresenter { format };
            if pipeline
                .run_and_present(&mut StderrProgress, &mut presenter)
                .await
            {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
