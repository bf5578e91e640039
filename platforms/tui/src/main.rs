mod app;

use action::Action;
use anyhow::{anyhow, Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;
use std::{fs, io, path::PathBuf, time::Duration};
use turtab::{config::parse_blank, ProgramManager, TableLoader, Tape, TuringMachine};

/// A table-driven Turing machine simulator with a Terminal User Interface.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turtab-tui
  turtab-tui --program busy
  turtab-tui tables/binary-increment.csv --state right --tape 1011")]
struct Cli {
    /// Path to a transition table (.csv).
    /// If not provided, the application will load the built-in programs.
    table_file: Option<PathBuf>,

    /// Built-in program to start with, by name or part of its name
    #[clap(short, long, conflicts_with = "table_file")]
    program: Option<String>,

    /// Start state (defaults to the first state row of the table)
    #[clap(short, long)]
    state: Option<String>,

    /// Initial tape contents, one symbol per character
    #[clap(short, long, default_value = "")]
    tape: String,

    /// Initial head position
    #[clap(long, default_value_t = 0, allow_hyphen_values = true)]
    head: i64,

    /// Blank cell symbol
    #[clap(short, long, default_value = "_")]
    blank: String,
}

/// Represents the state of the application loop.
#[derive(PartialEq)]
enum AppState {
    Running,
    ShouldQuit,
}

/// A wrapper around the terminal to ensure it's restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore the terminal to its original state.
        // The results are ignored as we can't do much about errors during drop.
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load before entering the alternate screen so errors reach the user.
    let app = load_app(&cli)?;

    let mut tui = Tui::new()?;
    run_app(&mut tui.terminal, app)?;

    Ok(())
}

/// Builds the app from a table file, or from the built-in programs.
fn load_app(cli: &Cli) -> Result<App> {
    let Some(path) = &cli.table_file else {
        let index = match &cli.program {
            Some(query) => ProgramManager::find_program(query)?,
            None => 0,
        };
        return Ok(App::new_program(index)?);
    };

    let table = TableLoader::load_table(path)
        .with_context(|| format!("Failed to load '{}'", path.display()))?;
    // Kept for the source panel; the loader has already checked the file.
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file '{}'", path.display()))?;

    let state = match &cli.state {
        Some(state) => state.clone(),
        None => table
            .states()
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("'{}' has no states; pass --state", path.display()))?,
    };

    let tape = Tape::from_input(parse_blank(&cli.blank), &cli.tape);
    let machine = TuringMachine::new(Arc::new(table), tape, state, cli.head);

    Ok(App::new_from_table(
        path.display().to_string(),
        text,
        machine,
    ))
}

/// Runs the main application loop.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = if app.is_auto_playing() {
            Duration::from_millis(500)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key_event(&mut app, key) == AppState::ShouldQuit
                {
                    return Ok(());
                }
            }
        }

        if app.is_auto_playing() {
            app.step_machine();
        }
    }
}

/// Handles key events and updates the application state.
fn handle_key_event(app: &mut App, key: KeyEvent) -> AppState {
    if let Some(action) = app.keymap.get(&key) {
        match action {
            Action::Quit => return AppState::ShouldQuit,
            Action::Reset => app.reset_machine(),
            Action::Step => app.step_machine(),
            Action::ToggleAutoPlay => app.toggle_auto_play(),
            Action::ToggleHelp => app.toggle_help(),
            Action::PreviousProgram => app.previous_program(),
            Action::NextProgram => app.next_program(),
        }
    }
    AppState::Running
}
