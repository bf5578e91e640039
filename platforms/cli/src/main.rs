mod prompt;
mod setup;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prompt::Prompter;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use turtab::config::is_valid_delay;
use turtab::types::DEFAULT_DELAY_SECS;
use turtab::{
    JsonRenderer, Outcome, Renderer, RunConfig, SessionFile, SleepPacer, TableLoader,
    TextRenderer, TuringMachine,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Tape drawings with a head pointer
    Text,
    /// One JSON object per event
    Json,
}

impl Format {
    /// JSON output owns stdout, so prompts go to stderr instead.
    fn prompts_on_stderr(self) -> bool {
        self == Format::Json
    }
}

/// Runs a Turing machine described by a delimited transition table.
///
/// Values missing from both the flags and the session file are asked for
/// interactively.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  turtab tables/busy-beaver-3.session
  turtab --table tables/binary-increment.csv --state right --tape 1011 --head 0")]
struct Cli {
    /// Session file: table path, blank, start state, tape, head position and
    /// delay, one per line.
    session: Option<PathBuf>,

    /// Path to the transition table (.csv)
    #[clap(short, long)]
    table: Option<PathBuf>,

    /// Blank cell symbol
    #[clap(short, long)]
    blank: Option<String>,

    /// Start state
    #[clap(short, long)]
    state: Option<String>,

    /// Initial tape contents, one symbol per character
    #[clap(long)]
    tape: Option<String>,

    /// Initial head position; skips the interactive head setup
    #[clap(long, allow_hyphen_values = true)]
    head: Option<i64>,

    /// Delay between steps in seconds
    #[clap(short, long)]
    delay: Option<f64>,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("turtab=warn")),
        )
        .init();

    let cli = Cli::parse();

    let session = match &cli.session {
        Some(path) => SessionFile::load(path)
            .with_context(|| format!("Failed to load session file {}", path.display()))?,
        None => SessionFile::default(),
    };

    let prompt_output: Box<dyn Write> = if cli.format.prompts_on_stderr() {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), prompt_output);

    let table_path = match cli.table.clone().or(session.table_path.clone()) {
        Some(path) => path,
        None => prompter.table_path()?,
    };

    // Fail before asking anything else if the table cannot be used.
    let table = TableLoader::load_table(&table_path)
        .with_context(|| format!("Read error for {}", table_path.display()))?;
    info!(
        path = %table_path.display(),
        transitions = table.len(),
        "table loaded"
    );

    let Some(config) = resolve(&cli, session, table_path, &mut prompter)? else {
        prompter.say("Setup cancelled.")?;
        return Ok(());
    };

    let machine = config.build(Arc::new(table));

    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();

    // Handle Ctrl+C
    tokio::spawn(async move {
        signal::ctrl_c().await.ok();
        flag.store(true, Ordering::SeqCst);
    });

    let format = cli.format;
    let delay = config.delay();
    let outcome = tokio::task::spawn_blocking(move || {
        let pacer = SleepPacer::with_interrupt(interrupt);
        let stdout = io::stdout();

        match format {
            Format::Text => {
                println!();
                println!("=== Starting Emulation ===");
                simulate(machine, delay, TextRenderer::new(stdout.lock()), pacer)
            }
            Format::Json => simulate(machine, delay, JsonRenderer::new(stdout.lock()), pacer),
        }
    })
    .await??;

    if outcome == Outcome::Interrupted && format == Format::Text {
        println!();
        println!("Interrupted.");
    }

    Ok(())
}

/// Fills every value of the run configuration from the flags, then the session
/// file, then the prompts. Returns `None` if the head setup was cancelled.
fn resolve<R: BufRead, W: Write>(
    cli: &Cli,
    session: SessionFile,
    table_path: PathBuf,
    prompter: &mut Prompter<R, W>,
) -> Result<Option<RunConfig>> {
    let blank = match cli.blank.clone().or(session.blank) {
        Some(blank) => blank,
        None => prompter.blank()?,
    };

    let start_state = match cli.state.clone().or(session.start_state) {
        Some(state) => state,
        None => prompter.start_state()?,
    };

    let tape = match cli.tape.clone().or(session.tape) {
        Some(tape) => tape,
        None => prompter.tape()?,
    };

    let mut config = RunConfig::new(table_path, start_state);
    config.blank = blank;
    config.tape = tape;

    config.start_position = match cli.head.or(session.start_position) {
        Some(head) => head,
        None if atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout) => {
            prompter.say("Moving to head setup...")?;
            match setup::choose_head(&config.tape())? {
                Some(head) => head,
                None => return Ok(None),
            }
        }
        None => {
            warn!("not a terminal, starting with the head at cell 0");
            0
        }
    };

    config.delay = match cli.delay.or(session.delay) {
        Some(delay) if is_valid_delay(delay) => delay,
        Some(delay) => {
            warn!(delay, "invalid delay, using default");
            DEFAULT_DELAY_SECS
        }
        None => prompter.delay()?,
    };

    Ok(Some(config))
}

fn simulate<R: Renderer>(
    mut machine: TuringMachine,
    delay: std::time::Duration,
    mut renderer: R,
    mut pacer: SleepPacer,
) -> Result<Outcome> {
    let outcome = machine.run_with(delay, &mut renderer, &mut pacer)?;
    info!(steps = machine.step_count(), ?outcome, "run finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("turtab").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_session() {
        let cli = cli(&["--blank", "#", "--state", "q1", "--head", "-2", "--delay", "0"]);
        let session = SessionFile::parse("t.csv\n_\nq0\n101\n5\n0.3\n").unwrap();
        let mut prompter = Prompter::new(Cursor::new(Vec::new()), Vec::new());

        let config = resolve(&cli, session, PathBuf::from("t.csv"), &mut prompter)
            .unwrap()
            .unwrap();

        assert_eq!(config.blank, "#");
        assert_eq!(config.start_state, "q1");
        assert_eq!(config.tape, "101");
        assert_eq!(config.start_position, -2);
        assert_eq!(config.delay, 0.0);
    }

    #[test]
    fn test_missing_values_are_prompted() {
        let cli = cli(&["--head", "0"]);
        let session = SessionFile::parse("t.csv\n\nA\n").unwrap();
        let mut prompter = Prompter::new(Cursor::new(b"#\n01\n0.2\n".to_vec()), Vec::new());

        let config = resolve(&cli, session, PathBuf::from("t.csv"), &mut prompter)
            .unwrap()
            .unwrap();

        assert_eq!(config.blank, "#");
        assert_eq!(config.start_state, "A");
        assert_eq!(config.tape, "01");
        assert_eq!(config.delay, 0.2);
    }

    #[test]
    fn test_format_flag() {
        assert_eq!(cli(&["--format", "json"]).format, Format::Json);
        assert_eq!(cli(&[]).format, Format::Text);
    }

    #[test]
    fn test_json_format_keeps_prompts_off_stdout() {
        assert!(Format::Json.prompts_on_stderr());
        assert!(!Format::Text.prompts_on_stderr());
    }

    #[test]
    fn test_oversized_delay_flag_falls_back_to_default() {
        let cli = cli(&["--head", "0", "--delay", "1e20"]);
        let session = SessionFile::parse("t.csv\n_\nA\n\n").unwrap();
        let mut prompter = Prompter::new(Cursor::new(b"\n".to_vec()), Vec::new());

        let config = resolve(&cli, session, PathBuf::from("t.csv"), &mut prompter)
            .unwrap()
            .unwrap();

        assert_eq!(config.delay, DEFAULT_DELAY_SECS);
        assert_eq!(config.delay(), std::time::Duration::from_millis(500));
    }
}
