//! Run configuration and the line-oriented session file.
//!
//! A session file holds up to six lines, in order:
//!
//! ```text
//! tables/busy-beaver-3.csv   table path ("0" to ask)
//! _                          blank symbol
//! A                          start state
//! 0110                       input tape
//! 0                          start head position
//! 0.5                        delay between steps, in seconds
//! ```
//!
//! An empty or missing line leaves the value open so the caller can ask for it.
//! A line holding only whitespace is an explicit empty value: the default blank
//! for the blank line, an empty tape for the tape line.

use crate::machine::TuringMachine;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Symbol, TurtabError, DEFAULT_BLANK_SYMBOL, DEFAULT_DELAY_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// A complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub table_path: PathBuf,
    pub blank: Symbol,
    pub start_state: String,
    /// Initial tape contents, one symbol per character, written from index 0.
    pub tape: String,
    pub start_position: i64,
    /// Delay between rendered steps, in seconds.
    pub delay: f64,
}

impl RunConfig {
    pub fn new(table_path: impl Into<PathBuf>, start_state: impl Into<String>) -> Self {
        Self {
            table_path: table_path.into(),
            blank: DEFAULT_BLANK_SYMBOL.to_string(),
            start_state: start_state.into(),
            tape: String::new(),
            start_position: 0,
            delay: DEFAULT_DELAY_SECS,
        }
    }

    /// The delay between steps. A value no `Duration` can hold falls back to
    /// the default.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay).unwrap_or_else(|e| {
            warn!(delay = self.delay, error = %e, "invalid delay, using default");
            Duration::from_secs_f64(DEFAULT_DELAY_SECS)
        })
    }

    /// Builds the initial tape for this configuration.
    pub fn tape(&self) -> Tape {
        Tape::from_input(self.blank.as_str(), &self.tape)
    }

    /// Creates a machine in this configuration, driven by `table`.
    pub fn build(&self, table: Arc<TransitionTable>) -> TuringMachine {
        TuringMachine::new(
            table,
            self.tape(),
            self.start_state.as_str(),
            self.start_position,
        )
    }
}

/// The values found in a session file. `None` means "ask for it".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionFile {
    pub table_path: Option<PathBuf>,
    pub blank: Option<Symbol>,
    pub start_state: Option<String>,
    pub tape: Option<String>,
    pub start_position: Option<i64>,
    pub delay: Option<f64>,
}

impl SessionFile {
    /// Reads and parses a session file.
    pub fn load(path: &Path) -> Result<Self, TurtabError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TurtabError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parses the content of a session file.
    ///
    /// # Returns
    ///
    /// * `Err(TurtabError::ConfigError)` if the head position line is not an integer.
    pub fn parse(content: &str) -> Result<Self, TurtabError> {
        let lines: Vec<&str> = content.lines().collect();
        let line = |index: usize| lines.get(index).copied().filter(|line| !line.is_empty());

        let table_path = line(0)
            .map(str::trim)
            .filter(|path| !path.is_empty() && *path != "0")
            .map(PathBuf::from);

        let blank = line(1).map(|blank| parse_blank(blank));
        let start_state = line(2).map(|state| state.trim().to_string());
        let tape = line(3).map(|tape| tape.trim().to_string());

        let start_position = line(4)
            .map(|position| {
                position.trim().parse::<i64>().map_err(|_| {
                    TurtabError::ConfigError(format!("Invalid head position '{}'", position.trim()))
                })
            })
            .transpose()?;

        let delay = line(5).map(parse_delay);

        Ok(Self {
            table_path,
            blank,
            start_state,
            tape,
            start_position,
            delay,
        })
    }

    /// Returns a complete configuration if every value is present.
    pub fn complete(&self) -> Option<RunConfig> {
        Some(RunConfig {
            table_path: self.table_path.clone()?,
            blank: self.blank.clone()?,
            start_state: self.start_state.clone()?,
            tape: self.tape.clone()?,
            start_position: self.start_position?,
            delay: self.delay?,
        })
    }
}

/// Normalizes a blank symbol entry; an empty entry selects the default.
pub fn parse_blank(input: &str) -> Symbol {
    match input.trim() {
        "" => DEFAULT_BLANK_SYMBOL.to_string(),
        blank => blank.to_string(),
    }
}

/// Returns `true` if `secs` is a usable delay: finite, non-negative and small
/// enough to fit a `Duration`.
pub fn is_valid_delay(secs: f64) -> bool {
    Duration::try_from_secs_f64(secs).is_ok()
}

/// Parses a delay in seconds. Empty, invalid, negative, non-finite or
/// oversized input falls back to the default.
pub fn parse_delay(input: &str) -> f64 {
    let input = input.trim();
    if input.is_empty() {
        return DEFAULT_DELAY_SECS;
    }

    match input.parse::<f64>() {
        Ok(delay) if is_valid_delay(delay) => delay,
        _ => {
            warn!(input, default = DEFAULT_DELAY_SECS, "invalid delay, using default");
            DEFAULT_DELAY_SECS
        }
    }
}
