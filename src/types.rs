//! This module defines the core data structures and types used throughout the simulator,
//! including transition rules, move actions, step outcomes, halt reasons, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// A single tape symbol. Symbols are short strings so that tables may use
/// multi-character cells such as `10` or `#`.
pub type Symbol = String;

/// The default blank symbol used on the tape.
pub const DEFAULT_BLANK_SYMBOL: &str = "_";
/// The default pause between two rendered steps, in seconds.
pub const DEFAULT_DELAY_SECS: f64 = 0.5;
/// Number of extra cells displayed on each side of the touched tape region.
pub const RENDER_MARGIN: i64 = 2;
/// The maximum allowed size for a transition table source in bytes.
pub const MAX_TABLE_SIZE: usize = 1024 * 1024; // 1MB

/// Represents the action a rule takes with the head after writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
    /// Keep the head in place and halt the machine.
    Stop,
}

impl Move {
    /// Parses a move letter (`L`, `R` or `S`, case-insensitive).
    pub fn from_letter(input: &str) -> Option<Self> {
        match input.to_ascii_uppercase().as_str() {
            "L" => Some(Move::Left),
            "R" => Some(Move::Right),
            "S" => Some(Move::Stop),
            _ => None,
        }
    }

    /// The single uppercase letter used for this move in table files.
    pub fn letter(&self) -> char {
        match self {
            Move::Left => 'L',
            Move::Right => 'R',
            Move::Stop => 'S',
        }
    }

    /// Returns the head offset produced by this move.
    pub fn offset(&self) -> i64 {
        match self {
            Move::Left => -1,
            Move::Right => 1,
            Move::Stop => 0,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A transition: what to write, how to move, and which state comes next.
///
/// Transitions are stored in a [`crate::TransitionTable`] keyed by `(state, read symbol)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The symbol written to the cell under the head.
    pub write: Symbol,
    /// The move applied after writing.
    #[serde(rename = "move")]
    pub action: Move,
    /// The state the machine transitions to.
    pub next_state: String,
}

impl Transition {
    pub fn new(write: impl Into<Symbol>, action: Move, next_state: impl Into<String>) -> Self {
        Self {
            write: write.into(),
            action,
            next_state: next_state.into(),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.write, self.action, self.next_state)
    }
}

/// The reason a machine stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    /// No rule exists for the current state and the symbol under the head.
    NoMatchingRule { state: String, symbol: Symbol },
    /// A rule with the `S` action fired. `state` and `symbol` are the pair that
    /// matched the rule, before it was applied.
    StopAction { state: String, symbol: Symbol },
}

impl Halt {
    /// The state that triggered the halt.
    pub fn state(&self) -> &str {
        match self {
            Halt::NoMatchingRule { state, .. } | Halt::StopAction { state, .. } => state,
        }
    }

    /// The symbol that triggered the halt.
    pub fn symbol(&self) -> &str {
        match self {
            Halt::NoMatchingRule { symbol, .. } | Halt::StopAction { symbol, .. } => symbol,
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::NoMatchingRule { state, symbol } => {
                write!(f, "No transition for ({state}, {symbol})")
            }
            Halt::StopAction { state, symbol } => {
                write!(f, "Stop command (S) in state {state} on {symbol}")
            }
        }
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A rule fired and the machine keeps running.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

impl Step {
    /// Returns `true` if the machine remains running after this step.
    pub fn is_continue(&self) -> bool {
        matches!(self, Step::Continue)
    }
}

/// The lifecycle status of a machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Running,
    Halted(Halt),
}

/// How a paced run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The machine halted on its own.
    Halted(Halt),
    /// The run was interrupted between two steps.
    Interrupted,
}

/// Represents various errors that can occur while loading or driving a machine.
///
/// Halting is never an error; see [`Halt`].
#[derive(Debug, Error)]
pub enum TurtabError {
    /// Indicates an error during the parsing of a transition table source.
    #[error("Table parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The table source contained no header row.
    #[error("Table is empty")]
    EmptyTable,
    /// Indicates an error related to file system operations, such as reading table files.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates an invalid value in a session file or on the command line.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// A renderer failed to write its output.
    #[error("Render error: {0}")]
    Io(#[from] std::io::Error),
}
