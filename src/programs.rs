use crate::machine::TuringMachine;
use crate::parser::parse;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{TurtabError, DEFAULT_BLANK_SYMBOL};

use std::sync::Arc;
use tracing::warn;

/// An embedded table together with the configuration it is meant to run with.
struct Preset {
    name: &'static str,
    source: &'static str,
    start_state: &'static str,
    tape: &'static str,
    head: i64,
}

// Default embedded programs
const PRESETS: [Preset; 4] = [
    Preset {
        name: "Two Steps",
        source: include_str!("../tables/two-step.csv"),
        start_state: "A",
        tape: "",
        head: 0,
    },
    Preset {
        name: "Busy Beaver (3 states)",
        source: include_str!("../tables/busy-beaver-3.csv"),
        start_state: "A",
        tape: "",
        head: 0,
    },
    Preset {
        name: "Binary Increment",
        source: include_str!("../tables/binary-increment.csv"),
        start_state: "right",
        tape: "1011",
        head: 0,
    },
    Preset {
        name: "Unary Eraser",
        source: include_str!("../tables/unary-eraser.csv"),
        start_state: "erase",
        tape: "111",
        head: 0,
    },
];

/// A ready-to-run sample machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    /// The table source, as written in its `.csv` file.
    pub source: String,
    pub table: Arc<TransitionTable>,
    pub start_state: String,
    pub tape: String,
    pub head: i64,
}

impl Program {
    /// Creates a fresh machine for this program.
    pub fn machine(&self) -> TuringMachine {
        TuringMachine::new(
            Arc::clone(&self.table),
            Tape::from_input(DEFAULT_BLANK_SYMBOL, &self.tape),
            self.start_state.as_str(),
            self.head,
        )
    }
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = PRESETS
        .iter()
        .filter_map(|preset| match parse(preset.source) {
            Ok(table) => Some(Program {
                name: preset.name.to_string(),
                source: preset.source.to_string(),
                table: Arc::new(table),
                start_state: preset.start_state.to_string(),
                tape: preset.tape.to_string(),
                head: preset.head,
            }),
            Err(e) => {
                warn!(program = preset.name, error = %e, "failed to parse embedded program");
                None
            }
        })
        .collect();
}

/// Summary information about a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub start_state: String,
    pub tape: String,
    pub state_count: usize,
    pub transition_count: usize,
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TurtabError> {
        PROGRAMS.get(index).cloned().ok_or_else(|| {
            TurtabError::ConfigError(format!("Program index {} out of range", index))
        })
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TurtabError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            start_state: program.start_state.clone(),
            tape: program.tape.clone(),
            state_count: program.table.states().len(),
            transition_count: program.table.len(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| program.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Finds the index of a program by exact name, or else by the first name
    /// containing `query` (case-insensitive).
    pub fn find_program(query: &str) -> Result<usize, TurtabError> {
        let names = Self::list_program_names();

        names
            .iter()
            .position(|name| name == query)
            .or_else(|| Self::search_programs(query).first().copied())
            .ok_or_else(|| {
                TurtabError::ConfigError(format!(
                    "Program '{}' not found. Available: {}",
                    query,
                    names.join(", ")
                ))
            })
    }
}
