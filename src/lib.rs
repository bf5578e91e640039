//! This crate provides the core logic for a table-driven, single-tape Turing Machine simulator.
//! It includes modules for parsing delimited transition tables, simulating their execution
//! on a sparse tape, rendering each step, and managing a collection of sample programs.

pub mod config;
pub mod loader;
pub mod machine;
pub mod pacing;
pub mod parser;
pub mod programs;
pub mod render;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the run configuration and session file types.
pub use config::{RunConfig, SessionFile};
/// Re-exports the `TableLoader` struct from the loader module.
pub use loader::TableLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the pacing primitives used by the run loop.
pub use pacing::{Pacer, Pause, SleepPacer, Unpaced};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports render events and the bundled renderers.
pub use render::{Frame, JsonRenderer, Recorder, Renderer, Snapshot, TextRenderer};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{Halt, Move, Outcome, Status, Step, Symbol, Transition, TurtabError};
