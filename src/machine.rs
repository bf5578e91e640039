//! This module defines the `TuringMachine` struct, which simulates a single-tape Turing
//! Machine driven by a shared `TransitionTable`. It owns the tape, head position, current
//! state and step counter, and exposes single stepping and a paced run loop.

use crate::pacing::{Pacer, Pause, SleepPacer};
use crate::render::{Frame, Renderer};
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Halt, Move, Outcome, Status, Step, Transition, TurtabError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Represents a single-tape Turing Machine.
///
/// The machine exclusively owns its tape and configuration; the transition table is
/// shared and never mutated.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    table: Arc<TransitionTable>,
    tape: Tape,
    state: String,
    head: i64,
    step_count: usize,
    status: Status,
    initial_tape: Tape,
    initial_state: String,
    initial_head: i64,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` in the `Running` status with a step count of 0.
    ///
    /// # Arguments
    ///
    /// * `table` - The transition table, shared with any other machine using it.
    /// * `tape` - The initial tape; its blank symbol is the machine's blank symbol.
    /// * `start_state` - The state the machine starts in.
    /// * `start_position` - The initial head position. It may lie outside the written
    ///   cells, including at negative indices.
    pub fn new(
        table: Arc<TransitionTable>,
        tape: Tape,
        start_state: impl Into<String>,
        start_position: i64,
    ) -> Self {
        let state = start_state.into();

        Self {
            table,
            initial_tape: tape.clone(),
            initial_state: state.clone(),
            initial_head: start_position,
            tape,
            state,
            head: start_position,
            step_count: 0,
            status: Status::Running,
        }
    }

    /// Executes a single transition.
    ///
    /// 1. Reads the symbol under the head.
    /// 2. Looks up the transition for the current state and that symbol.
    /// 3. Without a transition the machine halts with [`Halt::NoMatchingRule`]; nothing
    ///    is written and the step is not counted.
    /// 4. Otherwise the symbol is written, the state changes and the step is counted.
    ///    A `Stop` action then halts with [`Halt::StopAction`] and leaves the head in
    ///    place; `Left` and `Right` move the head by one cell.
    ///
    /// Once halted, further calls return the same halt and change nothing.
    pub fn step(&mut self) -> Step {
        if let Status::Halted(halt) = &self.status {
            return Step::Halt(halt.clone());
        }

        let symbol = self.tape.read(self.head).to_string();
        let table = Arc::clone(&self.table);

        let Some(transition) = table.lookup(&self.state, &symbol) else {
            return self.halt(Halt::NoMatchingRule {
                state: self.state.clone(),
                symbol,
            });
        };

        let previous = std::mem::replace(&mut self.state, transition.next_state.clone());
        self.tape.write(self.head, transition.write.as_str());
        self.step_count += 1;

        trace!(
            step = self.step_count,
            from = %previous,
            read = %symbol,
            rule = %transition,
            head = self.head,
            "applied transition"
        );

        match transition.action {
            Move::Stop => self.halt(Halt::StopAction {
                state: previous,
                symbol,
            }),
            Move::Left | Move::Right => {
                self.head = self.head.saturating_add(transition.action.offset());
                Step::Continue
            }
        }
    }

    fn halt(&mut self, halt: Halt) -> Step {
        debug!(steps = self.step_count, %halt, "machine halted");
        self.status = Status::Halted(halt.clone());
        Step::Halt(halt)
    }

    /// Runs the machine until it halts, sleeping `delay` between rendered steps.
    ///
    /// The renderer sees the initial configuration first, then every configuration
    /// reached by a step that keeps the machine running, and finally the halt reason.
    pub fn run<R: Renderer>(
        &mut self,
        delay: Duration,
        renderer: &mut R,
    ) -> Result<Outcome, TurtabError> {
        self.run_with(delay, renderer, &mut SleepPacer::new())
    }

    /// Like [`TuringMachine::run`], but suspends through `pacer`.
    ///
    /// If the pacer reports an interruption the run ends with [`Outcome::Interrupted`].
    /// The tape then reflects exactly the steps completed so far.
    pub fn run_with<R: Renderer, P: Pacer>(
        &mut self,
        delay: Duration,
        renderer: &mut R,
        pacer: &mut P,
    ) -> Result<Outcome, TurtabError> {
        renderer.render(&self.frame())?;

        loop {
            match self.step() {
                Step::Halt(halt) => {
                    renderer.halted(&halt)?;
                    return Ok(Outcome::Halted(halt));
                }
                Step::Continue => {
                    renderer.render(&self.frame())?;

                    if pacer.pause(delay) == Pause::Interrupted {
                        debug!(steps = self.step_count, "run interrupted");
                        return Ok(Outcome::Interrupted);
                    }
                }
            }
        }
    }

    /// Runs without rendering or pausing, applying at most `max_steps` transitions.
    /// Returns the halt reason if the machine halted.
    pub fn run_to_halt(&mut self, max_steps: usize) -> Option<Halt> {
        for _ in 0..max_steps {
            if let Step::Halt(halt) = self.step() {
                return Some(halt);
            }
        }

        // A missing transition halts without applying anything.
        if self.transition().is_some() {
            return None;
        }

        match self.step() {
            Step::Halt(halt) => Some(halt),
            Step::Continue => None,
        }
    }

    /// Resets the machine to its initial configuration.
    /// This includes the tape, state, head position, step count and status.
    pub fn reset(&mut self) {
        self.tape = self.initial_tape.clone();
        self.state = self.initial_state.clone();
        self.head = self.initial_head;
        self.step_count = 0;
        self.status = Status::Running;
    }

    /// Returns the current render view of the machine.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            step_count: self.step_count,
            state: &self.state,
            head: self.head,
            tape: &self.tape,
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the state the machine started in.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns the tape the machine started with.
    pub fn initial_tape(&self) -> &Tape {
        &self.initial_tape
    }

    /// Returns the head position the machine started at.
    pub fn initial_head(&self) -> i64 {
        self.initial_head
    }

    /// Returns the current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the blank symbol used by this machine.
    pub fn blank(&self) -> &str {
        self.tape.blank()
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> &str {
        self.tape.read(self.head)
    }

    /// Returns the transition that would fire on the next step, if any.
    pub fn transition(&self) -> Option<&Transition> {
        match self.status {
            Status::Running => self.table.lookup(&self.state, self.symbol()),
            Status::Halted(_) => None,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn table(&self) -> &Arc<TransitionTable> {
        &self.table
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Checks if the machine has halted.
    pub fn is_halted(&self) -> bool {
        matches!(self.status, Status::Halted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::Unpaced;
    use crate::render::Recorder;

    fn entry(
        state: &str,
        symbol: &str,
        write: &str,
        action: Move,
        next: &str,
    ) -> (String, String, Transition) {
        (
            state.to_string(),
            symbol.to_string(),
            Transition::new(write, action, next),
        )
    }

    /// `A,_ -> 1 R B` and `B,_ -> 1 L HALT`; nothing is defined for `HALT`.
    fn two_step_table() -> Arc<TransitionTable> {
        Arc::new(TransitionTable::from_entries(
            vec!["_".to_string(), "1".to_string()],
            vec![
                entry("A", "_", "1", Move::Right, "B"),
                entry("B", "_", "1", Move::Left, "HALT"),
            ],
        ))
    }

    fn two_step_machine() -> TuringMachine {
        TuringMachine::new(two_step_table(), Tape::from_input("_", ""), "A", 0)
    }

    #[test]
    fn test_machine_creation() {
        let machine = two_step_machine();

        assert_eq!(machine.state(), "A");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.blank(), "_");
        assert_eq!(machine.status(), &Status::Running);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_two_step_scenario() {
        let mut machine = two_step_machine();

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.tape().read(0), "1");
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.state(), "B");

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.tape().read(1), "1");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.state(), "HALT");

        let halt = machine.step();
        assert!(!halt.is_continue());
        assert_eq!(
            halt,
            Step::Halt(Halt::NoMatchingRule {
                state: "HALT".to_string(),
                symbol: "1".to_string(),
            })
        );
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.tape().read(0), "1");
        assert_eq!(machine.tape().read(1), "1");
    }

    #[test]
    fn test_empty_table_halts_without_mutation() {
        let mut machine = TuringMachine::new(
            Arc::new(TransitionTable::new()),
            Tape::from_input("_", "01"),
            "q0",
            1,
        );

        let step = machine.step();

        assert_eq!(
            step,
            Step::Halt(Halt::NoMatchingRule {
                state: "q0".to_string(),
                symbol: "1".to_string(),
            })
        );
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.state(), "q0");
        assert_eq!(machine.head(), 1);
        assert_eq!(machine.tape(), &Tape::from_input("_", "01"));
    }

    #[test]
    fn test_stop_commits_then_halts() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["0".to_string()],
            vec![
                entry("q", "0", "1", Move::Stop, "r"),
                // Would fire next if Stop did not halt.
                entry("r", "1", "0", Move::Right, "q"),
            ],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", "0"), "q", 0);

        let step = machine.step();

        assert_eq!(
            step,
            Step::Halt(Halt::StopAction {
                state: "q".to_string(),
                symbol: "0".to_string(),
            })
        );
        assert_eq!(machine.tape().read(0), "1");
        assert_eq!(machine.state(), "r");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 1);
        assert!(machine.is_halted());
    }

    #[test]
    fn test_halted_machine_rejects_further_steps() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["0".to_string()],
            vec![
                entry("q", "0", "1", Move::Stop, "r"),
                entry("r", "1", "0", Move::Right, "q"),
            ],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", "0"), "q", 0);

        let first = machine.step();
        let second = machine.step();

        assert_eq!(first, second);
        assert_eq!(machine.step_count(), 1);
        assert_eq!(machine.tape().read(0), "1");
        assert_eq!(machine.transition(), None);
    }

    #[test]
    fn test_move_semantics() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["_".to_string()],
            vec![
                entry("l", "_", "x", Move::Left, "r"),
                entry("r", "_", "y", Move::Right, "l"),
            ],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", ""), "l", 0);

        machine.step();
        assert_eq!(machine.head(), -1);
        machine.step();
        assert_eq!(machine.head(), 0);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_start_position_outside_tape_reads_blank() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["_".to_string()],
            vec![entry("q", "_", "_", Move::Left, "q")],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", "11"), "q", -3);

        assert_eq!(machine.symbol(), "_");
        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), -4);
        assert_eq!(machine.tape().read(-3), "_");
        assert_eq!(machine.tape().read(0), "1");
    }

    #[test]
    fn test_head_at_index_limit_stays_in_range() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["_".to_string()],
            vec![entry("q", "_", "x", Move::Left, "q")],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", ""), "q", i64::MIN);
        let mut recorder = Recorder::new();

        recorder.render(&machine.frame()).unwrap();
        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.head(), i64::MIN);
        assert_eq!(machine.tape().read(i64::MIN), "x");
        recorder.render(&machine.frame()).unwrap();

        assert_eq!(recorder.snapshots[1].start, i64::MIN);
        assert_eq!(recorder.snapshots[1].cells.len(), 3);
    }

    #[test]
    fn test_step_count_matches_accepted_steps() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["_".to_string(), "1".to_string()],
            vec![
                entry("q", "_", "1", Move::Right, "q"),
                entry("q", "1", "1", Move::Right, "q"),
            ],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", ""), "q", 0);

        for n in 1..=25 {
            assert!(machine.step().is_continue());
            assert_eq!(machine.step_count(), n);
            assert_eq!(machine.tape().len(), n);
        }
    }

    #[test]
    fn test_transition_preview() {
        let machine = two_step_machine();

        assert_eq!(
            machine.transition(),
            Some(&Transition::new("1", Move::Right, "B"))
        );
    }

    #[test]
    fn test_reset() {
        let mut machine = two_step_machine();

        machine.run_to_halt(10);
        assert!(machine.is_halted());

        machine.reset();
        assert_eq!(machine.state(), "A");
        assert_eq!(machine.head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert!(machine.tape().is_empty());
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_run_renders_initial_and_each_continuing_step() {
        let mut machine = two_step_machine();
        let mut recorder = Recorder::new();

        let outcome = machine
            .run_with(Duration::ZERO, &mut recorder, &mut Unpaced)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Halted(Halt::NoMatchingRule {
                state: "HALT".to_string(),
                symbol: "1".to_string(),
            })
        );
        let steps: Vec<usize> = recorder.snapshots.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 1, 2]);
        assert_eq!(recorder.halts.len(), 1);
    }

    #[test]
    fn test_run_with_zero_delay_sleep_pacer() {
        let mut machine = two_step_machine();
        let mut recorder = Recorder::new();

        let outcome = machine.run(Duration::ZERO, &mut recorder).unwrap();

        assert!(matches!(outcome, Outcome::Halted(_)));
        assert_eq!(recorder.snapshots.len(), 3);
    }

    struct InterruptAfter(usize);

    impl Pacer for InterruptAfter {
        fn pause(&mut self, _delay: Duration) -> Pause {
            if self.0 == 0 {
                return Pause::Interrupted;
            }
            self.0 -= 1;
            Pause::Elapsed
        }
    }

    #[test]
    fn test_run_interrupted_keeps_completed_steps() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["_".to_string()],
            vec![entry("q", "_", "1", Move::Right, "q")],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", ""), "q", 0);
        let mut recorder = Recorder::new();

        let outcome = machine
            .run_with(Duration::from_secs(1), &mut recorder, &mut InterruptAfter(2))
            .unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
        assert_eq!(machine.step_count(), 3);
        assert_eq!(machine.tape().contents(0..=3), "111_");
        assert_eq!(recorder.snapshots.len(), 4);
        assert!(recorder.halts.is_empty());
    }

    #[test]
    fn test_run_to_halt_limit() {
        let table = Arc::new(TransitionTable::from_entries(
            vec!["_".to_string()],
            vec![entry("q", "_", "_", Move::Right, "q")],
        ));
        let mut machine = TuringMachine::new(table, Tape::from_input("_", ""), "q", 0);

        assert_eq!(machine.run_to_halt(100), None);
        assert_eq!(machine.step_count(), 100);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_machines_share_table() {
        let table = two_step_table();
        let mut first = TuringMachine::new(table.clone(), Tape::from_input("_", ""), "A", 0);
        let second = TuringMachine::new(table.clone(), Tape::from_input("_", ""), "A", 0);

        first.run_to_halt(10);

        assert!(Arc::ptr_eq(first.table(), second.table()));
        assert_eq!(second.step_count(), 0);
        assert!(second.tape().is_empty());
    }
}
