//! Pacing between rendered steps.
//!
//! The run loop hands every suspension to a [`Pacer`]. Pacers decide how long
//! to wait and whether the run should stop at that point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep, so an interrupt is noticed promptly.
const SLICE: Duration = Duration::from_millis(20);

/// Result of a single pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full delay elapsed; the run continues.
    Elapsed,
    /// The run should stop before the next step.
    Interrupted,
}

/// Suspends the run loop between steps.
pub trait Pacer {
    fn pause(&mut self, delay: Duration) -> Pause;
}

/// Sleeps on the current thread, optionally watching an interrupt flag.
///
/// The flag is usually set from a Ctrl+C handler.
#[derive(Debug, Default, Clone)]
pub struct SleepPacer {
    interrupt: Option<Arc<AtomicBool>>,
}

impl SleepPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pacer that reports [`Pause::Interrupted`] once `flag` is set.
    pub fn with_interrupt(flag: Arc<AtomicBool>) -> Self {
        Self {
            interrupt: Some(flag),
        }
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

impl Pacer for SleepPacer {
    fn pause(&mut self, delay: Duration) -> Pause {
        // `None` when the deadline lies beyond what `Instant` can represent.
        let deadline = Instant::now().checked_add(delay);

        loop {
            if self.is_interrupted() {
                return Pause::Interrupted;
            }

            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => delay,
            };
            if remaining.is_zero() {
                return Pause::Elapsed;
            }

            thread::sleep(SLICE.min(remaining));
        }
    }
}

/// Never waits and never interrupts. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn pause(&mut self, _delay: Duration) -> Pause {
        Pause::Elapsed
    }
}
