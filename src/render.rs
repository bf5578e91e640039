//! Render events and the renderers that consume them.
//!
//! The run loop emits a [`Frame`] for the initial configuration and after every
//! step that keeps the machine running, and a [`Halt`] once it stops. Renderers
//! decide what to do with them; the engine never prints on its own.

use crate::tape::Tape;
use crate::types::{Halt, Symbol, RENDER_MARGIN};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::ops::RangeInclusive;

/// A borrowed view of the machine at one point of a run.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub step_count: usize,
    pub state: &'a str,
    pub head: i64,
    pub tape: &'a Tape,
}

impl<'a> Frame<'a> {
    /// The display range: the touched region plus the head, padded by `margin`.
    pub fn window(&self, margin: i64) -> RangeInclusive<i64> {
        self.tape.window(self.head, margin)
    }

    /// The symbol under the head.
    pub fn symbol(&self) -> &'a str {
        self.tape.read(self.head)
    }

    /// Copies the visible part of the frame into an owned [`Snapshot`].
    pub fn snapshot(&self, margin: i64) -> Snapshot {
        let window = self.window(margin);

        Snapshot {
            step: self.step_count,
            state: self.state.to_string(),
            head: self.head,
            start: *window.start(),
            cells: self
                .tape
                .cells(window)
                .map(|(_, symbol)| symbol.to_string())
                .collect(),
        }
    }
}

/// An owned copy of a frame, as emitted by the JSON renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: usize,
    pub state: String,
    pub head: i64,
    /// Tape index of the first entry in `cells`.
    pub start: i64,
    pub cells: Vec<Symbol>,
}

/// Consumes render events produced by a run.
pub trait Renderer {
    /// Called with the initial configuration and after every step that continues.
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;

    /// Called once when the machine halts.
    fn halted(&mut self, _halt: &Halt) -> io::Result<()> {
        Ok(())
    }
}

/// Draws the tape as two lines: a head pointer line and a line of cells.
///
/// ```text
/// --- Step 1 | State: [B] ---
///           ▼
///  _  _  1  _  _  _
/// ```
pub fn draw_tape<W: Write>(
    out: &mut W,
    title: &str,
    tape: &Tape,
    head: i64,
    margin: i64,
) -> io::Result<()> {
    let mut pointer_line = String::new();
    let mut tape_line = String::new();

    for (index, symbol) in tape.cells(tape.window(head, margin)) {
        let width = symbol.chars().count() + 2;
        let cell = format!(" {symbol} ");
        let pointer = if index == head { "▼" } else { " " };

        pointer_line.push_str(&format!("{pointer:^width$}"));
        tape_line.push_str(&cell);
    }

    writeln!(out)?;
    writeln!(out, "--- {title} ---")?;
    writeln!(out, "{}", pointer_line.trim_end())?;
    writeln!(out, "{tape_line}")?;

    Ok(())
}

/// Human readable console output.
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
    margin: i64,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            margin: RENDER_MARGIN,
        }
    }

    pub fn with_margin(mut self, margin: i64) -> Self {
        self.margin = margin;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let title = format!("Step {} | State: [{}]", frame.step_count, frame.state);

        draw_tape(&mut self.out, &title, frame.tape, frame.head, self.margin)?;
        self.out.flush()
    }

    fn halted(&mut self, halt: &Halt) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "HALT: {halt}")?;
        self.out.flush()
    }
}

/// One line of JSON emitted by [`JsonRenderer`].
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum Event<'a> {
    Frame { frame: &'a Snapshot },
    Halt { reason: &'a Halt },
}

/// Emits one JSON object per event, for headless consumers.
#[derive(Debug)]
pub struct JsonRenderer<W: Write> {
    out: W,
    margin: i64,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            margin: RENDER_MARGIN,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &Event<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let snapshot = frame.snapshot(self.margin);
        self.emit(&Event::Frame { frame: &snapshot })
    }

    fn halted(&mut self, halt: &Halt) -> io::Result<()> {
        self.emit(&Event::Halt { reason: halt })
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recorder {
    pub snapshots: Vec<Snapshot>,
    pub halts: Vec<Halt>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for Recorder {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.snapshots.push(frame.snapshot(RENDER_MARGIN));
        Ok(())
    }

    fn halted(&mut self, halt: &Halt) -> io::Result<()> {
        self.halts.push(halt.clone());
        Ok(())
    }
}
