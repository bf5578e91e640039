//! Interactive head position setup.
//!
//! Shows the initial tape and lets the user move the head with the arrow keys
//! before the run starts. Enter confirms, Esc or Ctrl+C cancels.

use action::SetupAction;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use keymap::{Config, KeyMapConfig};
use std::io::{self, Write};
use turtab::render::draw_tape;
use turtab::types::RENDER_MARGIN;
use turtab::Tape;

/// Where the setup stands after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Moving(i64),
    Confirmed(i64),
    Cancelled,
}

/// Applies one setup action to the current head position.
pub fn apply(head: i64, action: SetupAction) -> Selection {
    match action {
        SetupAction::MoveLeft => Selection::Moving(head - 1),
        SetupAction::MoveRight => Selection::Moving(head + 1),
        SetupAction::Confirm => Selection::Confirmed(head),
        SetupAction::Cancel | SetupAction::Abort => Selection::Cancelled,
    }
}

/// Builds the setup screen for `head`.
pub fn screen(tape: &Tape, head: i64) -> io::Result<String> {
    let mut out = Vec::new();

    writeln!(out, "=== HEAD POSITION SETUP ===")?;
    writeln!(out, "Current position: {head}")?;
    writeln!(
        out,
        "Use [<-] and [->] to move the head, [ENTER] to start, [ESC] to cancel."
    )?;
    draw_tape(&mut out, "Select Position", tape, head, RENDER_MARGIN)?;

    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// A raw-mode alternate screen that is restored on drop.
struct RawScreen {
    stdout: io::Stdout,
}

impl RawScreen {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        Ok(Self { stdout })
    }

    fn draw(&mut self, content: &str) -> io::Result<()> {
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        // Raw mode does not translate line feeds.
        for line in content.lines() {
            write!(self.stdout, "{line}\r\n")?;
        }
        self.stdout.flush()
    }
}

impl Drop for RawScreen {
    fn drop(&mut self) {
        // Restore the terminal to its original state.
        // The results are ignored as we can't do much about errors during drop.
        let _ = disable_raw_mode();
        let _ = execute!(self.stdout, LeaveAlternateScreen, Show);
    }
}

/// Lets the user pick the initial head position for `tape`, starting at cell 0.
///
/// Returns `None` if the user cancelled.
pub fn choose_head(tape: &Tape) -> io::Result<Option<i64>> {
    let keymap: Config<SetupAction> = SetupAction::keymap_config();
    let mut screen_guard = RawScreen::new()?;
    let mut head = 0;

    loop {
        screen_guard.draw(&screen(tape, head)?)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(action) = keymap.get(&key) {
            match apply(head, *action) {
                Selection::Moving(position) => head = position,
                Selection::Confirmed(position) => return Ok(Some(position)),
                Selection::Cancelled => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_moves_and_confirms() {
        assert_eq!(apply(0, SetupAction::MoveLeft), Selection::Moving(-1));
        assert_eq!(apply(-1, SetupAction::MoveRight), Selection::Moving(0));
        assert_eq!(apply(4, SetupAction::Confirm), Selection::Confirmed(4));
        assert_eq!(apply(4, SetupAction::Cancel), Selection::Cancelled);
        assert_eq!(apply(4, SetupAction::Abort), Selection::Cancelled);
    }

    #[test]
    fn test_screen_shows_position_and_tape() {
        let tape = Tape::from_input("_", "10");
        let text = screen(&tape, -1).unwrap();

        assert!(text.contains("Current position: -1"));
        assert!(text.contains("--- Select Position ---"));
        assert!(text.contains(" _  _  _  1  0  _  _ "));
    }
}
