//! Line-oriented prompts for the values a session file leaves open.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use turtab::config::{parse_blank, parse_delay};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and reads one trimmed line of input.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no answer to '{question}'"),
            ));
        }

        Ok(line.trim().to_string())
    }

    /// Asks for a table path until an existing file is named.
    pub fn table_path(&mut self) -> io::Result<PathBuf> {
        loop {
            let path = PathBuf::from(self.ask("Enter path to CSV file")?);
            if path.is_file() {
                return Ok(path);
            }
            writeln!(self.output, "File not found.")?;
        }
    }

    pub fn blank(&mut self) -> io::Result<String> {
        self.ask("Blank cell symbol (Enter = '_')")
            .map(|answer| parse_blank(&answer))
    }

    pub fn start_state(&mut self) -> io::Result<String> {
        self.ask("Start state")
    }

    pub fn tape(&mut self) -> io::Result<String> {
        self.ask("Input tape")
    }

    pub fn delay(&mut self) -> io::Result<f64> {
        writeln!(self.output)?;
        self.ask("Delay (sec, Enter=0.5)")
            .map(|answer| parse_delay(&answer))
    }

    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}
