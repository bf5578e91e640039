use action::Action;
use keymap::{Config, KeyMapConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
    Frame,
};
use turtab::{
    types::RENDER_MARGIN, ProgramManager, Status, Step, TuringMachine, TurtabError,
};

const BLOCK_PADDING: Padding = Padding::new(1, 1, 0, 0);

/// Where the machine on screen came from.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    /// A built-in program, by index.
    Builtin(usize),
    /// A table file given on the command line.
    File(String),
}

pub struct App {
    machine: TuringMachine,
    source: Source,
    table_text: String,
    auto_play: bool,
    message: String,
    show_help: bool,
    pub(crate) keymap: Config<Action>,
}

impl App {
    /// Starts with the first built-in program.
    pub fn new_default() -> Result<Self, TurtabError> {
        Self::new_program(0)
    }

    /// Starts with the built-in program at `index`.
    pub fn new_program(index: usize) -> Result<Self, TurtabError> {
        let program = ProgramManager::get_program_by_index(index)?;

        Ok(Self::with_machine(
            program.machine(),
            Source::Builtin(index),
            program.source,
            "Press 'h' for help.",
        ))
    }

    /// Shows a machine built from a table file; program switching is disabled.
    pub fn new_from_table(name: String, table_text: String, machine: TuringMachine) -> Self {
        Self::with_machine(
            machine,
            Source::File(name),
            table_text,
            "Table loaded from file. Press 'h' for help.",
        )
    }

    fn with_machine(
        machine: TuringMachine,
        source: Source,
        table_text: String,
        message: &str,
    ) -> Self {
        Self {
            machine,
            source,
            table_text,
            auto_play: false,
            message: message.to_string(),
            show_help: false,
            keymap: Action::keymap_config(),
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        let inner_area = f.area().inner(Margin::new(1, 0));

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Program info
                Constraint::Min(0),    // Table and machine
                Constraint::Length(3), // Status
            ])
            .split(inner_area);

        self.render_program_info(f, main_chunks[0]);

        let middle_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Length(1),
                Constraint::Percentage(50),
            ])
            .split(main_chunks[1]);

        self.render_table(f, middle_chunks[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Machine state
                Constraint::Min(0),    // Tape or help
            ])
            .split(middle_chunks[2]);

        self.render_machine_state(f, right_chunks[0]);

        if self.show_help {
            self.render_help(f, right_chunks[1]);
        } else {
            self.render_tape(f, right_chunks[1]);
        }

        self.render_status(f, main_chunks[2]);
    }

    /// Draws the table text, highlighting the header row and the row of the
    /// current state.
    fn render_table(&self, f: &mut Frame, area: Rect) {
        let state = self.machine.state();

        let lines: Vec<Line> = self
            .table_text
            .lines()
            .enumerate()
            .map(|(index, line)| {
                let row_state = line.split(',').next().unwrap_or("").trim();
                if index == 0 {
                    Line::from(Span::styled(line, Style::default().fg(Color::Yellow)))
                } else if row_state == state && !self.machine.is_halted() {
                    Line::from(Span::styled(
                        line,
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(line)
                }
            })
            .collect();

        let paragraph = section("Transition Table", lines).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_program_info(&self, f: &mut Frame, area: Rect) {
        let table = self.machine.table();

        let (name, tape) = match &self.source {
            Source::Builtin(index) => match ProgramManager::get_program_info(*index) {
                Ok(info) => (
                    format!("{} ({}/{})", info.name, index + 1, ProgramManager::count()),
                    info.tape,
                ),
                Err(e) => (e.to_string(), String::new()),
            },
            Source::File(name) => (
                format!("{name} (Custom)"),
                self.machine
                    .initial_tape()
                    .written()
                    .map(|(_, symbol)| symbol)
                    .collect(),
            ),
        };

        let text = vec![
            Line::from(vec![
                Span::styled("Program: ", Style::default().fg(Color::Yellow)),
                Span::raw(name),
            ]),
            Line::from(vec![
                Span::styled("Initial Tape: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("\"{tape}\"")),
                Span::styled(" | Start: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!(
                    "state {} at {}",
                    self.machine.initial_state(),
                    self.machine.initial_head()
                )),
            ]),
            Line::from(vec![
                Span::styled("States: ", Style::default().fg(Color::Yellow)),
                Span::raw(table.states().len().to_string()),
                Span::styled(" | Symbols: ", Style::default().fg(Color::Yellow)),
                Span::raw(table.alphabet().join(" ")),
                Span::styled(" | Rules: ", Style::default().fg(Color::Yellow)),
                Span::raw(table.len().to_string()),
            ]),
        ];

        let paragraph = Paragraph::new(text).block(
            block("Turtab - Table-Driven Turing Machine (TUI)").title_alignment(Alignment::Center),
        );

        f.render_widget(paragraph, area);
    }

    fn render_tape(&self, f: &mut Frame, area: Rect) {
        let frame = self.machine.frame();
        let head = frame.head;

        let cells: Vec<Span> = frame
            .tape
            .cells(frame.window(RENDER_MARGIN))
            .map(|(index, symbol)| {
                if index == head {
                    Span::styled(
                        format!(" {symbol} "),
                        Style::default()
                            .bg(Color::Yellow)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(format!(" {symbol} "))
                }
            })
            .collect();

        let text = vec![
            Line::from(cells),
            Line::from(""),
            Line::from(Span::styled(
                format!("Head at position: {} (symbol: '{}')", head, frame.symbol()),
                Style::default().fg(Color::Cyan),
            )),
        ];

        let paragraph = section("Tape", text).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_machine_state(&self, f: &mut Frame, area: Rect) {
        let step_count = self.machine.step_count();

        let (status_text, status_color) = match self.machine.status() {
            Status::Halted(_) => ("HALTED", Color::Red),
            Status::Running if step_count == 0 => ("READY", Color::Blue),
            Status::Running => ("RUNNING", Color::Green),
        };

        let mut text = vec![Line::from(vec![
            Span::styled("Current State: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                self.machine.state(),
                Style::default()
                    .fg(status_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | Steps: ", Style::default().fg(Color::Yellow)),
            Span::raw(step_count.to_string()),
            Span::styled(" | Status: ", Style::default().fg(Color::Yellow)),
            Span::styled(status_text, Style::default().fg(status_color)),
        ])];

        text.push(match self.machine.status() {
            Status::Halted(halt) => Line::from(vec![
                Span::styled("Halt: ", Style::default().fg(Color::Red)),
                Span::raw(halt.to_string()),
            ]),
            Status::Running => Line::from(vec![
                Span::styled("Next: ", Style::default().fg(Color::Cyan)),
                Span::raw(match self.machine.transition() {
                    Some(transition) => format!(
                        "({}, {}) -> {}",
                        self.machine.state(),
                        self.machine.symbol(),
                        transition
                    ),
                    None => format!(
                        "({}, {}) has no transition",
                        self.machine.state(),
                        self.machine.symbol()
                    ),
                }),
            ]),
        });

        f.render_widget(section("Machine State", text), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("Controls:"),
            Line::from("  Space - Step forward"),
            Line::from("  r - Reset machine"),
            Line::from("  p - Toggle auto-play"),
            Line::from(match self.source {
                Source::Builtin(_) => "  ← → - Switch programs",
                Source::File(_) => "  ← → - Program switching disabled (loaded from file)",
            }),
            Line::from("  h - Toggle this help"),
            Line::from("  q - Quit"),
            Line::from(""),
            Line::from("Each cell holds '<write> <move> <next state>'."),
            Line::from("  Moves: L (left), R (right), S (write, then halt)"),
            Line::from("  An empty cell halts the machine in that configuration."),
        ];

        f.render_widget(section("Help", help_text), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let repo = "@rezigned/turtab";
        let outer = block("Status");
        let inner = outer.inner(area);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(repo.len() as u16)])
            .split(inner);

        let auto_play_status = if self.auto_play { "ON" } else { "OFF" };
        let status = Line::from(vec![
            Span::raw("Auto-play: "),
            Span::styled(auto_play_status, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" | {}", self.message)),
        ]);

        let social = Text::from(
            Line::from(Span::styled(repo, Style::default().fg(Color::Yellow))).right_aligned(),
        );

        f.render_widget(outer, area);
        f.render_widget(status, chunks[0]);
        f.render_widget(social, chunks[1]);
    }

    pub fn step_machine(&mut self) {
        match self.machine.step() {
            Step::Continue => {
                self.message = format!("Step {} completed", self.machine.step_count());
            }
            Step::Halt(halt) => {
                self.message = format!("{halt}. Press 'r' to reset.");
                self.auto_play = false;
            }
        }
    }

    pub fn reset_machine(&mut self) {
        self.machine.reset();
        self.message = "Machine reset".to_string();
        self.auto_play = false;
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_play = !self.auto_play;
        self.message = format!(
            "Auto-play {}",
            if self.auto_play {
                "enabled"
            } else {
                "disabled"
            }
        );
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play && !self.machine.is_halted()
    }

    pub fn next_program(&mut self) {
        if let Source::Builtin(index) = self.source {
            self.load_program((index + 1) % ProgramManager::count().max(1));
        } else {
            self.message = "Cannot switch programs when loaded from file.".to_string();
        }
    }

    pub fn previous_program(&mut self) {
        if let Source::Builtin(index) = self.source {
            let count = ProgramManager::count().max(1);
            self.load_program((index + count - 1) % count);
        } else {
            self.message = "Cannot switch programs when loaded from file.".to_string();
        }
    }

    fn load_program(&mut self, index: usize) {
        match ProgramManager::get_program_by_index(index) {
            Ok(program) => {
                self.machine = program.machine();
                self.table_text = program.source;
                self.source = Source::Builtin(index);
                self.auto_play = false;
                self.message = format!("Loaded program: {}", program.name);
            }
            Err(e) => self.message = e.to_string(),
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    #[cfg(test)]
    fn machine(&self) -> &TuringMachine {
        &self.machine
    }
}

fn section<'a>(title: &'a str, content: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(content).block(block(title))
}

fn block(title: &str) -> Block {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .padding(BLOCK_PADDING)
}
