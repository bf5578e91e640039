use keymap::KeyMap;

/// Key bindings of the full-screen viewer.
#[derive(KeyMap, Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Quit the application
    #[key("q")]
    Quit,
    /// Reset the machine to its initial configuration
    #[key("r")]
    Reset,
    /// Apply one transition
    #[key("space")]
    Step,
    /// Toggle auto-play
    #[key("p")]
    ToggleAutoPlay,
    /// Toggle help display
    #[key("h")]
    ToggleHelp,
    /// Load the previous built-in program
    #[key("left")]
    PreviousProgram,
    /// Load the next built-in program
    #[key("right")]
    NextProgram,
}

/// Key bindings of the interactive head position setup.
#[derive(KeyMap, Clone, Copy, Debug, PartialEq)]
pub enum SetupAction {
    /// Move the head one cell to the left
    #[key("left")]
    MoveLeft,
    /// Move the head one cell to the right
    #[key("right")]
    MoveRight,
    /// Start with the head at the selected cell
    #[key("enter")]
    Confirm,
    /// Leave the setup without starting
    #[key("esc")]
    Cancel,
    /// Leave the setup without starting
    #[key("ctrl-c")]
    Abort,
}
