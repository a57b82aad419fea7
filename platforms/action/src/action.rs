use keymap::KeyMap;

#[derive(KeyMap, Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Quit the application
    #[key("q")]
    Quit,
    /// Start a new run of the current machine
    #[key("r")]
    Reset,
    /// Advance the machine by one step
    #[key("space")]
    Step,
    /// Toggle auto-play
    #[key("p")]
    ToggleAutoPlay,
    /// Toggle help display
    #[key("h")]
    ToggleHelp,
    /// Switch to the previous machine
    #[key("left")]
    PreviousMachine,
    /// Switch to the next machine
    #[key("right")]
    NextMachine,
    /// Step faster
    #[key("up")]
    Faster,
    /// Step slower
    #[key("down")]
    Slower,
    /// Add cells to the tape
    #[key("g")]
    GrowTape,
    /// Remove cells from the tape
    #[key("s")]
    ShrinkTape,
    /// Switch between shuffled and reversed starting layouts
    #[key("l")]
    ToggleLayout,
}
