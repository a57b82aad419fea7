mod app;

use action::Action;
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use ringtape::{AutomatonKind, Catalog, ConfigLoader, RunConfig};
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};
use std::{error::Error, io};

/// Sorting and sieving automata on a circular tape, with a Terminal User Interface.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  ringtape-tui
  ringtape-tui run.json
  ringtape-tui --machine sieve
  echo '{\"kind\": \"merge-sort\", \"tape_len\": 60}' | ringtape-tui")]
struct Cli {
    /// Path to a JSON run configuration.
    /// If not provided, the defaults are used.
    /// Can also pipe the configuration via stdin.
    config_file: Option<String>,

    /// The automaton to start with (insertion-sort, merge-sort or sieve)
    #[clap(short, long, value_parser = parse_machine)]
    machine: Option<AutomatonKind>,
}

/// Represents the state of the application loop.
#[derive(PartialEq)]
enum AppState {
    Running,
    ShouldQuit,
}

/// A wrapper around the terminal to ensure it's restored on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Creates a new TUI.
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore the terminal to its original state.
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Load the configuration before initializing the TUI, so errors reach stderr
    // instead of the alternate screen.
    let app = match load_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut tui = Tui::new()?;
    run_app(&mut tui.terminal, app)?;

    Ok(())
}

/// Builds the app from a config file, then from stdin, and finally from the defaults.
fn load_app(cli: &Cli) -> Result<App, String> {
    let (mut config, source) = if let Some(file_path) = &cli.config_file {
        let config = ConfigLoader::load_config(Path::new(file_path))
            .map_err(|e| format!("Failed to load '{}': {}", file_path, e))?;
        (config, Some(file_path.clone()))
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        let config = ConfigLoader::load_config_from_string(&buffer)
            .map_err(|e| format!("Failed to load configuration: {}", e))?;
        (config, Some("stdin".to_string()))
    } else {
        (RunConfig::default(), None)
    };

    if let Some(kind) = cli.machine {
        config.kind = kind;
        config.tape_len = config.tape_len.max(kind.min_tape_len());
    }

    App::new(config, source)
}

/// Accepts a machine name or its title, in any case.
fn parse_machine(name: &str) -> Result<AutomatonKind, String> {
    Catalog::kind_by_name(name).map_err(|_| {
        format!(
            "unknown machine '{}', expected one of: {}",
            name,
            Catalog::list_names().join(", ")
        )
    })
}

/// Runs the main application loop.
fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let elapsed = last_tick.elapsed().as_millis() as u64;
        last_tick += Duration::from_millis(elapsed);
        app.tick(elapsed);

        terminal.draw(|f| app.render(f))?;

        let timeout = if app.is_auto_playing() {
            Duration::from_millis(16) // Redraw often while the ring is turning
        } else {
            Duration::from_millis(100)
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key_event(&mut app, key) == AppState::ShouldQuit
                {
                    return Ok(());
                }
            }
        }
    }
}

/// Handles key events and updates the application state.
fn handle_key_event(app: &mut App, key: KeyEvent) -> AppState {
    if let Some(action) = app.keymap.get(&key) {
        match action {
            Action::Quit => return AppState::ShouldQuit,
            Action::Reset => app.reset_machine(),
            Action::Step => app.step_machine(),
            Action::ToggleAutoPlay => app.toggle_auto_play(),
            Action::ToggleHelp => app.toggle_help(),
            Action::PreviousMachine => app.previous_machine(),
            Action::NextMachine => app.next_machine(),
            Action::Faster => app.faster(),
            Action::Slower => app.slower(),
            Action::GrowTape => app.grow_tape(),
            Action::ShrinkTape => app.shrink_tape(),
            Action::ToggleLayout => app.toggle_layout(),
        }
    }
    AppState::Running
}
