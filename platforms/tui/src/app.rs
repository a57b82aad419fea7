use action::Action;
use keymap::{Config, KeyMapConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Points, Rectangle},
        Block, BorderType, Borders, Padding, Paragraph, Wrap,
    },
    Frame,
};
use ringtape::{
    player::head_offset,
    Catalog, Layout as TapeLayout, Player, RunConfig, Step, Symbol, TuringMachine, MAX_TAPE_LEN,
};
use std::f64::consts::PI;

const BLOCK_PADDING: Padding = Padding::new(1, 1, 0, 0);

/// Cells added or removed per grow/shrink key press.
const TAPE_STEP: usize = 5;

/// Half-extent of the canvas the ring is drawn on; the ring itself has radius 1.
const RING_BOUND: f64 = 1.25;

pub struct App {
    machine: TuringMachine,
    config: RunConfig,
    player: Player,
    message: String,
    show_help: bool,
    pub(crate) keymap: Config<Action>,
    /// Where the configuration came from, if not the defaults.
    source: Option<String>,
}

impl App {
    pub fn new(config: RunConfig, source: Option<String>) -> Result<Self, String> {
        let machine = TuringMachine::new(&config)
            .map_err(|e| format!("Failed to start machine: {}", e))?;

        Ok(Self {
            machine,
            player: Player::new(config.speed_ms),
            config,
            message: "Press 'h' for help.".to_string(),
            show_help: false,
            keymap: Action::keymap_config(),
            source,
        })
    }

    pub fn render(&mut self, f: &mut Frame) {
        let inner_area = f.area().inner(Margin::new(1, 0));

        // Main vertical chunks: Machine Info, Middle (Ring + State), Status
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(inner_area);

        self.render_machine_info(f, main_chunks[0]);

        let middle_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60),
                Constraint::Length(1),
                Constraint::Percentage(40),
            ])
            .split(main_chunks[1]);

        self.render_tape(f, middle_chunks[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(middle_chunks[2]);

        self.render_machine_state(f, right_chunks[0]);

        if self.show_help {
            self.render_help(f, right_chunks[1]);
        } else {
            self.render_result(f, right_chunks[1]);
        }

        self.render_status(f, main_chunks[2]);
    }

    fn render_machine_info(&self, f: &mut Frame, area: Rect) {
        let kind = self.config.kind;
        let index = Catalog::index_of(kind);

        let mut text = vec![Line::from(vec![
            Span::styled("Machine: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                "{} ({}/{})",
                kind.title(),
                index + 1,
                Catalog::count()
            )),
        ])];

        let layout = if kind.is_sort() {
            self.config.layout.name()
        } else {
            "unmarked"
        };
        let seed = self
            .config
            .seed
            .map_or_else(|| "random".to_string(), |seed| seed.to_string());
        text.push(Line::from(vec![
            Span::styled("Tape: ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{} cells", self.machine.tape().len())),
            Span::styled(" | Layout: ", Style::default().fg(Color::Yellow)),
            Span::raw(layout),
            Span::styled(" | Seed: ", Style::default().fg(Color::Yellow)),
            Span::raw(seed),
        ]));

        text.push(Line::from(vec![
            Span::styled("States: ", Style::default().fg(Color::Yellow)),
            Span::raw(kind.labels().join(" ")),
            Span::styled(" | Config: ", Style::default().fg(Color::Yellow)),
            Span::raw(self.source.as_deref().unwrap_or("defaults")),
        ]));

        let paragraph = Paragraph::new(text)
            .block(block("Ringtape - Sorting on a Circular Tape (TUI)").title_alignment(Alignment::Center));

        f.render_widget(paragraph, area);
    }

    /// Draws the tape as a ring with the head window at the top. The ring turns under the
    /// head as the player interpolates the last move.
    fn render_tape(&self, f: &mut Frame, area: Rect) {
        let outer = block("Tape");
        let canvas_area = square(outer.inner(area));
        f.render_widget(outer, area);

        let tape = self.machine.tape();
        let len = tape.len();
        let previous = self.machine.previous_head();
        let offset = head_offset(previous, tape.head(), len) as f64;
        let rotation = previous as f64 + offset * self.player.interpolation();

        let box_wid = {
            let w = 2.0 * PI / (1.2 * len as f64);
            w / (1.0 + w)
        };
        // HalfBlock gives one pixel per column and two per row, so on a square area
        // both axes have the same resolution.
        let pixel = 2.0 * RING_BOUND / f64::from(canvas_area.width.max(1));

        let cells: Vec<(f64, f64, Color)> = tape
            .cells()
            .iter()
            .enumerate()
            .map(|(i, &cell)| {
                let angle = 2.0 * PI * (i as f64 - rotation) / len as f64;
                (angle.sin(), angle.cos(), colour(cell))
            })
            .collect();
        let view = self.machine.automaton().head_view();

        let canvas = Canvas::default()
            .marker(Marker::HalfBlock)
            .x_bounds([-RING_BOUND, RING_BOUND])
            .y_bounds([-RING_BOUND, RING_BOUND])
            .paint(move |ctx| {
                for &(x, y, color) in &cells {
                    let coords = filled_square(x, y, box_wid, pixel);
                    ctx.draw(&Points {
                        coords: &coords,
                        color,
                    });
                }

                let window = box_wid * 1.4;
                ctx.draw(&Rectangle {
                    x: -window / 2.0,
                    y: 1.0 - window / 2.0,
                    width: window,
                    height: window,
                    color: Color::White,
                });

                ctx.layer();
                ctx.print(
                    -0.05,
                    0.3,
                    Span::styled(
                        view.label,
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                );
                for (row, (name, value)) in view.registers.iter().enumerate() {
                    ctx.print(
                        -0.3,
                        0.1 - row as f64 * 0.2,
                        Line::from(vec![Span::raw(format!("{:>4} ", name)), swatch(*value)]),
                    );
                }
            });

        f.render_widget(canvas, canvas_area);
    }

    fn render_machine_state(&self, f: &mut Frame, area: Rect) {
        let automaton = self.machine.automaton();
        let step_count = self.machine.step_count();
        let is_halted = self.machine.is_halted();

        let (status_text, status_color) = if is_halted {
            ("HALTED", Color::Red)
        } else if step_count == 0 {
            ("READY", Color::Blue)
        } else {
            ("RUNNING", Color::Green)
        };

        let mut text = vec![
            Line::from(vec![
                Span::styled("Current State: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} ({})", automaton.state_name(), automaton.label()),
                    Style::default()
                        .fg(status_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
                Span::raw(step_count.to_string()),
                Span::styled(" | Status: ", Style::default().fg(Color::Yellow)),
                Span::styled(status_text, Style::default().fg(status_color)),
            ]),
            Line::from(vec![
                Span::styled("Head: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.machine.tape().head().to_string()),
                Span::styled(" | Symbol: ", Style::default().fg(Color::Cyan)),
                swatch(Some(self.machine.tape().read())),
            ]),
        ];

        if let Some(esc) = automaton.escape_counter() {
            text.push(Line::from(vec![
                Span::styled("Escape counter: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("{} / {}", esc, self.machine.tape().len())),
            ]));
        }

        text.push(Line::from(vec![
            Span::styled("Speed: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{} ms/step", self.player.speed_ms())),
        ]));

        f.render_widget(section("Machine State", text), area);
    }

    fn render_result(&self, f: &mut Frame, area: Rect) {
        let text = if self.config.kind.is_sort() {
            let sorted = self.machine.is_sorted_up_to_rotation();
            vec![Line::from(vec![
                Span::styled("Sorted: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    if sorted { "yes" } else { "no" },
                    Style::default().fg(if sorted { Color::Green } else { Color::Red }),
                ),
            ])]
        } else if self.machine.is_halted() {
            let primes: Vec<String> = self.machine.primes().iter().map(|p| p.to_string()).collect();
            vec![
                Line::from(Span::styled(
                    format!("{} primes up to {}:", primes.len(), self.machine.tape().len()),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(primes.join(", ")),
            ]
        } else {
            vec![Line::from("Primes appear here once the sieve halts.")]
        };

        f.render_widget(section("Result", text).wrap(Wrap { trim: false }), area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("Controls:"),
            Line::from("  Space - Step forward"),
            Line::from("  r - New run"),
            Line::from("  p - Toggle auto-play"),
            Line::from("  ← → - Switch machines"),
            Line::from("  ↑ ↓ - Faster / slower"),
            Line::from("  g s - Grow / shrink the tape"),
            Line::from("  l - Toggle shuffled / reversed layout"),
            Line::from("  h - Toggle this help"),
            Line::from("  q - Quit"),
            Line::from(""),
            Line::from("The head sits at the top of the ring; its state label and"),
            Line::from("registers are drawn in the middle."),
        ];

        f.render_widget(section("Help", help_text), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let outer = block("Status");
        let auto_play_status = if self.player.is_paused() { "OFF" } else { "ON" };
        let status = Text::from(Line::from(vec![
            Span::raw("Auto-play: "),
            Span::styled(auto_play_status, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" | {}", self.message)),
        ]));

        f.render_widget(Paragraph::new(status).block(outer), area);
    }

    /// Advances playback by `elapsed_ms` and executes the ticks that became due.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.machine.is_halted() {
            return;
        }

        for _ in 0..self.player.elapse(elapsed_ms) {
            self.machine.step();
            if self.machine.is_halted() {
                self.on_halt();
                break;
            }
        }
    }

    pub fn step_machine(&mut self) {
        match self.machine.step() {
            Step::Continue if self.machine.is_halted() => self.on_halt(),
            Step::Continue => {
                self.message = format!("Step {} completed", self.machine.step_count());
            }
            Step::Halt => {
                self.message = "Machine is halted. Press 'r' for a new run.".to_string();
            }
        }
        self.player.restart();
    }

    fn on_halt(&mut self) {
        self.player.pause();
        self.message = format!(
            "Machine halted after {} steps. Press 'r' for a new run.",
            self.machine.step_count()
        );
    }

    pub fn reset_machine(&mut self) {
        match self.machine.reset() {
            Ok(()) => self.message = "New run".to_string(),
            Err(e) => self.message = e.to_string(),
        }
        self.player.restart();
    }

    pub fn toggle_auto_play(&mut self) {
        let paused = self.player.toggle();
        self.message = format!("Auto-play {}", if paused { "disabled" } else { "enabled" });
    }

    pub fn is_auto_playing(&self) -> bool {
        !self.player.is_paused() && !self.machine.is_halted()
    }

    pub fn next_machine(&mut self) {
        self.config.kind = Catalog::next(self.config.kind);
        self.apply_config();
    }

    pub fn previous_machine(&mut self) {
        self.config.kind = Catalog::previous(self.config.kind);
        self.apply_config();
    }

    pub fn faster(&mut self) {
        self.set_speed(self.player.speed_ms() * 2 / 3);
    }

    pub fn slower(&mut self) {
        self.set_speed(self.player.speed_ms() * 3 / 2 + 1);
    }

    fn set_speed(&mut self, speed_ms: u64) {
        self.player.set_speed(speed_ms);
        self.config.speed_ms = self.player.speed_ms();
        self.message = format!("Speed {} ms/step", self.config.speed_ms);
    }

    pub fn grow_tape(&mut self) {
        self.config.tape_len = (self.config.tape_len + TAPE_STEP).min(MAX_TAPE_LEN);
        self.apply_config();
    }

    pub fn shrink_tape(&mut self) {
        self.config.tape_len = self
            .config
            .tape_len
            .saturating_sub(TAPE_STEP)
            .max(self.config.kind.min_tape_len());
        self.apply_config();
    }

    pub fn toggle_layout(&mut self) {
        self.config.layout = match self.config.layout {
            TapeLayout::Shuffled => TapeLayout::Reversed,
            TapeLayout::Reversed => TapeLayout::Shuffled,
        };
        self.apply_config();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Starts a fresh run with the current configuration.
    fn apply_config(&mut self) {
        self.config.tape_len = self.config.tape_len.max(self.config.kind.min_tape_len());
        match self.machine.reconfigure(&self.config) {
            Ok(()) => {
                self.message = format!(
                    "Loaded {} on {} cells",
                    self.config.kind.title(),
                    self.config.tape_len
                );
            }
            Err(e) => self.message = e.to_string(),
        }
        self.player.restart();
    }
}

fn colour(symbol: Symbol) -> Color {
    let rgb = symbol.rgb();
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// A small coloured block for a register or cell; an empty register is drawn as a dot.
fn swatch(symbol: Option<Symbol>) -> Span<'static> {
    match symbol {
        Some(symbol) => Span::styled(
            format!(" {} ", symbol),
            Style::default().bg(colour(symbol)).fg(Color::Black),
        ),
        None => Span::styled(" · ", Style::default().fg(Color::DarkGray)),
    }
}

/// Pixel centres covering a `side` by `side` square centred on `(x, y)`.
fn filled_square(x: f64, y: f64, side: f64, pixel: f64) -> Vec<(f64, f64)> {
    let steps = (side / pixel).ceil().max(1.0) as usize;
    let stride = side / steps as f64;
    let start = (stride - side) / 2.0;

    (0..steps)
        .flat_map(|i| (0..steps).map(move |j| (i, j)))
        .map(|(i, j)| (x + start + i as f64 * stride, y + start + j as f64 * stride))
        .collect()
}

/// The largest area inside `area` that renders as a square, given two-to-one cells.
fn square(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(2));
    let height = width / 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
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
