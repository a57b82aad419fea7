//! This module defines the `TuringMachine` driver, which owns a circular tape and one
//! automaton and executes ticks: read the symbol under the head, let the automaton decide,
//! write, move.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::automaton::{Automaton, AutomatonKind};
use crate::config::RunConfig;
use crate::symbol::{Flags, Symbol};
use crate::tape::Tape;
use crate::types::{MachineError, Step};

/// A tape plus the automaton running on it.
///
/// The driver is the only writer of the tape from reset until the next reset. The
/// automaton only ever sees the symbol under the head.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    tape: Tape,
    automaton: Automaton,
    config: RunConfig,
    /// Contents supplied through [`TuringMachine::with_tape`]; restored on reset.
    supplied: Option<Vec<Symbol>>,
    rng: SmallRng,
    step_count: usize,
    previous_head: usize,
}

/// A serializable picture of a machine, used for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub machine: AutomatonKind,
    pub state: &'static str,
    pub label: &'static str,
    pub step_count: usize,
    pub halted: bool,
    pub head: usize,
    pub cells: Vec<Symbol>,
    /// Set for the sort automata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted: Option<bool>,
    /// Set for the sieve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primes: Option<Vec<usize>>,
}

impl TuringMachine {
    /// Creates a machine for `config` and lays out its starting tape.
    ///
    /// # Arguments
    ///
    /// * `config` - The automaton, tape length, layout and seed to start from.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::InvalidConfiguration)` if the tape length is out of range for
    ///   the automaton.
    pub fn new(config: &RunConfig) -> Result<Self, MachineError> {
        config.validate()?;

        let mut rng = seeded_rng(config.seed);
        let mut tape = Tape::new(config.tape_len, Symbol::default())?;
        let automaton = Automaton::reset(config.kind, &mut tape, config.layout, &mut rng)?;

        Ok(Self {
            tape,
            automaton,
            config: config.clone(),
            supplied: None,
            rng,
            step_count: 0,
            previous_head: 0,
        })
    }

    /// Creates a machine running `kind` on caller-supplied cells, head on cell 0.
    pub fn with_tape(kind: AutomatonKind, cells: Vec<Symbol>) -> Result<Self, MachineError> {
        let tape = Tape::from_cells(cells.clone())?;
        let automaton = Automaton::begin(kind, &tape)?;

        Ok(Self {
            config: RunConfig::new(kind, tape.len()),
            tape,
            automaton,
            supplied: Some(cells),
            rng: seeded_rng(Some(0)),
            step_count: 0,
            previous_head: 0,
        })
    }

    /// Executes a single tick.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the automaton performed a step.
    /// * `Step::Halt` if the automaton was already halted. The tape is left untouched.
    pub fn step(&mut self) -> Step {
        if self.is_halted() {
            return Step::Halt;
        }

        let current = self.tape.read();
        let transition = self.automaton.advance(current);

        self.previous_head = self.tape.head();
        self.tape.apply(transition);
        self.step_count += 1;

        log::trace!(
            "step {}: {} at {} read {} wrote {} moved {:?}",
            self.step_count,
            self.automaton.label(),
            self.previous_head,
            current,
            transition.write,
            transition.direction
        );

        Step::Continue
    }

    /// Runs at most `limit` ticks.
    ///
    /// Returns `Step::Halt` if the automaton halted, `Step::Continue` if the limit ran out
    /// first.
    pub fn run(&mut self, limit: usize) -> Step {
        for _ in 0..limit {
            if self.step() == Step::Halt {
                return Step::Halt;
            }
        }

        if self.is_halted() {
            Step::Halt
        } else {
            Step::Continue
        }
    }

    /// Runs until the automaton halts, bounded by its step budget for this tape length.
    pub fn run_to_halt(&mut self) -> Step {
        let budget = self.config.kind.step_budget(self.tape.len());
        self.run(budget)
    }

    /// Starts the run over.
    ///
    /// A seeded machine reproduces its starting tape exactly. An unseeded one keeps
    /// drawing from the same generator, so each reset shuffles anew.
    pub fn reset(&mut self) -> Result<(), MachineError> {
        self.automaton = match &self.supplied {
            Some(cells) => {
                self.tape.set_cells(cells.clone())?;
                Automaton::begin(self.config.kind, &self.tape)?
            }
            None => {
                if let Some(seed) = self.config.seed {
                    self.rng = SmallRng::seed_from_u64(seed);
                }
                Automaton::reset(
                    self.config.kind,
                    &mut self.tape,
                    self.config.layout,
                    &mut self.rng,
                )?
            }
        };
        self.step_count = 0;
        self.previous_head = 0;
        Ok(())
    }

    /// Switches to a new configuration and starts a fresh run.
    ///
    /// On error the machine keeps running its current configuration.
    pub fn reconfigure(&mut self, config: &RunConfig) -> Result<(), MachineError> {
        *self = Self::new(config)?;
        Ok(())
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Returns the total number of ticks since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_halted(&self) -> bool {
        self.automaton.halted()
    }

    /// Where the head was before the last tick, for animating the move.
    pub fn previous_head(&self) -> usize {
        self.previous_head
    }

    /// The 1-based positions of cells still flagged as prime candidates. Hue cells are
    /// never candidates.
    pub fn primes(&self) -> Vec<usize> {
        self.tape
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| matches!(cell, Symbol::Flags(f) if f.contains(Flags::MAYBE_PRIME)))
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Whether the hues on the tape ascend around the ring from some starting cell.
    pub fn is_sorted_up_to_rotation(&self) -> bool {
        let raw: Vec<u32> = self.tape.cells().iter().map(|c| c.hue().raw()).collect();
        let descents = (0..raw.len())
            .filter(|&i| raw[i] > raw[(i + 1) % raw.len()])
            .count();
        descents <= 1
    }

    pub fn snapshot(&self) -> Snapshot {
        let kind = self.automaton.kind();
        Snapshot {
            machine: kind,
            state: self.automaton.state_name(),
            label: self.automaton.label(),
            step_count: self.step_count,
            halted: self.is_halted(),
            head: self.tape.head(),
            cells: self.tape.cells().to_vec(),
            sorted: kind.is_sort().then(|| self.is_sorted_up_to_rotation()),
            primes: (!kind.is_sort()).then(|| self.primes()),
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}
