//! The automaton contract: the closed set of algorithms a run can execute.
//!
//! Every automaton is a finite-state machine plus a handful of registers. The driver hands
//! it the symbol under the head, and it answers with what to write and where to move. It
//! never sees the rest of the tape.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::hue::Hue;
use crate::insertion_sort::InsertionSort;
use crate::merge_sort::MergeSort;
use crate::sieve::Sieve;
use crate::symbol::Symbol;
use crate::tape::{Layout, Tape};
use crate::types::{Direction, MachineError, TapeTransition};

/// Identifies one of the available algorithms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomatonKind {
    #[default]
    InsertionSort,
    MergeSort,
    Sieve,
}

impl AutomatonKind {
    pub const ALL: [AutomatonKind; 3] = [
        AutomatonKind::InsertionSort,
        AutomatonKind::MergeSort,
        AutomatonKind::Sieve,
    ];

    /// The identifier used on the command line and in config files.
    pub fn name(self) -> &'static str {
        match self {
            AutomatonKind::InsertionSort => "insertion-sort",
            AutomatonKind::MergeSort => "merge-sort",
            AutomatonKind::Sieve => "sieve",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AutomatonKind::InsertionSort => "Insertion sort",
            AutomatonKind::MergeSort => "Merge sort",
            AutomatonKind::Sieve => "Sieve of Eratosthenes",
        }
    }

    pub fn is_sort(self) -> bool {
        !matches!(self, AutomatonKind::Sieve)
    }

    /// Every state label the automaton can show, in state order.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            AutomatonKind::InsertionSort => InsertionSort::LABELS,
            AutomatonKind::MergeSort => MergeSort::LABELS,
            AutomatonKind::Sieve => Sieve::LABELS,
        }
    }

    /// The shortest tape the automaton is guaranteed to halt on.
    pub fn min_tape_len(self) -> usize {
        match self {
            AutomatonKind::InsertionSort | AutomatonKind::MergeSort => 1,
            // On a single cell the sieve's tally never finds its end.
            AutomatonKind::Sieve => 2,
        }
    }

    pub fn check_tape_len(self, len: usize) -> Result<(), MachineError> {
        if len < self.min_tape_len() {
            return Err(MachineError::InvalidConfiguration(format!(
                "{} needs a tape of at least {} cells, got {}",
                self.name(),
                self.min_tape_len(),
                len
            )));
        }
        Ok(())
    }

    /// An upper bound on the number of steps a run on `len` cells takes to halt.
    pub fn step_budget(self, len: usize) -> usize {
        match self {
            AutomatonKind::InsertionSort | AutomatonKind::MergeSort => 2 * len * (len + 2),
            AutomatonKind::Sieve => 4 * len * len + 16,
        }
    }
}

impl fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AutomatonKind {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        AutomatonKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| MachineError::UnknownMachine(s.to_string()))
    }
}

/// The result of evaluating a transition function once: what to write, where to move,
/// and the state and registers the automaton continues with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<S, R> {
    pub write: Symbol,
    pub direction: Direction,
    pub next: S,
    pub registers: R,
}

impl<S, R> Transition<S, R> {
    pub fn new(write: impl Into<Symbol>, direction: Direction, next: S, registers: R) -> Self {
        Self {
            write: write.into(),
            direction,
            next,
            registers,
        }
    }

    pub fn tape(&self) -> TapeTransition {
        TapeTransition {
            write: self.write,
            direction: self.direction,
        }
    }
}

/// What a renderer draws at the head: the state label and any register contents.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadView {
    pub label: &'static str,
    /// Register name and content; `None` is an empty register.
    pub registers: Vec<(&'static str, Option<Symbol>)>,
}

/// One of the available automata together with its current state and registers.
#[derive(Debug, Clone, PartialEq)]
pub enum Automaton {
    InsertionSort(InsertionSort),
    MergeSort(MergeSort),
    Sieve(Sieve),
}

impl Automaton {
    /// Prepares `tape` for a fresh run of `kind` and returns the automaton in its initial
    /// state. Sorts lay out distinct hues according to `layout`; the sieve marks every
    /// cell as a prime candidate.
    pub fn reset<R: Rng + ?Sized>(
        kind: AutomatonKind,
        tape: &mut Tape,
        layout: Layout,
        rng: &mut R,
    ) -> Result<Self, MachineError> {
        kind.check_tape_len(tape.len())?;
        let automaton = match kind {
            AutomatonKind::InsertionSort => Automaton::InsertionSort(InsertionSort::reset(
                tape, layout, rng,
            )),
            AutomatonKind::MergeSort => {
                Automaton::MergeSort(MergeSort::reset(tape, layout, rng))
            }
            AutomatonKind::Sieve => Automaton::Sieve(Sieve::reset(tape)?),
        };
        log::debug!(
            "reset {} on {} cells ({})",
            kind,
            tape.len(),
            if kind.is_sort() { layout.name() } else { "unmarked" }
        );
        Ok(automaton)
    }

    /// Starts `kind` on a tape whose contents the caller already arranged, seeding the
    /// registers from the symbol under the head.
    ///
    /// The sorts only terminate on pairwise distinct hues, so flag cells and repeated
    /// hues are rejected. The sieve needs flag cells throughout.
    pub fn begin(kind: AutomatonKind, tape: &Tape) -> Result<Self, MachineError> {
        kind.check_tape_len(tape.len())?;
        check_cells(kind, tape.cells())?;
        let current = tape.read();
        Ok(match kind {
            AutomatonKind::InsertionSort => {
                Automaton::InsertionSort(InsertionSort::begin(tape.len(), current))
            }
            AutomatonKind::MergeSort => Automaton::MergeSort(MergeSort::begin(tape.len(), current)),
            AutomatonKind::Sieve => Automaton::Sieve(Sieve::begin()),
        })
    }

    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::InsertionSort(_) => AutomatonKind::InsertionSort,
            Automaton::MergeSort(_) => AutomatonKind::MergeSort,
            Automaton::Sieve(_) => AutomatonKind::Sieve,
        }
    }

    /// Evaluates one step for the symbol under the head and commits the resulting state.
    /// Once halted this writes the input back and does not move.
    pub fn advance(&mut self, current: Symbol) -> TapeTransition {
        match self {
            Automaton::InsertionSort(machine) => machine.advance(current),
            Automaton::MergeSort(machine) => machine.advance(current),
            Automaton::Sieve(machine) => machine.advance(current),
        }
    }

    pub fn halted(&self) -> bool {
        match self {
            Automaton::InsertionSort(machine) => machine.halted(),
            Automaton::MergeSort(machine) => machine.halted(),
            Automaton::Sieve(machine) => machine.halted(),
        }
    }

    /// Short diagnostic tag for the current state.
    pub fn label(&self) -> &'static str {
        match self {
            Automaton::InsertionSort(machine) => machine.state().label(),
            Automaton::MergeSort(machine) => machine.state().label(),
            Automaton::Sieve(machine) => machine.state().label(),
        }
    }

    /// The current state's full name, e.g. `Locate` or `DivFetch`.
    pub fn state_name(&self) -> &'static str {
        match self {
            Automaton::InsertionSort(machine) => machine.state().name(),
            Automaton::MergeSort(machine) => machine.state().name(),
            Automaton::Sieve(machine) => machine.state().name(),
        }
    }

    /// The scan counter of the sort automata; the sieve has none.
    pub fn escape_counter(&self) -> Option<usize> {
        match self {
            Automaton::InsertionSort(machine) => Some(machine.registers().esc_ctr),
            Automaton::MergeSort(machine) => Some(machine.esc_ctr()),
            Automaton::Sieve(_) => None,
        }
    }

    pub fn head_view(&self) -> HeadView {
        match self {
            Automaton::InsertionSort(machine) => {
                let r = machine.registers();
                HeadView {
                    label: machine.state().label(),
                    registers: sort_registers(r.lo, r.samp, r.hi),
                }
            }
            Automaton::MergeSort(machine) => {
                let r = machine.registers();
                HeadView {
                    label: machine.state().label(),
                    registers: sort_registers(r.lo, r.samp, r.hi),
                }
            }
            Automaton::Sieve(machine) => HeadView {
                label: machine.state().label(),
                registers: Vec::new(),
            },
        }
    }
}

fn check_cells(kind: AutomatonKind, cells: &[Symbol]) -> Result<(), MachineError> {
    if !kind.is_sort() {
        return match cells.iter().position(|cell| !matches!(cell, Symbol::Flags(_))) {
            Some(index) => Err(MachineError::InvalidConfiguration(format!(
                "{} needs flag cells, cell {} holds a hue",
                kind, index
            ))),
            None => Ok(()),
        };
    }

    let mut seen = HashSet::with_capacity(cells.len());
    for (index, cell) in cells.iter().enumerate() {
        match cell {
            Symbol::Hue(hue) if !seen.insert(*hue) => {
                return Err(MachineError::InvalidConfiguration(format!(
                    "{} needs distinct hues, cell {} repeats {}",
                    kind,
                    index,
                    cell
                )));
            }
            Symbol::Hue(_) => {}
            Symbol::Flags(_) => {
                return Err(MachineError::InvalidConfiguration(format!(
                    "{} needs hue cells, cell {} holds flags",
                    kind, index
                )));
            }
        }
    }
    Ok(())
}

fn sort_registers(lo: Hue, samp: Option<Hue>, hi: Hue) -> Vec<(&'static str, Option<Symbol>)> {
    vec![
        ("lo", Some(Symbol::Hue(lo))),
        ("samp", samp.map(Symbol::Hue)),
        ("hi", Some(Symbol::Hue(hi))),
    ]
}
