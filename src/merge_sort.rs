//! Merge sort as a circular-tape automaton.
//!
//! `Scan` walks left over the run that is already ordered. The first cell that breaks
//! the order starts a second run: its cells are lifted one at a time, placed into the
//! first run by `Locate`/`Insert`, and `Fetch` picks up the next one for as long as the
//! second run keeps ascending. When it stops ascending the merged run becomes the run
//! `Scan` is extending.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::automaton::Transition;
use crate::hue::Hue;
use crate::symbol::Symbol;
use crate::tape::{Layout, Tape};
use crate::types::{Direction, TapeTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Scan,
    Locate,
    Insert,
    Fetch,
    Halt,
}

impl State {
    pub fn label(self) -> &'static str {
        match self {
            State::Scan => "S",
            State::Locate => "L",
            State::Insert => "I",
            State::Fetch => "F",
            State::Halt => "H",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            State::Scan => "Scan",
            State::Locate => "Locate",
            State::Insert => "Insert",
            State::Fetch => "Fetch",
            State::Halt => "Halt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    pub lo: Hue,
    /// While merging, the last value taken from the second run.
    pub hi: Hue,
    pub samp: Option<Hue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeSort {
    state: State,
    registers: Registers,
    /// Length of the ordered run `Scan` has walked over. Zero outside `Scan`.
    esc_ctr: usize,
    tape_len: usize,
}

impl MergeSort {
    pub const LABELS: &'static [&'static str] = &["S", "L", "I", "F", "H"];

    pub fn reset<R: Rng + ?Sized>(tape: &mut Tape, layout: Layout, rng: &mut R) -> Self {
        tape.fill_hues(layout, rng);
        Self::begin(tape.len(), tape.read())
    }

    pub fn begin(tape_len: usize, current: Symbol) -> Self {
        let seed = current.hue();
        Self {
            state: State::Scan,
            registers: Registers {
                lo: seed,
                hi: seed,
                samp: None,
            },
            esc_ctr: 0,
            tape_len,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn esc_ctr(&self) -> usize {
        self.esc_ctr
    }

    pub fn halted(&self) -> bool {
        self.state == State::Halt
    }

    /// Evaluates one step without committing it. The second element is the escape
    /// counter the automaton continues with.
    pub fn eval(&self, current: Symbol) -> (Transition<State, Registers>, usize) {
        let r = self.registers;
        let cur = current.hue();

        match (self.state, r.samp) {
            (State::Scan, _) if self.esc_ctr >= self.tape_len => (
                Transition::new(current, Direction::Stay, State::Halt, r),
                self.esc_ctr,
            ),
            (State::Scan, _) if Hue::between(cur, r.lo, r.hi) => (
                Transition::new(
                    current,
                    Direction::Left,
                    State::Scan,
                    Registers { lo: cur, ..r },
                ),
                self.esc_ctr + 1,
            ),
            (State::Scan, _) => (
                Transition::new(
                    current,
                    Direction::Right,
                    State::Locate,
                    Registers {
                        hi: cur,
                        samp: Some(cur),
                        ..r
                    },
                ),
                0,
            ),

            (State::Locate, Some(samp)) if Hue::between(r.lo, cur, samp) => {
                (Transition::new(current, Direction::Right, State::Locate, r), 0)
            }
            (State::Locate, Some(_)) => {
                (Transition::new(current, Direction::Left, State::Insert, r), 0)
            }

            (State::Insert, Some(samp)) if Hue::between(r.lo, cur, samp) => (
                Transition::new(
                    samp,
                    Direction::Left,
                    State::Insert,
                    Registers {
                        samp: Some(cur),
                        ..r
                    },
                ),
                0,
            ),
            (State::Insert, Some(samp)) => (
                Transition::new(
                    samp,
                    Direction::Left,
                    State::Fetch,
                    Registers { samp: None, ..r },
                ),
                0,
            ),

            (State::Locate | State::Insert, None) => (
                Transition::new(current, Direction::Left, State::Fetch, r),
                0,
            ),

            (State::Fetch, _) if Hue::between(r.lo, cur, r.hi) => (
                Transition::new(
                    current,
                    Direction::Right,
                    State::Locate,
                    Registers {
                        hi: cur,
                        samp: Some(cur),
                        ..r
                    },
                ),
                0,
            ),
            // The fetched cell is the first cell of the run Scan continues with.
            (State::Fetch, _) => (
                Transition::new(
                    current,
                    Direction::Left,
                    State::Scan,
                    Registers {
                        lo: cur,
                        hi: cur,
                        samp: None,
                    },
                ),
                1,
            ),

            (State::Halt, _) => (
                Transition::new(current, Direction::Stay, State::Halt, r),
                self.esc_ctr,
            ),
        }
    }

    pub fn advance(&mut self, current: Symbol) -> TapeTransition {
        if self.halted() {
            return TapeTransition::hold(current);
        }

        let (transition, esc_ctr) = self.eval(current);
        if transition.next == State::Halt {
            log::debug!("merge sort: single run of {} cells", self.tape_len);
        }
        self.state = transition.next;
        self.registers = transition.registers;
        self.esc_ctr = esc_ctr;
        transition.tape()
    }
}
