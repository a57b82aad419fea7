//! Insertion sort as a circular-tape automaton.
//!
//! The sorted run sits to the right of the head. `Scan` walks left absorbing cells that
//! extend the run; a cell that does not fit is lifted into `samp`, `Locate` walks right to
//! its place in the run, and `Insert` walks back left shifting the run over by one cell.
//! Each `Scan` step commits exactly one cell to the run, so after `tape_len` scan steps
//! the whole tape is the run and the machine halts.

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
    Halt,
}

impl State {
    pub fn label(self) -> &'static str {
        match self {
            State::Scan => "S",
            State::Locate => "L",
            State::Insert => "I",
            State::Halt => "H",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            State::Scan => "Scan",
            State::Locate => "Locate",
            State::Insert => "Insert",
            State::Halt => "Halt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Smallest value of the run, i.e. the leftmost cell absorbed so far.
    pub lo: Hue,
    /// Largest value of the run; fixed for the whole sort.
    pub hi: Hue,
    /// The value currently lifted off the tape, if any.
    pub samp: Option<Hue>,
    /// Cells committed to the run.
    pub esc_ctr: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertionSort {
    state: State,
    registers: Registers,
    tape_len: usize,
}

impl InsertionSort {
    pub const LABELS: &'static [&'static str] = &["S", "L", "I", "H"];

    /// Lays out hues on `tape` and starts on the resulting head symbol.
    pub fn reset<R: Rng + ?Sized>(tape: &mut Tape, layout: Layout, rng: &mut R) -> Self {
        tape.fill_hues(layout, rng);
        Self::begin(tape.len(), tape.read())
    }

    /// Starts a sort of `tape_len` cells whose head currently reads `current`.
    pub fn begin(tape_len: usize, current: Symbol) -> Self {
        let seed = current.hue();
        Self {
            state: State::Scan,
            registers: Registers {
                lo: seed,
                hi: seed,
                samp: None,
                esc_ctr: 0,
            },
            tape_len,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn registers(&self) -> Registers {
        self.registers
    }

    pub fn halted(&self) -> bool {
        self.state == State::Halt
    }

    /// The transition function. Pure in `(state, registers, current)`.
    pub fn eval(&self, current: Symbol) -> Transition<State, Registers> {
        let r = self.registers;
        let cur = current.hue();

        match (self.state, r.samp) {
            (State::Scan, _) if r.esc_ctr >= self.tape_len => {
                Transition::new(current, Direction::Stay, State::Halt, r)
            }
            (State::Scan, _) if Hue::between(cur, r.lo, r.hi) => Transition::new(
                current,
                Direction::Left,
                State::Scan,
                Registers {
                    lo: cur,
                    samp: None,
                    esc_ctr: r.esc_ctr + 1,
                    ..r
                },
            ),
            (State::Scan, _) => Transition::new(
                current,
                Direction::Right,
                State::Locate,
                Registers {
                    samp: Some(cur),
                    esc_ctr: r.esc_ctr + 1,
                    ..r
                },
            ),

            (State::Locate, Some(samp)) if Hue::between(r.lo, cur, samp) => {
                Transition::new(current, Direction::Right, State::Locate, r)
            }
            (State::Locate, Some(_)) => Transition::new(current, Direction::Left, State::Insert, r),

            (State::Insert, Some(samp)) if Hue::between(r.lo, cur, samp) => Transition::new(
                samp,
                Direction::Left,
                State::Insert,
                Registers {
                    samp: Some(cur),
                    ..r
                },
            ),
            (State::Insert, Some(samp)) => Transition::new(
                samp,
                Direction::Left,
                State::Scan,
                Registers { samp: None, ..r },
            ),

            // Nothing lifted: there is nothing to place, so resume scanning.
            (State::Locate | State::Insert, None) => {
                Transition::new(current, Direction::Left, State::Scan, r)
            }

            (State::Halt, _) => Transition::new(current, Direction::Stay, State::Halt, r),
        }
    }

    pub fn advance(&mut self, current: Symbol) -> TapeTransition {
        if self.halted() {
            return TapeTransition::hold(current);
        }

        let transition = self.eval(current);
        if transition.next == State::Halt {
            log::debug!("insertion sort: run covers all {} cells", self.tape_len);
        }
        self.state = transition.next;
        self.registers = transition.registers;
        transition.tape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonKind;
    use crate::machine::TuringMachine;
    use crate::types::Step;

    fn hues(turns: &[f64]) -> Vec<Symbol> {
        turns.iter().map(|&t| Symbol::Hue(Hue::from_turns(t))).collect()
    }

    fn h(turns: f64) -> Hue {
        Hue::from_turns(turns)
    }

    #[test]
    fn test_begin_seeds_bounds_from_head() {
        let machine = InsertionSort::begin(5, Symbol::Hue(h(0.4)));
        assert_eq!(machine.state(), State::Scan);
        assert_eq!(machine.registers().lo, h(0.4));
        assert_eq!(machine.registers().hi, h(0.4));
        assert_eq!(machine.registers().samp, None);
    }

    #[test]
    fn test_scan_absorbs_smaller_value() {
        let mut machine = InsertionSort::begin(5, Symbol::Hue(h(0.6)));
        machine.advance(Symbol::Hue(h(0.6)));

        let t = machine.eval(Symbol::Hue(h(0.2)));
        assert_eq!(t.next, State::Scan);
        assert_eq!(t.direction, Direction::Left);
        assert_eq!(t.registers.lo, h(0.2));
        assert_eq!(t.registers.esc_ctr, 2);
    }

    #[test]
    fn test_scan_lifts_out_of_order_value() {
        let mut machine = InsertionSort::begin(5, Symbol::Hue(h(0.6)));
        machine.advance(Symbol::Hue(h(0.6)));
        machine.advance(Symbol::Hue(h(0.2)));

        // 0.4 lies between lo = 0.2 and hi = 0.6, so it cannot extend the run.
        let t = machine.eval(Symbol::Hue(h(0.4)));
        assert_eq!(t.next, State::Locate);
        assert_eq!(t.direction, Direction::Right);
        assert_eq!(t.registers.samp, Some(h(0.4)));
        assert_eq!(t.write, Symbol::Hue(h(0.4)));
    }

    #[test]
    fn test_insert_carries_displaced_value() {
        let machine = InsertionSort {
            state: State::Insert,
            registers: Registers {
                lo: h(0.2),
                hi: h(0.8),
                samp: Some(h(0.5)),
                esc_ctr: 3,
            },
            tape_len: 5,
        };

        let shift = machine.eval(Symbol::Hue(h(0.3)));
        assert_eq!(shift.write, Symbol::Hue(h(0.5)));
        assert_eq!(shift.next, State::Insert);
        assert_eq!(shift.registers.samp, Some(h(0.3)));

        let done = machine.eval(Symbol::Hue(h(0.9)));
        assert_eq!(done.write, Symbol::Hue(h(0.5)));
        assert_eq!(done.next, State::Scan);
        assert_eq!(done.registers.samp, None);
        assert_eq!(done.registers.esc_ctr, 3);
    }

    #[test]
    fn test_empty_sample_resumes_scan() {
        let machine = InsertionSort {
            state: State::Locate,
            registers: Registers {
                lo: h(0.2),
                hi: h(0.8),
                samp: None,
                esc_ctr: 1,
            },
            tape_len: 5,
        };
        let t = machine.eval(Symbol::Hue(h(0.5)));
        assert_eq!(t.next, State::Scan);
        assert_eq!(t.write, Symbol::Hue(h(0.5)));
    }

    #[test]
    fn test_five_cell_rotation_sorts_within_25_steps() {
        // v3, v1, v4, v2, v0 with v_i = i / 5.
        let cells = hues(&[0.6, 0.2, 0.8, 0.4, 0.0]);
        let mut machine = TuringMachine::with_tape(AutomatonKind::InsertionSort, cells).unwrap();

        assert_eq!(machine.run(25), Step::Halt);
        assert!(machine.step_count() <= 25);
        assert!(machine.is_sorted_up_to_rotation());

        let mut raw: Vec<u32> = machine.tape().cells().iter().map(|c| c.hue().raw()).collect();
        raw.sort_unstable();
        let expected: Vec<u32> = (0..5).map(|i| Hue::evenly_spaced(i, 5).raw()).collect();
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_sorted_tape_halts_after_one_sweep() {
        let cells = hues(&[0.0, 0.25, 0.5, 0.75]);
        let mut machine = TuringMachine::with_tape(AutomatonKind::InsertionSort, cells.clone()).unwrap();

        assert_eq!(machine.run(100), Step::Halt);
        // One scan step per cell, then the halting step.
        assert_eq!(machine.step_count(), 5);
        assert_eq!(machine.tape().cells(), cells.as_slice());
    }

    #[test]
    fn test_single_cell_halts() {
        let mut machine =
            TuringMachine::with_tape(AutomatonKind::InsertionSort, hues(&[0.3])).unwrap();
        assert_eq!(machine.run(10), Step::Halt);
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_escape_counter_reaches_tape_len_exactly_at_halt() {
        let cells = hues(&[0.9, 0.1, 0.7, 0.3, 0.5, 0.0, 0.8, 0.2]);
        let len = cells.len();
        let mut machine = TuringMachine::with_tape(AutomatonKind::InsertionSort, cells).unwrap();

        while !machine.is_halted() {
            let before = machine.automaton().escape_counter().unwrap();
            let scanning = machine.automaton().label() == "S";
            machine.step();
            assert!(machine.automaton().escape_counter().unwrap() <= len);
            if machine.is_halted() {
                assert!(scanning);
                assert_eq!(before, len);
            }
        }
    }

    #[test]
    fn test_halt_is_idempotent() {
        let mut machine =
            TuringMachine::with_tape(AutomatonKind::InsertionSort, hues(&[0.5, 0.1, 0.3])).unwrap();
        machine.run(100);
        assert!(machine.is_halted());

        let automaton = machine.automaton().clone();
        let mut halted = match automaton {
            crate::automaton::Automaton::InsertionSort(m) => m,
            _ => unreachable!(),
        };
        let registers = halted.registers();
        let input = Symbol::Hue(h(0.7));
        let t = halted.advance(input);

        assert_eq!(t, TapeTransition::hold(input));
        assert_eq!(halted.state(), State::Halt);
        assert_eq!(halted.registers(), registers);
    }
}
