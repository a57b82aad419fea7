//! Sieve of Eratosthenes on a circular tape.
//!
//! Cell `i` (0-based) stands for the number `i + 1`. The automaton has no registers; all
//! of its memory is the three flag bits of each cell. Quantities such as the current
//! prime or `n / p` are represented as unary tallies: runs of cells carrying
//! [`Flags::UNARY_SEQ`].

use serde::{Deserialize, Serialize};

use crate::symbol::{Flags, Symbol};
use crate::tape::Tape;
use crate::types::{Direction, MachineError, TapeTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    Init,
    FindPrevPrime,
    FindNextPrime,
    MoveLocateSeq,
    MoveNonMultiple,
    MoveMultiple,
    MoveReturn,
    DivLocateFirst,
    DivLocateNext,
    DivFetch,
    DivIncrement,
    Cleanup,
    Halt,
}

impl State {
    pub fn label(self) -> &'static str {
        match self {
            State::Init => "I",
            State::FindPrevPrime => "F1",
            State::FindNextPrime => "F2",
            State::MoveLocateSeq => "M1",
            State::MoveNonMultiple => "M2",
            State::MoveMultiple => "M3",
            State::MoveReturn => "M4",
            State::DivLocateFirst => "D1",
            State::DivLocateNext => "D2",
            State::DivFetch => "D3",
            State::DivIncrement => "D4",
            State::Cleanup => ":D",
            State::Halt => "H",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            State::Init => "Init",
            State::FindPrevPrime => "FindPrevPrime",
            State::FindNextPrime => "FindNextPrime",
            State::MoveLocateSeq => "MoveLocateSeq",
            State::MoveNonMultiple => "MoveNonMultiple",
            State::MoveMultiple => "MoveMultiple",
            State::MoveReturn => "MoveReturn",
            State::DivLocateFirst => "DivLocateFirst",
            State::DivLocateNext => "DivLocateNext",
            State::DivFetch => "DivFetch",
            State::DivIncrement => "DivIncrement",
            State::Cleanup => "Cleanup",
            State::Halt => "Halt",
        }
    }
}

/// A sieve transition: what to write, where to move, and the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub write: Flags,
    pub direction: Direction,
    pub next: State,
}

impl Transition {
    fn new(write: Flags, direction: Direction, next: State) -> Self {
        Self {
            write,
            direction,
            next,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sieve {
    state: State,
}

impl Sieve {
    pub const LABELS: &'static [&'static str] = &[
        "I", "F1", "F2", "M1", "M2", "M3", "M4", "D1", "D2", "D3", "D4", ":D", "H",
    ];

    /// Marks every cell of `tape` as a prime candidate and returns the head to cell 1.
    pub fn reset(tape: &mut Tape) -> Result<Self, MachineError> {
        tape.resize(tape.len(), Symbol::Flags(Flags::MAYBE_PRIME))?;
        Ok(Self::begin())
    }

    pub fn begin() -> Self {
        Self { state: State::Init }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn halted(&self) -> bool {
        self.state == State::Halt
    }

    /// The transition table. Every `(state, flags)` pair has exactly one entry.
    pub fn eval(&self, cell: Flags) -> Transition {
        use Direction::{Left, Right};
        use State::*;

        let multiple = cell.contains(Flags::MULTIPLE);
        let maybe_prime = cell.contains(Flags::MAYBE_PRIME);
        let unary = cell.contains(Flags::UNARY_SEQ);
        let one = cell.contains(Flags::ONE);

        match self.state {
            Init => Transition::new(Flags::ONE, Right, FindNextPrime),

            // Walk right from the previous prime, tallying it, until its marker.
            FindPrevPrime if multiple => {
                Transition::new(Flags::MAYBE_PRIME | Flags::UNARY_SEQ, Right, FindNextPrime)
            }
            FindPrevPrime => Transition::new(cell | Flags::UNARY_SEQ, Right, FindPrevPrime),

            // The first unmarked candidate is the next prime p; the tally holds p - 1.
            FindNextPrime if maybe_prime => {
                Transition::new(Flags::MULTIPLE | Flags::UNARY_SEQ, Right, MoveNonMultiple)
            }
            FindNextPrime => Transition::new(Flags::UNARY_SEQ, Right, FindNextPrime),

            MoveLocateSeq if unary && multiple => {
                Transition::new(cell & !Flags::UNARY_SEQ, Right, MoveMultiple)
            }
            MoveLocateSeq if unary => {
                Transition::new(cell & !Flags::UNARY_SEQ, Right, MoveNonMultiple)
            }
            MoveLocateSeq if one => Transition::new(cell, Right, DivLocateFirst),
            MoveLocateSeq => Transition::new(cell, Right, MoveLocateSeq),

            MoveNonMultiple if unary => Transition::new(cell, Right, MoveNonMultiple),
            MoveNonMultiple if one => Transition::new(cell, Left, MoveReturn),
            MoveNonMultiple => Transition::new(
                (cell & Flags::MAYBE_PRIME) | Flags::UNARY_SEQ,
                Left,
                MoveReturn,
            ),

            MoveMultiple if unary => Transition::new(cell, Right, MoveMultiple),
            MoveMultiple if one => Transition::new(cell, Left, MoveReturn),
            MoveMultiple => Transition::new(Flags::MULTIPLE | Flags::UNARY_SEQ, Left, MoveReturn),

            MoveReturn if unary => Transition::new(cell, Left, MoveReturn),
            MoveReturn => Transition::new(cell, Right, MoveLocateSeq),

            DivLocateFirst if multiple => Transition::new(!Flags::EMPTY, Right, DivLocateNext),
            DivLocateFirst => Transition::new(cell, Right, DivLocateFirst),

            DivLocateNext if multiple && !unary && maybe_prime => {
                Transition::new(cell, Right, Cleanup)
            }
            DivLocateNext if multiple && !unary => Transition::new(Flags::EMPTY, Left, DivFetch),
            DivLocateNext => Transition::new(cell, Right, DivLocateNext),

            DivFetch if unary => Transition::new(cell, Left, DivIncrement),
            DivFetch => Transition::new(cell, Left, DivFetch),

            // Back at the marker: the quotient reached p, so sieve with the next prime.
            DivIncrement if multiple => Transition::new(Flags::ONE, Right, FindPrevPrime),
            DivIncrement if unary => Transition::new(cell, Left, DivIncrement),
            DivIncrement => Transition::new(cell | Flags::UNARY_SEQ, Right, DivLocateNext),

            Cleanup if cell == Flags::ONE => Transition::new(Flags::EMPTY, Right, Halt),
            Cleanup => Transition::new(cell & Flags::MAYBE_PRIME, Right, Cleanup),

            Halt => Transition::new(cell, Direction::Stay, Halt),
        }
    }

    pub fn advance(&mut self, current: Symbol) -> TapeTransition {
        if self.halted() {
            return TapeTransition::hold(current);
        }

        let transition = self.eval(current.flags());
        if transition.next == State::Halt {
            log::debug!("sieve: candidates settled");
        }
        self.state = transition.next;
        TapeTransition::new(transition.write, transition.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonKind;
    use crate::machine::TuringMachine;
    use crate::types::Step;

    fn trial_division(n: usize) -> Vec<usize> {
        (2..=n)
            .filter(|&k| (2..k).take_while(|d| d * d <= k).all(|d| k % d != 0))
            .collect()
    }

    fn run_sieve(len: usize) -> TuringMachine {
        let cells = vec![Symbol::Flags(Flags::MAYBE_PRIME); len];
        let mut machine = TuringMachine::with_tape(AutomatonKind::Sieve, cells).unwrap();
        let budget = AutomatonKind::Sieve.step_budget(len);
        assert_eq!(machine.run(budget), Step::Halt, "sieve on {} cells", len);
        machine
    }

    #[test]
    fn test_ten_cells_yield_small_primes() {
        let machine = run_sieve(10);
        assert_eq!(machine.primes(), vec![2, 3, 5, 7]);
    }

    #[test]
    fn test_matches_trial_division() {
        for len in 2..=60 {
            let machine = run_sieve(len);
            assert_eq!(machine.primes(), trial_division(len), "sieve on {} cells", len);
        }
    }

    #[test]
    fn test_halted_tape_keeps_only_prime_flags() {
        let machine = run_sieve(30);
        for (i, cell) in machine.tape().cells().iter().enumerate() {
            let flags = cell.flags();
            assert!(
                flags == Flags::EMPTY || flags == Flags::MAYBE_PRIME,
                "cell {} left as {:?}",
                i + 1,
                flags
            );
        }
        assert_eq!(machine.tape().cells()[0].flags(), Flags::EMPTY);
    }

    #[test]
    fn test_init_marks_cell_one() {
        let sieve = Sieve::begin();
        let t = sieve.eval(Flags::MAYBE_PRIME);
        assert_eq!(t.write, Flags::ONE);
        assert_eq!(t.direction, Direction::Right);
        assert_eq!(t.next, State::FindNextPrime);
    }

    #[test]
    fn test_reset_marks_candidates() {
        let mut tape = Tape::new(5, Symbol::Flags(Flags::UNARY_SEQ)).unwrap();
        tape.move_head(Direction::Left);

        let sieve = Sieve::reset(&mut tape).unwrap();
        assert_eq!(sieve.state(), State::Init);
        assert_eq!(tape.head(), 0);
        assert!(tape
            .cells()
            .iter()
            .all(|&cell| cell == Symbol::Flags(Flags::MAYBE_PRIME)));
    }

    #[test]
    fn test_halt_is_idempotent() {
        let mut sieve = Sieve {
            state: State::Halt,
        };
        let input = Symbol::Flags(Flags::MULTIPLE | Flags::UNARY_SEQ);
        assert_eq!(sieve.advance(input), TapeTransition::hold(input));
        assert!(sieve.halted());
    }

    #[test]
    fn test_labels_follow_state_order() {
        let states = [
            State::Init,
            State::FindPrevPrime,
            State::FindNextPrime,
            State::MoveLocateSeq,
            State::MoveNonMultiple,
            State::MoveMultiple,
            State::MoveReturn,
            State::DivLocateFirst,
            State::DivLocateNext,
            State::DivFetch,
            State::DivIncrement,
            State::Cleanup,
            State::Halt,
        ];
        let labels: Vec<&str> = states.iter().map(|s| s.label()).collect();
        assert_eq!(labels, Sieve::LABELS);
    }
}
