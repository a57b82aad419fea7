//! The circular tape the automata run on.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hue::Hue;
use crate::symbol::Symbol;
use crate::types::{Direction, MachineError, TapeTransition};

/// How a sort run lays out its hues before the automaton starts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Evenly spaced distinct hues in a random order.
    #[default]
    Shuffled,
    /// Evenly spaced distinct hues in descending order.
    Reversed,
}

impl Layout {
    pub const ALL: [Layout; 2] = [Layout::Shuffled, Layout::Reversed];

    pub fn name(self) -> &'static str {
        match self {
            Layout::Shuffled => "shuffled",
            Layout::Reversed => "reversed",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                MachineError::InvalidConfiguration(format!(
                    "unknown layout '{}' (expected shuffled or reversed)",
                    s
                ))
            })
    }
}

/// A fixed-length circular sequence of symbols with a single read/write head.
///
/// The length is fixed between calls to [`Tape::resize`]; head movement wraps, so no
/// bounds error is possible once a tape exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape of `len` copies of `fill` with the head on cell 0.
    pub fn new(len: usize, fill: Symbol) -> Result<Self, MachineError> {
        Self::from_cells(vec![fill; len])
    }

    /// Creates a tape holding `cells` with the head on cell 0.
    pub fn from_cells(cells: Vec<Symbol>) -> Result<Self, MachineError> {
        check_len(cells.len())?;
        Ok(Self { cells, head: 0 })
    }

    /// Reinitializes the tape to `len` copies of `fill` and returns the head to cell 0.
    pub fn resize(&mut self, len: usize, fill: Symbol) -> Result<(), MachineError> {
        check_len(len)?;
        self.cells.clear();
        self.cells.resize(len, fill);
        self.head = 0;
        Ok(())
    }

    /// Replaces the contents wholesale and returns the head to cell 0.
    pub fn set_cells(&mut self, cells: Vec<Symbol>) -> Result<(), MachineError> {
        check_len(cells.len())?;
        self.cells = cells;
        self.head = 0;
        Ok(())
    }

    /// Lays out one evenly spaced hue per cell in the order `layout` asks for and
    /// returns the head to cell 0.
    pub fn fill_hues<R: Rng + ?Sized>(&mut self, layout: Layout, rng: &mut R) {
        let len = self.cells.len();
        for (i, cell) in self.cells.iter_mut().enumerate() {
            *cell = Symbol::Hue(Hue::evenly_spaced(i, len));
        }
        match layout {
            Layout::Shuffled => self.cells.shuffle(rng),
            Layout::Reversed => self.cells.reverse(),
        }
        self.head = 0;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// The symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Writes `symbol` under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell, wrapping around either end.
    pub fn move_head(&mut self, direction: Direction) {
        let len = self.cells.len();
        self.head = match direction {
            Direction::Left => (self.head + len - 1) % len,
            Direction::Right => (self.head + 1) % len,
            Direction::Stay => self.head,
        };
    }

    /// Performs one driver tick: write, then move.
    pub fn apply(&mut self, transition: TapeTransition) {
        self.write(transition.write);
        self.move_head(transition.direction);
    }

    /// Every cell once, starting under the head and walking right.
    pub fn cells_from_head(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.cells[self.head..]
            .iter()
            .chain(self.cells[..self.head].iter())
            .copied()
    }
}

fn check_len(len: usize) -> Result<(), MachineError> {
    if len == 0 {
        return Err(MachineError::InvalidConfiguration(
            "tape length must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Flags;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn flag_tape(len: usize) -> Tape {
        Tape::new(len, Symbol::Flags(Flags::EMPTY)).unwrap()
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(matches!(
            Tape::new(0, Symbol::default()),
            Err(MachineError::InvalidConfiguration(_))
        ));
        let mut tape = flag_tape(3);
        assert!(tape.resize(0, Symbol::default()).is_err());
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_move_wraps_both_ways() {
        let mut tape = flag_tape(3);
        tape.move_head(Direction::Left);
        assert_eq!(tape.head(), 2);
        tape.move_head(Direction::Right);
        assert_eq!(tape.head(), 0);
        tape.move_head(Direction::Stay);
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_single_cell_tape_moves_in_place() {
        let mut tape = flag_tape(1);
        tape.move_head(Direction::Left);
        assert_eq!(tape.head(), 0);
        tape.move_head(Direction::Right);
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_apply_writes_before_moving() {
        let mut tape = flag_tape(4);
        tape.apply(TapeTransition::new(Flags::MULTIPLE, Direction::Left));

        assert_eq!(tape.head(), 3);
        assert_eq!(tape.cells()[0], Symbol::Flags(Flags::MULTIPLE));
        assert_eq!(tape.read(), Symbol::Flags(Flags::EMPTY));
    }

    #[test]
    fn test_resize_resets_head_and_contents() {
        let mut tape = flag_tape(4);
        tape.move_head(Direction::Right);
        tape.write(Symbol::Flags(Flags::UNARY_SEQ));

        tape.resize(6, Symbol::Flags(Flags::MAYBE_PRIME)).unwrap();
        assert_eq!(tape.len(), 6);
        assert_eq!(tape.head(), 0);
        assert!(tape
            .cells()
            .iter()
            .all(|&cell| cell == Symbol::Flags(Flags::MAYBE_PRIME)));
    }

    #[test]
    fn test_cells_from_head_rotates() {
        let cells: Vec<Symbol> = (0..4u8)
            .map(|bits| Symbol::Flags(Flags::from_bits_truncate(bits)))
            .collect();
        let mut tape = Tape::from_cells(cells.clone()).unwrap();
        tape.move_head(Direction::Left);

        let rotated: Vec<Symbol> = tape.cells_from_head().collect();
        assert_eq!(rotated, vec![cells[3], cells[0], cells[1], cells[2]]);
    }

    #[test]
    fn test_fill_hues_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut tape = flag_tape(12);
        tape.fill_hues(Layout::Shuffled, &mut rng);

        let mut raw: Vec<u32> = tape.cells().iter().map(|c| c.hue().raw()).collect();
        raw.sort_unstable();
        let expected: Vec<u32> = (0..12).map(|i| Hue::evenly_spaced(i, 12).raw()).collect();
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_fill_hues_reversed_descends() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut tape = flag_tape(5);
        tape.fill_hues(Layout::Reversed, &mut rng);

        let raw: Vec<u32> = tape.cells().iter().map(|c| c.hue().raw()).collect();
        assert!(raw.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("Shuffled".parse::<Layout>().unwrap(), Layout::Shuffled);
        assert_eq!(" reversed ".parse::<Layout>().unwrap(), Layout::Reversed);
        assert!("sorted".parse::<Layout>().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::symbol::Flags;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    proptest! {
        #[test]
        fn full_lap_returns_to_start(len in 1usize..200, start in 0usize..200) {
            let mut tape = Tape::new(len, Symbol::Flags(Flags::EMPTY)).unwrap();
            for _ in 0..start % len {
                tape.move_head(Direction::Right);
            }
            let head = tape.head();
            for _ in 0..len {
                tape.move_head(Direction::Left);
            }
            prop_assert_eq!(tape.head(), head);
        }

        #[test]
        fn shuffled_layout_is_a_permutation_of_reversed(len in 1usize..120, seed in any::<u64>()) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut shuffled = Tape::new(len, Symbol::Flags(Flags::EMPTY)).unwrap();
            let mut reversed = shuffled.clone();
            shuffled.fill_hues(Layout::Shuffled, &mut rng);
            reversed.fill_hues(Layout::Reversed, &mut rng);

            let mut a: Vec<u32> = shuffled.cells().iter().map(|c| c.hue().raw()).collect();
            let mut b: Vec<u32> = reversed.cells().iter().map(|c| c.hue().raw()).collect();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }
    }
}
