//! Tape symbols.
//!
//! Two encodings share one tape cell type: sort automata need hues they can test for
//! betweenness, and the sieve needs three independent flag bits. Every symbol also has a
//! display colour, which is how one encoding is read back in the other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use crate::hue::Hue;

/// An 8-bit-per-channel colour.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The hue of this colour on the colour wheel. Greys (including black) have hue zero.
    pub fn hue(self) -> Hue {
        let (r, g, b) = (self.r as f64, self.g as f64, self.b as f64);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta == 0.0 {
            return Hue::ZERO;
        }

        let sextant = if max == r {
            (g - b) / delta
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        Hue::from_turns(sextant / 6.0)
    }
}

/// The sieve's per-cell working memory: three independent flags packed into one byte.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags(u8);

impl Flags {
    pub const EMPTY: Flags = Flags(0);
    /// The cell has been marked as a multiple of some prime. Together with
    /// [`Flags::MAYBE_PRIME`] it marks cell 1.
    pub const MULTIPLE: Flags = Flags(1);
    /// The cell has not (yet) been ruled out as a prime.
    pub const MAYBE_PRIME: Flags = Flags(2);
    /// The cell is part of a temporary unary tally.
    pub const UNARY_SEQ: Flags = Flags(4);
    /// The marker the sieve keeps on cell 1.
    pub const ONE: Flags = Flags(1 | 2);

    const ALL: u8 = 1 | 2 | 4;

    /// Builds flags from raw bits, dropping any bit that is not a known flag.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Flags(bits & Self::ALL)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Decodes a colour one channel per flag: any non-zero channel sets its flag.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let mut bits = 0;
        if rgb.r != 0 {
            bits |= Self::MULTIPLE.0;
        }
        if rgb.g != 0 {
            bits |= Self::MAYBE_PRIME.0;
        }
        if rgb.b != 0 {
            bits |= Self::UNARY_SEQ.0;
        }
        Flags(bits)
    }

    pub fn to_rgb(self) -> Rgb {
        let channel = |flag: Flags| if self.contains(flag) { 255 } else { 0 };
        Rgb::new(
            channel(Self::MULTIPLE),
            channel(Self::MAYBE_PRIME),
            channel(Self::UNARY_SEQ),
        )
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl Not for Flags {
    type Output = Flags;

    fn not(self) -> Flags {
        Flags(!self.0 & Self::ALL)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::MULTIPLE, "MULTIPLE"),
            (Self::MAYBE_PRIME, "MAYBE_PRIME"),
            (Self::UNARY_SEQ, "UNARY_SEQ"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            write!(f, "Flags(EMPTY)")
        } else {
            write!(f, "Flags({})", names.join(" | "))
        }
    }
}

/// The contents of one tape cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// A cyclic key, used by the sort automata.
    Hue(Hue),
    /// A flag set, used by the sieve.
    Flags(Flags),
}

impl Symbol {
    /// The symbol read as a hue. Flag cells are read through their colour.
    pub fn hue(self) -> Hue {
        match self {
            Symbol::Hue(hue) => hue,
            Symbol::Flags(flags) => flags.to_rgb().hue(),
        }
    }

    /// The symbol read as flags. Hue cells are read through their colour.
    pub fn flags(self) -> Flags {
        match self {
            Symbol::Flags(flags) => flags,
            Symbol::Hue(hue) => Flags::from_rgb(hue.to_rgb()),
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Symbol::Hue(hue) => hue.to_rgb(),
            Symbol::Flags(flags) => flags.to_rgb(),
        }
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol::Flags(Flags::EMPTY)
    }
}

impl From<Hue> for Symbol {
    fn from(hue: Hue) -> Self {
        Symbol::Hue(hue)
    }
}

impl From<Flags> for Symbol {
    fn from(flags: Flags) -> Self {
        Symbol::Flags(flags)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Hue(hue) => write!(f, "{:.0}°", hue.to_degrees()),
            Symbol::Flags(flags) => write!(f, "{}", flags.bits()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_ops() {
        let cell = Flags::MULTIPLE | Flags::UNARY_SEQ;
        assert!(cell.contains(Flags::MULTIPLE));
        assert!(!cell.contains(Flags::MAYBE_PRIME));
        assert_eq!(cell & !Flags::UNARY_SEQ, Flags::MULTIPLE);
        assert_eq!(!Flags::EMPTY, Flags::MULTIPLE | Flags::MAYBE_PRIME | Flags::UNARY_SEQ);
        assert_eq!(Flags::from_bits_truncate(0xff).bits(), 7);
    }

    #[test]
    fn test_flags_colour_round_trip() {
        for bits in 0..8 {
            let flags = Flags::from_bits_truncate(bits);
            assert_eq!(Flags::from_rgb(flags.to_rgb()), flags);
        }
    }

    #[test]
    fn test_hue_symbol_read_as_flags() {
        // At lightness 0.5 even pure red keeps small non-zero green and blue channels.
        let red = Symbol::Hue(Hue::ZERO);
        assert_eq!(red.flags(), !Flags::EMPTY);
    }

    #[test]
    fn test_flag_symbol_read_as_hue() {
        assert_eq!(Symbol::Flags(Flags::MULTIPLE).hue(), Hue::ZERO);
        assert_eq!(Symbol::Flags(Flags::EMPTY).hue(), Hue::ZERO);
        let green = Symbol::Flags(Flags::MAYBE_PRIME).hue();
        assert!((green.to_turns() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_grey_has_zero_hue() {
        assert_eq!(Rgb::new(128, 128, 128).hue(), Hue::ZERO);
        assert_eq!(Rgb::BLACK.hue(), Hue::ZERO);
    }

    #[test]
    fn test_debug_lists_flag_names() {
        assert_eq!(format!("{:?}", Flags::ONE), "Flags(MULTIPLE | MAYBE_PRIME)");
        assert_eq!(format!("{:?}", Flags::EMPTY), "Flags(EMPTY)");
    }
}
