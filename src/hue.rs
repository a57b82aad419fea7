//! The cyclic ordering primitive the sort automata are built on.
//!
//! A [`Hue`] is a position on the unit circle, stored as fixed-point turns so that
//! distances are exact. The automata never ask "is `a` less than `b`"; they only ask
//! whether a value lies on the forward arc between two others.

use serde::{Deserialize, Serialize};

use crate::symbol::Rgb;

/// One full turn in fixed-point units.
const TURN: u64 = 1 << 32;

/// Saturation and lightness used when a hue is shown as a colour.
const SATURATION: f64 = 0.9;
const LIGHTNESS: f64 = 0.5;

/// A position on the colour wheel, `0 ..= u32::MAX` mapping onto `[0, 1)` turns.
///
/// `Hue` deliberately has no `Ord`: the only comparison available to an automaton is the
/// cyclic distance [`Hue::sep`] and the betweenness test built from it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hue(u32);

impl Hue {
    pub const ZERO: Hue = Hue(0);

    pub const fn from_raw(raw: u32) -> Self {
        Hue(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Builds a hue from a fraction of a turn. Values outside `[0, 1)` wrap.
    pub fn from_turns(turns: f64) -> Self {
        let wrapped = turns.rem_euclid(1.0);
        // 1.0 - epsilon can round up to a full turn, which wraps to 0 through the cast.
        Hue((wrapped * TURN as f64) as u64 as u32)
    }

    pub fn to_turns(self) -> f64 {
        self.0 as f64 / TURN as f64
    }

    pub fn to_degrees(self) -> f64 {
        self.to_turns() * 360.0
    }

    /// The hue `index / count` of a turn. `index` is expected to be below `count`.
    pub fn evenly_spaced(index: usize, count: usize) -> Self {
        if count == 0 {
            return Hue::ZERO;
        }
        let index = (index % count) as u64;
        Hue(((index << 32) / count as u64) as u32)
    }

    /// Forward circular distance from `self` to `to`, in fixed-point turns.
    ///
    /// `a.sep(a) == 0`, and for `a != b`, `a.sep(b) + b.sep(a)` is exactly one turn.
    pub fn sep(self, to: Hue) -> u32 {
        to.0.wrapping_sub(self.0)
    }

    /// Whether `x` lies on the forward arc from `lo` to `hi`, i.e. walking forward from
    /// `lo` reaches `x` and then `hi` without completing a full turn.
    ///
    /// `between(lo, lo, hi)` holds for any `hi`, and so does `between(lo, hi, hi)`.
    pub fn between(lo: Hue, x: Hue, hi: Hue) -> bool {
        lo.sep(x) as u64 + (x.sep(hi) as u64) < TURN
    }

    /// The colour a renderer uses for this hue.
    pub fn to_rgb(self) -> Rgb {
        let h = self.to_turns() * 6.0;
        let chroma = (1.0 - (2.0 * LIGHTNESS - 1.0).abs()) * SATURATION;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = LIGHTNESS - chroma / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(turns: f64) -> Hue {
        Hue::from_turns(turns)
    }

    #[test]
    fn test_sep_to_self_is_zero() {
        for t in [0.0, 0.2, 0.5, 0.99] {
            assert_eq!(h(t).sep(h(t)), 0);
        }
    }

    #[test]
    fn test_sep_wraps_forward() {
        // 0.75 -> 0.25 walks forward across zero: half a turn.
        assert_eq!(h(0.75).sep(h(0.25)), (TURN / 2) as u32);
        assert_eq!(h(0.25).sep(h(0.75)), (TURN / 2) as u32);
        assert_eq!(h(0.0).sep(h(0.25)), (TURN / 4) as u32);
    }

    #[test]
    fn test_between_on_arc() {
        assert!(Hue::between(h(0.1), h(0.3), h(0.5)));
        assert!(!Hue::between(h(0.1), h(0.7), h(0.5)));
        // The arc from 0.8 to 0.2 crosses zero.
        assert!(Hue::between(h(0.8), h(0.9), h(0.2)));
        assert!(Hue::between(h(0.8), h(0.1), h(0.2)));
        assert!(!Hue::between(h(0.8), h(0.5), h(0.2)));
    }

    #[test]
    fn test_between_endpoints() {
        assert!(Hue::between(h(0.4), h(0.4), h(0.6)));
        assert!(Hue::between(h(0.4), h(0.6), h(0.6)));
        // lo == hi is the degenerate arc that only contains the point itself.
        assert!(Hue::between(h(0.4), h(0.4), h(0.4)));
        assert!(!Hue::between(h(0.4), h(0.5), h(0.4)));
    }

    #[test]
    fn test_evenly_spaced_is_exact() {
        assert_eq!(Hue::evenly_spaced(0, 5), Hue::ZERO);
        assert_eq!(Hue::evenly_spaced(2, 4).raw(), 1 << 31);
        assert_eq!(Hue::evenly_spaced(0, 0), Hue::ZERO);
    }

    #[test]
    fn test_from_turns_wraps() {
        assert_eq!(h(1.25), h(0.25));
        assert_eq!(h(-0.75), h(0.25));
        assert!((h(0.6).to_degrees() - 216.0).abs() < 1e-6);
    }

    #[test]
    fn test_primary_colours() {
        let red = Hue::ZERO.to_rgb();
        assert!(red.r > 200 && red.g < 20 && red.b < 20);

        let green = h(1.0 / 3.0).to_rgb();
        assert!(green.g > 200 && green.r < 20 && green.b < 20);

        let blue = h(2.0 / 3.0).to_rgb();
        assert!(blue.b > 200 && blue.r < 20 && blue.g < 20);
    }
}
