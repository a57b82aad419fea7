//! Playback pacing for animated front ends.
//!
//! A [`Player`] turns elapsed wall-clock time into a number of ticks to execute plus an
//! interpolation factor for drawing the head part-way through its last move. It never
//! touches a machine itself, so stepping stays independent of how often a front end
//! redraws.

use std::f64::consts::PI;

use crate::types::DEFAULT_SPEED_MS;

/// Fastest playback a front end may request.
pub const MIN_SPEED_MS: u64 = 10;
/// Slowest playback a front end may request.
pub const MAX_SPEED_MS: u64 = 1500;

/// Progress a fresh run starts at, so the first tick comes after a short pause rather
/// than a full tick interval.
const START_PROGRESS: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    speed_ms: u64,
    /// Fraction of the current tick interval already elapsed, in `[0, 1)`.
    progress: f64,
    paused: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED_MS)
    }
}

impl Player {
    pub fn new(speed_ms: u64) -> Self {
        Self {
            speed_ms: speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS),
            progress: START_PROGRESS,
            paused: false,
        }
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    /// Sets milliseconds per tick, clamped to `MIN_SPEED_MS..=MAX_SPEED_MS`.
    pub fn set_speed(&mut self, speed_ms: u64) {
        self.speed_ms = speed_ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses playback and returns whether it was already paused.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.paused, true)
    }

    /// Flips between playing and paused and returns the new paused state.
    pub fn toggle(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Rewinds the tick clock for a new run.
    pub fn restart(&mut self) {
        self.progress = START_PROGRESS;
    }

    /// Advances the clock by `elapsed_ms` and returns how many ticks are now due.
    /// A paused player never has ticks due.
    pub fn elapse(&mut self, elapsed_ms: u64) -> usize {
        if self.paused {
            return 0;
        }

        self.progress += elapsed_ms as f64 / self.speed_ms as f64;
        let ticks = self.progress.floor();
        self.progress -= ticks;
        ticks as usize
    }

    /// How far the head is drawn between its previous and current cell, in `[0, 1]`.
    pub fn interpolation(&self) -> f64 {
        ease(self.progress)
    }
}

/// Holds still for the first fifth of a tick, eases across with a half cosine, and
/// rests on the new cell for the last fifth.
pub fn ease(progress: f64) -> f64 {
    if progress < 0.2 {
        0.0
    } else if progress < 0.8 {
        (1.0 - ((progress - 0.2) * PI / 0.6).cos()) / 2.0
    } else {
        1.0
    }
}

/// The signed number of cells the head moved from `previous` to `current` on a ring of
/// `len` cells: `-1`, `0` or `1` after a single tick.
pub fn head_offset(previous: usize, current: usize, len: usize) -> isize {
    if len <= 1 {
        return 0;
    }
    ((current + len + 1 - previous) % len) as isize - 1
}
