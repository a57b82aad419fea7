//! This module defines the shared data structures used throughout the simulator: head
//! directions, the write/move result of a single step, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbol::Symbol;

/// The tape length a new run uses when none is configured.
pub const DEFAULT_TAPE_LEN: usize = 40;
/// The largest tape a `RunConfig` accepts.
pub const MAX_TAPE_LEN: usize = 200;
/// Milliseconds per tick used by front ends when no speed is configured.
pub const DEFAULT_SPEED_MS: u64 = 500;

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position. Only halted automata report this.
    Stay,
}

/// What the driver must do to the tape after one `advance` call: write `write` under the
/// head, then move the head in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapeTransition {
    /// The symbol to write at the current head position.
    pub write: Symbol,
    /// The direction to move the head after writing.
    pub direction: Direction,
}

impl TapeTransition {
    pub fn new(write: impl Into<Symbol>, direction: Direction) -> Self {
        Self {
            write: write.into(),
            direction,
        }
    }

    /// The transition a halted automaton reports: the input is written back unchanged and
    /// the head does not move.
    pub fn hold(current: Symbol) -> Self {
        Self {
            write: current,
            direction: Direction::Stay,
        }
    }
}

/// Represents the outcome of a Turing Machine execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine successfully performed a step and continues execution.
    Continue,
    /// The automaton has reached its terminal state.
    Halt,
}

/// Represents the errors callers can run into while configuring a run.
///
/// None of these can occur in the middle of a run: every transition table is total, so
/// misuse is rejected before an automaton is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// A tape length or other run parameter is outside what the automaton supports.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The requested automaton name does not match any known kind.
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),
    /// A run configuration could not be deserialized.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Indicates an error related to file system operations, such as reading a config file.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Flags;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        let right_deserialized: Direction = serde_json::from_str(&right_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(right, right_deserialized);
    }

    #[test]
    fn test_hold_does_not_move() {
        let current = Symbol::Flags(Flags::MAYBE_PRIME);
        let transition = TapeTransition::hold(current);

        assert_eq!(transition.write, current);
        assert_eq!(transition.direction, Direction::Stay);
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::InvalidConfiguration("tape length must be at least 1".into());

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid configuration"));
        assert!(error_msg.contains("at least 1"));
    }
}
