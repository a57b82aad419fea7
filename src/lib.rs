//! This crate provides the core logic for running sorting and sieving automata on a
//! circular Turing machine tape.
//!
//! Each automaton only ever sees the symbol under the head: the sorts compare hues by
//! cyclic betweenness, and the sieve keeps all its bookkeeping in three flag bits per
//! cell. The [`TuringMachine`] driver owns the tape and executes ticks, and [`Player`]
//! paces them for animated front ends.

pub mod automaton;
pub mod catalog;
pub mod config;
pub mod hue;
pub mod insertion_sort;
pub mod loader;
pub mod machine;
pub mod merge_sort;
pub mod player;
pub mod sieve;
pub mod symbol;
pub mod tape;
pub mod types;

/// Re-exports the automaton enum and its kind from the automaton module.
pub use automaton::{Automaton, AutomatonKind, HeadView};
/// Re-exports `Catalog` and `MachineInfo` from the catalog module.
pub use catalog::{Catalog, MachineInfo};
/// Re-exports the `RunConfig` struct from the config module.
pub use config::RunConfig;
pub use hue::Hue;
/// Re-exports the `ConfigLoader` struct from the loader module.
pub use loader::ConfigLoader;
/// Re-exports the `TuringMachine` driver and its JSON `Snapshot`.
pub use machine::{Snapshot, TuringMachine};
pub use player::Player;
pub use symbol::{Flags, Rgb, Symbol};
pub use tape::{Layout, Tape};
/// Re-exports the shared types and limits from the types module.
pub use types::{
    Direction, MachineError, Step, TapeTransition, DEFAULT_SPEED_MS, DEFAULT_TAPE_LEN,
    MAX_TAPE_LEN,
};
