use serde::Serialize;

use crate::automaton::AutomatonKind;
use crate::types::MachineError;

/// The built-in automata, in the order front ends cycle through them.
pub struct Catalog;

impl Catalog {
    /// Get the number of available machines
    pub fn count() -> usize {
        AutomatonKind::ALL.len()
    }

    /// Get a machine by its index
    pub fn kind_by_index(index: usize) -> Result<AutomatonKind, MachineError> {
        AutomatonKind::ALL.get(index).copied().ok_or_else(|| {
            MachineError::UnknownMachine(format!("machine index {} out of range", index))
        })
    }

    /// Get a machine by its name or title, ignoring case
    pub fn kind_by_name(name: &str) -> Result<AutomatonKind, MachineError> {
        AutomatonKind::ALL
            .into_iter()
            .find(|kind| kind.title().eq_ignore_ascii_case(name.trim()))
            .map_or_else(|| name.parse(), Ok)
    }

    /// The index of `kind`, for cycling from the current machine.
    pub fn index_of(kind: AutomatonKind) -> usize {
        AutomatonKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or_default()
    }

    /// The machine after `kind`, wrapping around.
    pub fn next(kind: AutomatonKind) -> AutomatonKind {
        AutomatonKind::ALL[(Self::index_of(kind) + 1) % Self::count()]
    }

    /// The machine before `kind`, wrapping around.
    pub fn previous(kind: AutomatonKind) -> AutomatonKind {
        AutomatonKind::ALL[(Self::index_of(kind) + Self::count() - 1) % Self::count()]
    }

    /// List all machine names
    pub fn list_names() -> Vec<&'static str> {
        AutomatonKind::ALL.iter().map(|kind| kind.name()).collect()
    }

    /// Get information about a machine by its index
    pub fn info(index: usize) -> Result<MachineInfo, MachineError> {
        let kind = Self::kind_by_index(index)?;

        Ok(MachineInfo {
            index,
            name: kind.name(),
            title: kind.title(),
            state_count: kind.labels().len(),
            labels: kind.labels(),
            min_tape_len: kind.min_tape_len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineInfo {
    pub index: usize,
    pub name: &'static str,
    pub title: &'static str,
    pub state_count: usize,
    pub labels: &'static [&'static str],
    pub min_tape_len: usize,
}
