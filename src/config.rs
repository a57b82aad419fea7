//! Run configuration shared by the front ends.

use serde::{Deserialize, Serialize};

use crate::automaton::AutomatonKind;
use crate::tape::Layout;
use crate::types::{MachineError, DEFAULT_SPEED_MS, DEFAULT_TAPE_LEN, MAX_TAPE_LEN};

/// Everything needed to start a run. Missing fields take their defaults when
/// deserialized, unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub kind: AutomatonKind,
    pub tape_len: usize,
    /// Ignored by the sieve, which always starts from an unmarked tape.
    pub layout: Layout,
    /// Seed for the sort layouts. A run without a seed draws one from entropy.
    pub seed: Option<u64>,
    /// Milliseconds per tick for animated front ends.
    pub speed_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kind: AutomatonKind::default(),
            tape_len: DEFAULT_TAPE_LEN,
            layout: Layout::default(),
            seed: None,
            speed_ms: DEFAULT_SPEED_MS,
        }
    }
}

impl RunConfig {
    pub fn new(kind: AutomatonKind, tape_len: usize) -> Self {
        Self {
            kind,
            tape_len,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Checks the tape length against the global limit and the automaton's minimum.
    pub fn validate(&self) -> Result<(), MachineError> {
        if self.tape_len == 0 || self.tape_len > MAX_TAPE_LEN {
            return Err(MachineError::InvalidConfiguration(format!(
                "tape length must be between 1 and {}, got {}",
                MAX_TAPE_LEN, self.tape_len
            )));
        }
        self.kind.check_tape_len(self.tape_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.kind, AutomatonKind::InsertionSort);
        assert_eq!(config.tape_len, 40);
        assert_eq!(config.layout, Layout::Shuffled);
        assert_eq!(config.seed, None);
        assert_eq!(config.speed_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(RunConfig::new(AutomatonKind::MergeSort, 0).validate().is_err());
        assert!(RunConfig::new(AutomatonKind::MergeSort, 1).validate().is_ok());
        assert!(RunConfig::new(AutomatonKind::MergeSort, MAX_TAPE_LEN).validate().is_ok());
        assert!(RunConfig::new(AutomatonKind::MergeSort, MAX_TAPE_LEN + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_sieve_minimum() {
        let result = RunConfig::new(AutomatonKind::Sieve, 1).validate();
        assert!(matches!(result, Err(MachineError::InvalidConfiguration(_))));
        assert!(RunConfig::new(AutomatonKind::Sieve, 2).validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{ "kind": "sieve", "tape_len": 12 }"#).unwrap();
        assert_eq!(config.kind, AutomatonKind::Sieve);
        assert_eq!(config.tape_len, 12);
        assert_eq!(config.speed_ms, DEFAULT_SPEED_MS);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = serde_json::from_str::<RunConfig>(r#"{ "tape_length": 12 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new(AutomatonKind::MergeSort, 16)
            .with_seed(9)
            .with_layout(Layout::Reversed);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.layout, Layout::Reversed);
    }
}
