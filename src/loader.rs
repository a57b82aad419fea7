//! This module provides the `ConfigLoader` struct, responsible for loading run
//! configurations from JSON files and strings.

use crate::config::RunConfig;
use crate::types::MachineError;
use std::fs;
use std::path::Path;

/// `ConfigLoader` is a utility struct for loading [`RunConfig`]s.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates a run configuration from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the JSON file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(RunConfig)` if the file is read, parsed and valid.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ConfigError)` if the content is not a valid configuration.
    /// * `Err(MachineError::InvalidConfiguration)` if the values are out of range.
    pub fn load_config(path: &Path) -> Result<RunConfig, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_config_from_string(&content)
    }

    /// Loads and validates a run configuration from JSON text, e.g. piped on stdin.
    pub fn load_config_from_string(content: &str) -> Result<RunConfig, MachineError> {
        let config: RunConfig = serde_json::from_str(content)
            .map_err(|e| MachineError::ConfigError(format!("Invalid run configuration: {}", e)))?;

        config.validate()?;
        log::debug!("loaded configuration for {}", config.kind);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonKind;
    use crate::tape::Layout;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("run.json");

        let content = r#"{ "kind": "merge-sort", "tape_len": 24, "layout": "reversed", "seed": 7 }"#;

        let mut file = File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = ConfigLoader::load_config(&file_path).unwrap();
        assert_eq!(config.kind, AutomatonKind::MergeSort);
        assert_eq!(config.tape_len, 24);
        assert_eq!(config.layout, Layout::Reversed);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::load_config(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(MachineError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.json");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not a valid configuration").unwrap();

        let result = ConfigLoader::load_config(&file_path);
        assert!(matches!(result, Err(MachineError::ConfigError(_))));
    }

    #[test]
    fn test_load_unknown_machine() {
        let result = ConfigLoader::load_config_from_string(r#"{ "kind": "bubble-sort" }"#);
        assert!(matches!(result, Err(MachineError::ConfigError(_))));
    }

    #[test]
    fn test_load_out_of_range() {
        let result = ConfigLoader::load_config_from_string(r#"{ "kind": "sieve", "tape_len": 1 }"#);
        assert!(matches!(
            result,
            Err(MachineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = ConfigLoader::load_config_from_string("{}").unwrap();
        assert_eq!(config, RunConfig::default());
    }
}
