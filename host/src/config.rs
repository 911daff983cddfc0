//! Engine configuration for tool scopes.
//!
//! Controls whether merged fields are validated and whether validation
//! issues are fatal. Serializable as YAML so a host can keep it next to its
//! other settings.
//!
//! # Example YAML
//!
//! ```yaml
//! dev_mode: true
//! strict: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tool_schema_core::ValidateOptions;

use crate::error::Result;

/// Validation settings applied by a [`ToolScope`](crate::ToolScope).
///
/// Missing keys fall back to [`EngineConfig::default`], which enables
/// validation in debug builds only.
///
/// # Examples
///
/// ```
/// use tool_schema_host::EngineConfig;
///
/// let config: EngineConfig = serde_yaml::from_str("strict: true").unwrap();
/// assert!(config.strict);
/// assert_eq!(config.dev_mode, cfg!(debug_assertions));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the validator on every recomputation.
    pub dev_mode: bool,
    /// Fail recomputation on the first validation issue.
    pub strict: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let options = ValidateOptions::default();
        Self {
            dev_mode: options.dev_mode,
            strict: options.strict,
        }
    }
}

impl EngineConfig {
    /// Development mode with warnings only.
    pub fn development() -> Self {
        Self {
            dev_mode: true,
            strict: false,
        }
    }

    /// Validation disabled.
    pub fn production() -> Self {
        Self {
            dev_mode: false,
            strict: false,
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::HostError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::HostError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::HostError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::HostError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Options for [`validate_fields`](tool_schema_core::validate_fields).
    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            dev_mode: self.dev_mode,
            strict: self.strict,
        }
    }
}
