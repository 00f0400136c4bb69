//! Generator configuration.
//!
//! An optional YAML file that controls what the generated files include and
//! which extra schemas reserve top-level names.
//!
//! # Example YAML
//!
//! ```yaml
//! runtime_include: Configuration/CFGCommon/CFGArg.h
//! generator_name: argspec-gen
//! auxiliary:
//!   - ../ModelConfig/model_config.json
//! ```
//!
//! Every key is optional. Relative `auxiliary` paths are resolved against
//! the directory holding the configuration file.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default include path of the `CFGArg` runtime header.
pub const DEFAULT_RUNTIME_INCLUDE: &str = "Configuration/CFGCommon/CFGArg.h";

/// Default generator name written into the banner of generated files.
pub const DEFAULT_GENERATOR_NAME: &str = "argspec-gen";

/// Settings for one generator run.
///
/// # Examples
///
/// ```
/// use argspec_loader::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("generator_name: cfgargs").unwrap();
/// assert_eq!(config.generator_name, "cfgargs");
/// assert_eq!(config.runtime_include, "Configuration/CFGCommon/CFGArg.h");
/// assert!(config.auxiliary.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Header included at the top of the generated header.
    pub runtime_include: String,
    /// Name shown in the "auto-generated by" banner.
    pub generator_name: String,
    /// Schemas whose top-level names are already taken.
    pub auxiliary: Vec<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_include: DEFAULT_RUNTIME_INCLUDE.to_string(),
            generator_name: DEFAULT_GENERATOR_NAME.to_string(),
            auxiliary: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoaderError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::LoaderError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.auxiliary = config
            .auxiliary
            .into_iter()
            .map(|aux| if aux.is_relative() { base.join(aux) } else { aux })
            .collect();

        debug!(
            path = %path.display(),
            auxiliary = config.auxiliary.len(),
            "loaded generator config"
        );
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoaderError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::LoaderError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
