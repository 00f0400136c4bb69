//! File handling around the `argspec-core` compiler.
//!
//! This crate reads JSON schema files, loads the optional YAML generator
//! configuration, and turns compiled commands into the generated header and
//! source files.
//!
//! # Quick start
//!
//! ```no_run
//! use argspec_loader::{GeneratorConfig, SchemaInputs, assemble_artifacts, write_if_changed};
//!
//! let config = GeneratorConfig::load("argspec.yml").unwrap();
//! let inputs = SchemaInputs::builder("cfg_args.json")
//!     .auxiliaries(config.auxiliary.iter())
//!     .load()
//!     .unwrap();
//! let commands = inputs.compile().unwrap();
//!
//! let artifacts = assemble_artifacts(inputs.input_name(), "cfg_args_auto.h", &commands, &config);
//! write_if_changed("cfg_args_auto.h", &artifacts.header).unwrap();
//! write_if_changed("cfg_args_auto.cpp", &artifacts.source).unwrap();
//! ```

mod config;
mod error;
mod loader;
mod writer;

pub use config::{DEFAULT_GENERATOR_NAME, DEFAULT_RUNTIME_INCLUDE, GeneratorConfig};
pub use error::{LoaderError, Result};
pub use loader::{SchemaInputs, SchemaInputsBuilder, load_schema};
pub use writer::{GeneratedArtifacts, assemble_artifacts, guard_name, write_if_changed};
