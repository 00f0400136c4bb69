//! Schema file loading.
//!
//! A run has one primary schema, whose commands are generated, and any
//! number of auxiliary schemas that only reserve top-level names.
//!
//! ```no_run
//! use argspec_loader::SchemaInputs;
//!
//! let inputs = SchemaInputs::builder("CFGArgs/cfg_args.json")
//!     .auxiliary("ModelConfig/model_config.json")
//!     .load()
//!     .unwrap();
//! let commands = inputs.compile().unwrap();
//! println!("{} commands from {}", commands.len(), inputs.input_name());
//! ```

use std::path::{Path, PathBuf};

use argspec_core::{RawSchema, RenderedCommand, compile};
use tracing::{debug, info};

use crate::error::{LoaderError, Result};

/// Reads one `.json` schema file.
///
/// Top-level keys keep their file order and duplicates are preserved, so
/// they can be reported during compilation.
///
/// # Errors
///
/// Returns [`LoaderError::InvalidInput`] if the path does not exist or has
/// no `.json` extension, [`LoaderError::Io`] if it cannot be read, or
/// [`LoaderError::Json`] if it is not a JSON object.
pub fn load_schema(path: impl AsRef<Path>) -> Result<RawSchema> {
    let path = path.as_ref();
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(LoaderError::InvalidInput(format!(
            "{} is not a .json file",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(LoaderError::InvalidInput(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let schema: RawSchema = serde_json::from_reader(reader)?;
    debug!(path = %path.display(), commands = schema.len(), "loaded schema");
    Ok(schema)
}

/// The loaded primary and auxiliary schemas of one run.
#[derive(Debug)]
pub struct SchemaInputs {
    input_name: String,
    primary: RawSchema,
    auxiliary: Vec<RawSchema>,
}

impl SchemaInputs {
    /// Returns a builder for the given primary schema path.
    pub fn builder(primary: impl Into<PathBuf>) -> SchemaInputsBuilder {
        SchemaInputsBuilder {
            primary: primary.into(),
            auxiliary: Vec::new(),
        }
    }

    /// File name of the primary schema, as shown in generated banners.
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// The schema whose commands are generated.
    pub fn primary(&self) -> &RawSchema {
        &self.primary
    }

    /// Schemas that only reserve names.
    pub fn auxiliary(&self) -> &[RawSchema] {
        &self.auxiliary
    }

    /// Compiles the primary schema against the auxiliary names.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Spec`] with the first validation failure.
    pub fn compile(&self) -> Result<Vec<RenderedCommand>> {
        let rendered = compile(&self.primary, &self.auxiliary)?;
        info!(
            input = %self.input_name,
            commands = rendered.len(),
            "compiled input"
        );
        Ok(rendered)
    }
}

/// Collects the paths of one run before loading them.
#[derive(Debug, Clone)]
pub struct SchemaInputsBuilder {
    primary: PathBuf,
    auxiliary: Vec<PathBuf>,
}

impl SchemaInputsBuilder {
    /// Adds one auxiliary schema path.
    pub fn auxiliary(mut self, path: impl Into<PathBuf>) -> Self {
        self.auxiliary.push(path.into());
        self
    }

    /// Adds several auxiliary schema paths, keeping their order.
    pub fn auxiliaries<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.auxiliary.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Loads every schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`load_schema`] failure.
    pub fn load(self) -> Result<SchemaInputs> {
        let primary = load_schema(&self.primary)?;
        let auxiliary = self
            .auxiliary
            .iter()
            .map(load_schema)
            .collect::<Result<Vec<_>>>()?;

        let input_name = self
            .primary
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(SchemaInputs {
            input_name,
            primary,
            auxiliary,
        })
    }
}
