//! Assembles rendered fragments into a header and a source file.

use std::path::Path;

use argspec_core::RenderedCommand;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;

/// Complete text of the two generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    /// Header with guard, runtime include, and class declarations.
    pub header: String,
    /// Source with help literals and constructors.
    pub source: String,
}

/// Include guard for a given input file name.
///
/// The stem is the file name up to its first `.`, with every character
/// outside `[A-Za-z0-9_]` replaced by `_`.
///
/// # Examples
///
/// ```
/// use argspec_loader::guard_name;
///
/// assert_eq!(guard_name("cfg_args.json"), "cfg_args_AUTO_H");
/// assert_eq!(guard_name("model-config.v2.json"), "model_config_AUTO_H");
/// ```
pub fn guard_name(input_name: &str) -> String {
    let stem = input_name.split('.').next().unwrap_or_default();
    let stem: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{stem}_AUTO_H")
}

fn banner(generator: &str, input_name: &str) -> String {
    format!("\n/*\n    This file is auto-generated by {generator}\n        Input: {input_name}\n*/\n\n")
}

/// Wraps rendered commands into the final header and source text.
///
/// `input_name` is the schema file name shown in the banner and used for
/// the include guard. `header_name` is what the source file includes.
///
/// # Examples
///
/// ```
/// use argspec_core::RawSchema;
/// use argspec_loader::{GeneratorConfig, assemble_artifacts};
///
/// let schema = RawSchema::from_json_str(r#"{ "utst": { "help": "Unit test" } }"#).unwrap();
/// let commands = argspec_core::compile(&schema, &[]).unwrap();
/// let artifacts = assemble_artifacts(
///     "cfg_args.json",
///     "CFGArgs_auto.h",
///     &commands,
///     &GeneratorConfig::default(),
/// );
///
/// assert!(artifacts.header.starts_with("#ifndef cfg_args_AUTO_H\n#define cfg_args_AUTO_H\n\n"));
/// assert!(artifacts.header.ends_with("};\n\n#endif\n"));
/// assert!(artifacts.source.starts_with("#include \"CFGArgs_auto.h\"\n"));
/// ```
pub fn assemble_artifacts(
    input_name: &str,
    header_name: &str,
    commands: &[RenderedCommand],
    config: &GeneratorConfig,
) -> GeneratedArtifacts {
    let guard = guard_name(input_name);
    let banner = banner(&config.generator_name, input_name);

    let mut header = format!(
        "#ifndef {guard}\n#define {guard}\n\n#include \"{}\"\n{banner}",
        config.runtime_include
    );
    let mut source = format!("#include \"{header_name}\"\n{banner}");

    for command in commands {
        header.push_str(&command.declaration);
        source.push_str(&command.definition);
    }
    header.push_str("#endif\n");

    GeneratedArtifacts { header, source }
}

/// Writes `text` to `path` unless the file already holds exactly that text.
///
/// Returns `true` when the file was written. An unchanged file keeps its
/// modification time.
///
/// # Errors
///
/// Returns [`Io`](crate::LoaderError::Io) if the file cannot be written.
pub fn write_if_changed(path: impl AsRef<Path>, text: &str) -> Result<bool> {
    let path = path.as_ref();
    if std::fs::read(path).is_ok_and(|existing| existing == text.as_bytes()) {
        debug!(path = %path.display(), "output unchanged");
        return Ok(false);
    }
    std::fs::write(path, text)?;
    debug!(path = %path.display(), bytes = text.len(), "wrote output");
    Ok(true)
}
