//! Raw schema model: the typed boundary between JSON and the compiler.
//!
//! A schema file is a JSON object mapping top-level command names to either
//! a flat command declaration (an object) or a sub-command group (an array
//! of single-key objects). [`RawSchema`] keeps the top-level entries in
//! declaration order, duplicates included, so the registry can reject them.
//! [`RawCommand::from_value`] resolves one entry into the tagged union the
//! rest of the compiler pattern-matches on.
//!
//! # Examples
//!
//! ```
//! use argspec_core::{RawCommand, RawSchema};
//!
//! let schema = RawSchema::from_json_str(r#"{
//!     "list_device": { "help": "List devices", "arg": [0, 1] },
//!     "list_device": { "help": "again" }
//! }"#).unwrap();
//! assert_eq!(schema.names().collect::<Vec<_>>(), vec!["list_device", "list_device"]);
//!
//! let (name, value) = &schema.entries()[0];
//! let command = RawCommand::from_value(name, value.clone()).unwrap();
//! assert!(matches!(command, RawCommand::Flat(_)));
//! ```

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SpecError};

/// Key that marks the dispatcher's own help entry inside a group.
pub const GROUP_HELP_KEY: &str = "help";

/// Help text as written in a schema: a single line or a list of lines.
///
/// The compiler only ever works with [`HelpText::into_lines`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HelpText {
    /// One line.
    Line(String),
    /// Ordered lines.
    Lines(Vec<String>),
}

impl HelpText {
    /// Normalizes to a sequence of lines.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            HelpText::Line(line) => vec![line],
            HelpText::Lines(lines) => lines,
        }
    }
}

/// One option declaration, exactly as written.
///
/// Only `name`, `type`, and `help` are required; any key outside the
/// recognized set is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOption {
    /// Long option name.
    pub name: String,
    /// Single-letter short name.
    #[serde(default)]
    pub short: Option<String>,
    /// `flag`, `int`, `str`/`string`, or `a|b|...` for an enum.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the option may be omitted.
    #[serde(default)]
    pub optional: bool,
    /// Whether the option may be repeated.
    #[serde(default)]
    pub multi: bool,
    /// Declared default; `null` is treated as absent.
    #[serde(default)]
    pub default: Option<Value>,
    /// Help text.
    pub help: HelpText,
    /// Excluded from the usage table when set.
    #[serde(default)]
    pub hide: bool,
}

impl RawOption {
    /// Creates a declaration with the required keys and every optional key
    /// at its default.
    pub fn new(name: &str, kind: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            kind: kind.to_string(),
            optional: false,
            multi: false,
            default: None,
            help: HelpText::Line(help.to_string()),
            hide: false,
        }
    }
}

/// A single command declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFlatCommand {
    /// Command help text.
    pub help: HelpText,
    /// Positional argument bounds `[min, max]`; absent means `[0, 0]`.
    #[serde(default)]
    pub arg: Option<Value>,
    /// Option declarations in declaration order.
    #[serde(default)]
    pub option: Vec<RawOption>,
    /// Whether the command is hidden from listings.
    #[serde(default)]
    pub hidden: bool,
}

impl RawFlatCommand {
    /// Creates a declaration with only help text.
    pub fn new(help: &str) -> Self {
        Self {
            help: HelpText::Line(help.to_string()),
            arg: None,
            option: Vec::new(),
            hidden: false,
        }
    }

    /// Adds an option declaration.
    pub fn with_option(mut self, option: RawOption) -> Self {
        self.option.push(option);
        self
    }
}

/// A group member declaration: a flat command plus its one-line description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSubcommand {
    desc: String,
    help: HelpText,
    #[serde(default)]
    arg: Option<Value>,
    #[serde(default)]
    option: Vec<RawOption>,
    #[serde(default)]
    hidden: bool,
}

/// One entry of a sub-command group.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGroupEntry {
    /// The dispatcher's own help text.
    Help(HelpText),
    /// A named sub-command.
    Member {
        /// Sub-command name (unqualified).
        name: String,
        /// One-line description shown in the group help.
        desc: String,
        /// The sub-command's own declaration.
        command: RawFlatCommand,
    },
}

/// A sub-command group, entries in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGroup {
    /// Help and member entries.
    pub entries: Vec<RawGroupEntry>,
}

/// A resolved top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCommand {
    /// A single command with options.
    Flat(RawFlatCommand),
    /// A dispatcher over named sub-commands.
    Group(RawGroup),
}

impl RawCommand {
    /// Resolves a top-level JSON value into a flat command or a group.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::SchemaShape`] when the value is neither an object
    /// nor an array, when keys are missing or unrecognized, or when a group
    /// entry is not a single-key object.
    pub fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => serde_json::from_value::<RawFlatCommand>(value)
                .map(RawCommand::Flat)
                .map_err(|err| {
                    SpecError::SchemaShape(format!("command '{name}': {err}"))
                }),
            Value::Array(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for item in items {
                    entries.push(group_entry(name, item)?);
                }
                Ok(RawCommand::Group(RawGroup { entries }))
            }
            other => Err(SpecError::SchemaShape(format!(
                "command '{name}' must be an object or a list of sub-commands, but found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn group_entry(group: &str, item: Value) -> Result<RawGroupEntry> {
    let Value::Object(map) = item else {
        return Err(SpecError::SchemaShape(format!(
            "sub-command entry of '{group}' must be an object, but found {}",
            json_kind(&item)
        )));
    };
    if map.len() != 1 {
        return Err(SpecError::SchemaShape(format!(
            "sub-command entry of '{group}' must have exactly one key, but found {}",
            map.len()
        )));
    }

    let Some((key, value)) = map.into_iter().next() else {
        return Err(SpecError::SchemaShape(format!(
            "sub-command entry of '{group}' is empty"
        )));
    };

    if key == GROUP_HELP_KEY {
        let help = serde_json::from_value::<HelpText>(value).map_err(|_| {
            SpecError::SchemaShape(format!(
                "help of '{group}' must be a string or a list of strings"
            ))
        })?;
        return Ok(RawGroupEntry::Help(help));
    }

    let sub = serde_json::from_value::<RawSubcommand>(value).map_err(|err| {
        SpecError::SchemaShape(format!("sub-command '{key}' of '{group}': {err}"))
    })?;
    Ok(RawGroupEntry::Member {
        name: key,
        desc: sub.desc,
        command: RawFlatCommand {
            help: sub.help,
            arg: sub.arg,
            option: sub.option,
            hidden: sub.hidden,
        },
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// A whole schema file: top-level names with their unresolved declarations.
///
/// Entries keep file order and duplicate keys; resolving each declaration is
/// deferred until its name has been claimed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSchema {
    entries: Vec<(String, Value)>,
}

impl RawSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a schema from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text is malformed or not an object.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Appends a top-level declaration.
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Top-level entries in declaration order.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Top-level names in declaration order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the schema declares nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for RawSchema {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RawSchema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawSchema;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping command names to declarations")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<RawSchema, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    entries.push((name, value));
                }
                Ok(RawSchema { entries })
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_schema_keeps_order_and_duplicates() {
        let schema = RawSchema::from_json_str(
            r#"{ "zeta": {"help": "z"}, "alpha": {"help": "a"}, "zeta": {"help": "again"} }"#,
        )
        .unwrap();
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            vec!["zeta", "alpha", "zeta"]
        );
        assert_eq!(schema.entries()[2].1, json!({"help": "again"}));
    }

    #[test]
    fn test_schema_rejects_non_object_root() {
        assert!(RawSchema::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_flat_command_defaults() {
        let command = RawCommand::from_value("program", json!({"help": ["one", "two"]})).unwrap();
        let RawCommand::Flat(flat) = command else {
            panic!("expected a flat command");
        };
        assert_eq!(flat.help.into_lines(), vec!["one", "two"]);
        assert!(flat.arg.is_none());
        assert!(flat.option.is_empty());
        assert!(!flat.hidden);
    }

    #[test]
    fn test_option_unknown_key_is_shape_error() {
        let err = RawCommand::from_value(
            "program",
            json!({
                "help": "h",
                "option": [{"name": "cable", "type": "str", "help": "c", "hidden": true}]
            }),
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(ref m) if m.contains("hidden")));
    }

    #[test]
    fn test_option_missing_help_is_shape_error() {
        let err = RawCommand::from_value(
            "program",
            json!({"help": "h", "option": [{"name": "cable", "type": "str"}]}),
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(_)));
    }

    #[test]
    fn test_null_default_is_absent() {
        let option: RawOption = serde_json::from_value(
            json!({"name": "index", "type": "int", "default": null, "help": "i"}),
        )
        .unwrap();
        assert!(option.default.is_none());
    }

    #[test]
    fn test_group_entries_resolve_in_order() {
        let command = RawCommand::from_value(
            "utst",
            json!([
                {"help": "group help"},
                {"sub0": {"desc": "first", "help": "sub0 help"}},
                {"sub1": {"desc": "second", "help": "sub1 help", "hidden": true}}
            ]),
        )
        .unwrap();
        let RawCommand::Group(group) = command else {
            panic!("expected a group");
        };
        assert_eq!(group.entries.len(), 3);
        assert!(matches!(group.entries[0], RawGroupEntry::Help(_)));
        match &group.entries[2] {
            RawGroupEntry::Member {
                name,
                desc,
                command,
            } => {
                assert_eq!(name, "sub1");
                assert_eq!(desc, "second");
                assert!(command.hidden);
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_group_entry_with_two_keys_is_shape_error() {
        let err = RawCommand::from_value(
            "utst",
            json!([{"help": "h", "sub0": {"desc": "d", "help": "h"}}]),
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(_)));
    }

    #[test]
    fn test_member_without_desc_is_shape_error() {
        let err =
            RawCommand::from_value("utst", json!([{"sub0": {"help": "h"}}])).unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(ref m) if m.contains("desc")));
    }

    #[test]
    fn test_scalar_declaration_is_shape_error() {
        let err = RawCommand::from_value("program", json!("oops")).unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(ref m) if m.contains("a string")));
    }
}
