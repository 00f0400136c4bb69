//! Option records: normalization, defaulting, and per-command uniqueness.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SpecError};
use crate::naming::{Case, validate_name};
use crate::raw::RawOption;

/// Long option name reserved by the runtime.
pub const RESERVED_LONG: &str = "help";
/// Short option name reserved by the runtime.
pub const RESERVED_SHORT: char = 'h';
/// Prefix reserved for runtime members of the generated class.
pub const RESERVED_PREFIX: &str = "m_";
/// Methods of the generated class; a field cannot share their names.
pub const RESERVED_MEMBERS: [&str; 2] = ["parse", "print"];

/// Value kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Presence toggles a boolean.
    Flag,
    /// Unsigned integer value.
    Int,
    /// Free-form string value.
    Str,
    /// One of a fixed set of strings.
    Enum,
}

impl OptionKind {
    /// Type tag understood by the `CFGArg_RULE` runtime.
    pub fn tag(self) -> &'static str {
        match self {
            OptionKind::Flag => "flag",
            OptionKind::Int => "int",
            OptionKind::Str => "str",
            OptionKind::Enum => "enum",
        }
    }
}

/// Resolved default of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Flag default.
    Bool(bool),
    /// Integer default (a single element for repeatable options).
    Int(u64),
    /// String or enum default (a single element for repeatable options).
    Str(String),
    /// Repeatable option that starts empty.
    Unset,
}

/// Long and short names already claimed inside one command.
#[derive(Debug, Clone, Default)]
pub struct ClaimedNames {
    long: HashSet<String>,
    short: HashSet<char>,
}

impl ClaimedNames {
    /// Fails if `name` is reserved or already claimed.
    pub fn check_long(&self, name: &str, command: &str) -> Result<()> {
        if name == RESERVED_LONG {
            return Err(SpecError::Duplicate(format!(
                "option name '{RESERVED_LONG}' is reserved in command '{command}'"
            )));
        }
        if self.long.contains(name) {
            return Err(SpecError::Duplicate(format!(
                "option '{name}' is declared twice in command '{command}'"
            )));
        }
        Ok(())
    }

    /// Fails if `short` is reserved or already claimed.
    pub fn check_short(&self, short: char, option: &str, command: &str) -> Result<()> {
        if short == RESERVED_SHORT {
            return Err(SpecError::Duplicate(format!(
                "short name '{RESERVED_SHORT}' of option '{option}' is reserved in command '{command}'"
            )));
        }
        if self.short.contains(&short) {
            return Err(SpecError::Duplicate(format!(
                "short name '{short}' of option '{option}' is already used in command '{command}'"
            )));
        }
        Ok(())
    }

    /// Records the names of an accepted option.
    pub fn claim(&mut self, option: &OptionSpec) {
        self.long.insert(option.name.clone());
        if let Some(short) = option.short {
            self.short.insert(short);
        }
    }
}

/// A fully validated option.
///
/// # Examples
///
/// ```
/// use argspec_core::{ClaimedNames, DefaultValue, OptionKind, OptionSpec, RawOption};
///
/// let raw = RawOption::new("target", "fpga | flash", "Target device");
/// let option = OptionSpec::from_raw(raw, &ClaimedNames::default(), "program").unwrap();
/// assert_eq!(option.kind, OptionKind::Enum);
/// assert_eq!(option.variants, vec!["fpga", "flash"]);
/// assert_eq!(option.default, DefaultValue::Str("fpga".into()));
/// assert_eq!(option.describe(), "< target >");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Long name, also the generated field name.
    pub name: String,
    /// Single-letter short name.
    pub short: Option<char>,
    /// Value kind.
    pub kind: OptionKind,
    /// Enum members; empty unless `kind` is [`OptionKind::Enum`].
    pub variants: Vec<String>,
    /// Whether the option may be omitted.
    pub optional: bool,
    /// Whether the option may be repeated.
    pub multiple: bool,
    /// Resolved default.
    pub default: DefaultValue,
    /// Help lines, at least one, none empty.
    pub help: Vec<String>,
    /// Excluded from the usage table.
    pub hidden: bool,
}

impl OptionSpec {
    /// Builds an option from its raw declaration.
    ///
    /// `claimed` holds the names already taken by earlier options of
    /// `command`; it is not modified.
    ///
    /// # Errors
    ///
    /// - [`SpecError::Naming`] for a malformed long or short name.
    /// - [`SpecError::Duplicate`] for a reserved or already claimed name.
    /// - [`SpecError::SchemaShape`] for an unknown type or an illegal `multi`.
    /// - [`SpecError::TypeMismatch`] for a default of the wrong type.
    /// - [`SpecError::Value`] for empty enum variants or empty help.
    pub fn from_raw(raw: RawOption, claimed: &ClaimedNames, command: &str) -> Result<Self> {
        let RawOption {
            name,
            short,
            kind,
            optional,
            multi,
            default,
            help,
            hide,
        } = raw;

        validate_name(&name, Case::Lower)?;
        if name.starts_with(RESERVED_PREFIX) {
            return Err(SpecError::Naming(format!(
                "option name '{name}' in command '{command}' cannot start with '{RESERVED_PREFIX}'"
            )));
        }
        if RESERVED_MEMBERS.contains(&name.as_str()) {
            return Err(SpecError::Naming(format!(
                "option name '{name}' in command '{command}' collides with the generated {name}() method"
            )));
        }
        claimed.check_long(&name, command)?;

        let short = match short {
            Some(raw_short) => {
                let c = parse_short(&raw_short, &name, command)?;
                claimed.check_short(c, &name, command)?;
                Some(c)
            }
            None => None,
        };

        let (kind, variants) = resolve_kind(&kind, &name, command)?;
        if multi && matches!(kind, OptionKind::Flag | OptionKind::Enum) {
            return Err(SpecError::SchemaShape(format!(
                "option '{name}' in command '{command}' of type {} cannot be multi",
                kind.tag()
            )));
        }

        let default = resolve_default(default, kind, multi, &variants, &name, command)?;

        let help = help.into_lines();
        if help.is_empty() || help.iter().any(|line| line.is_empty()) {
            return Err(SpecError::Value(format!(
                "help of option '{name}' in command '{command}' must not be empty"
            )));
        }

        debug!(command, option = %name, kind = kind.tag(), "accepted option");

        Ok(Self {
            name,
            short,
            kind,
            variants,
            optional,
            multiple: multi,
            default,
            help,
            hidden: hide,
        })
    }

    /// Token shown in the usage table.
    ///
    /// Required options render as `< name >`, optional ones as `{ name }`,
    /// with `:s` appended to the name when a short form exists and a
    /// trailing `s` for repeatable options.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{ClaimedNames, OptionSpec, RawOption};
    ///
    /// let mut raw = RawOption::new("files", "str", "Input files");
    /// raw.short = Some("f".into());
    /// raw.multi = true;
    /// let option = OptionSpec::from_raw(raw, &ClaimedNames::default(), "read").unwrap();
    /// assert_eq!(option.describe(), "< files:f >s");
    /// ```
    pub fn describe(&self) -> String {
        let body = match self.short {
            Some(short) => format!("{}:{short}", self.name),
            None => self.name.clone(),
        };
        let token = if self.optional {
            format!("{{ {body} }}")
        } else {
            format!("< {body} >")
        };
        if self.multiple {
            format!("{token}s")
        } else {
            token
        }
    }
}

fn parse_short(raw: &str, option: &str, command: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Ok(c),
        _ => Err(SpecError::Naming(format!(
            "short name '{raw}' of option '{option}' in command '{command}' must be a single lowercase letter"
        ))),
    }
}

fn resolve_kind(raw: &str, option: &str, command: &str) -> Result<(OptionKind, Vec<String>)> {
    if raw.contains('|') {
        let variants: Vec<String> = raw.split('|').map(|v| v.trim().to_string()).collect();
        if variants.iter().any(String::is_empty) {
            return Err(SpecError::Value(format!(
                "enum '{raw}' of option '{option}' in command '{command}' has an empty member"
            )));
        }
        if variants.len() < 2 {
            return Err(SpecError::Value(format!(
                "enum of option '{option}' in command '{command}' needs at least two members"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = variants.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(SpecError::Duplicate(format!(
                "enum member '{dup}' of option '{option}' in command '{command}' is listed twice"
            )));
        }
        return Ok((OptionKind::Enum, variants));
    }

    let kind = match raw {
        "flag" => OptionKind::Flag,
        "int" => OptionKind::Int,
        "str" | "string" => OptionKind::Str,
        other => {
            return Err(SpecError::SchemaShape(format!(
                "option '{option}' in command '{command}' has unknown type '{other}' \
                 (expected flag, int, str, or a|b enum)"
            )));
        }
    };
    Ok((kind, Vec::new()))
}

fn resolve_default(
    declared: Option<Value>,
    kind: OptionKind,
    multi: bool,
    variants: &[String],
    option: &str,
    command: &str,
) -> Result<DefaultValue> {
    let Some(value) = declared else {
        return Ok(match kind {
            OptionKind::Flag => DefaultValue::Bool(false),
            OptionKind::Int if multi => DefaultValue::Unset,
            OptionKind::Int => DefaultValue::Int(0),
            OptionKind::Str if multi => DefaultValue::Unset,
            OptionKind::Str => DefaultValue::Str(String::new()),
            OptionKind::Enum => DefaultValue::Str(variants[0].clone()),
        });
    };

    let mismatch = |expected: &str| {
        SpecError::TypeMismatch(format!(
            "default {value} of option '{option}' in command '{command}' must be {expected}"
        ))
    };

    match kind {
        OptionKind::Flag => value
            .as_bool()
            .map(DefaultValue::Bool)
            .ok_or_else(|| mismatch("a boolean")),
        OptionKind::Int => value
            .as_u64()
            .map(DefaultValue::Int)
            .ok_or_else(|| mismatch("a non-negative integer")),
        OptionKind::Str => value
            .as_str()
            .map(|s| DefaultValue::Str(s.to_string()))
            .ok_or_else(|| mismatch("a string")),
        OptionKind::Enum => match value.as_str() {
            Some(s) if variants.iter().any(|v| v == s) => Ok(DefaultValue::Str(s.to_string())),
            _ => Err(mismatch(&format!("one of {}", variants.join("|")))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::raw::HelpText;

    fn build(raw: RawOption) -> Result<OptionSpec> {
        OptionSpec::from_raw(raw, &ClaimedNames::default(), "program")
    }

    #[test]
    fn test_defaults_for_absent_keys() {
        let option = build(RawOption::new("verbose", "flag", "Be loud")).unwrap();
        assert_eq!(option.short, None);
        assert!(!option.optional);
        assert!(!option.multiple);
        assert!(!option.hidden);
        assert_eq!(option.default, DefaultValue::Bool(false));
        assert!(option.variants.is_empty());
    }

    #[test]
    fn test_flag_multi_is_shape_error() {
        let mut raw = RawOption::new("verbose", "flag", "Be loud");
        raw.multi = true;
        assert!(matches!(build(raw), Err(SpecError::SchemaShape(_))));
    }

    #[test]
    fn test_enum_multi_is_shape_error() {
        let mut raw = RawOption::new("target", "a|b", "t");
        raw.multi = true;
        assert!(matches!(build(raw), Err(SpecError::SchemaShape(_))));
    }

    #[test]
    fn test_enum_variants_are_trimmed_and_default_to_first() {
        let option = build(RawOption::new("mode", " a | b|c ", "m")).unwrap();
        assert_eq!(option.kind, OptionKind::Enum);
        assert_eq!(option.variants, vec!["a", "b", "c"]);
        assert_eq!(option.default, DefaultValue::Str("a".into()));
    }

    #[test]
    fn test_enum_empty_member_is_value_error() {
        assert!(matches!(
            build(RawOption::new("mode", "a||b", "m")),
            Err(SpecError::Value(_))
        ));
        assert!(matches!(
            build(RawOption::new("mode", "a|", "m")),
            Err(SpecError::Value(_))
        ));
    }

    #[test]
    fn test_enum_repeated_member_is_duplicate() {
        assert!(matches!(
            build(RawOption::new("mode", "a|b|a", "m")),
            Err(SpecError::Duplicate(_))
        ));
    }

    #[test]
    fn test_enum_default_must_be_member() {
        let mut raw = RawOption::new("mode", "a|b", "m");
        raw.default = Some(json!("b"));
        assert_eq!(build(raw.clone()).unwrap().default, DefaultValue::Str("b".into()));

        raw.default = Some(json!("c"));
        assert!(matches!(build(raw), Err(SpecError::TypeMismatch(_))));
    }

    #[test]
    fn test_inferred_defaults_depend_on_multi() {
        assert_eq!(
            build(RawOption::new("index", "int", "i")).unwrap().default,
            DefaultValue::Int(0)
        );
        assert_eq!(
            build(RawOption::new("name_", "string", "n")).unwrap().default,
            DefaultValue::Str(String::new())
        );

        let mut raw = RawOption::new("index", "int", "i");
        raw.multi = true;
        assert_eq!(build(raw).unwrap().default, DefaultValue::Unset);

        let mut raw = RawOption::new("files", "str", "f");
        raw.multi = true;
        assert_eq!(build(raw).unwrap().default, DefaultValue::Unset);
    }

    #[test]
    fn test_declared_defaults_type_check() {
        let mut raw = RawOption::new("debug", "flag", "d");
        raw.default = Some(json!(true));
        assert_eq!(build(raw.clone()).unwrap().default, DefaultValue::Bool(true));
        raw.default = Some(json!(1));
        assert!(matches!(build(raw), Err(SpecError::TypeMismatch(_))));

        let mut raw = RawOption::new("index", "int", "i");
        raw.multi = true;
        raw.default = Some(json!(3));
        assert_eq!(build(raw.clone()).unwrap().default, DefaultValue::Int(3));
        raw.default = Some(json!("3"));
        assert!(matches!(build(raw.clone()), Err(SpecError::TypeMismatch(_))));
        raw.default = Some(json!(-1));
        assert!(matches!(build(raw), Err(SpecError::TypeMismatch(_))));

        let mut raw = RawOption::new("cable", "str", "c");
        raw.default = Some(json!("usb"));
        assert_eq!(build(raw.clone()).unwrap().default, DefaultValue::Str("usb".into()));
        raw.default = Some(json!(false));
        assert!(matches!(build(raw), Err(SpecError::TypeMismatch(_))));
    }

    #[test]
    fn test_unknown_type_is_shape_error() {
        assert!(matches!(
            build(RawOption::new("cable", "float", "c")),
            Err(SpecError::SchemaShape(_))
        ));
    }

    #[test]
    fn test_reserved_names() {
        assert!(matches!(
            build(RawOption::new("help", "flag", "h")),
            Err(SpecError::Duplicate(_))
        ));

        let mut raw = RawOption::new("hold", "flag", "h");
        raw.short = Some("h".into());
        assert!(matches!(build(raw), Err(SpecError::Duplicate(_))));

        assert!(matches!(
            build(RawOption::new("m_args", "str", "a")),
            Err(SpecError::Naming(_))
        ));
    }

    #[test]
    fn test_generated_method_names_are_reserved() {
        for name in RESERVED_MEMBERS {
            assert!(
                matches!(
                    build(RawOption::new(name, "flag", "f")),
                    Err(SpecError::Naming(ref m)) if m.contains(name)
                ),
                "{name} should be rejected"
            );
        }
        assert!(build(RawOption::new("printer", "str", "p")).is_ok());
    }

    #[test]
    fn test_short_name_format() {
        for bad in ["", "ab", "A", "1"] {
            let mut raw = RawOption::new("cable", "str", "c");
            raw.short = Some(bad.into());
            assert!(
                matches!(build(raw), Err(SpecError::Naming(_))),
                "short '{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_claimed_names_are_rejected() {
        let mut claimed = ClaimedNames::default();
        let mut first = RawOption::new("cable", "str", "c");
        first.short = Some("c".into());
        let first = OptionSpec::from_raw(first, &claimed, "program").unwrap();
        claimed.claim(&first);

        let same_long = RawOption::new("cable", "int", "again");
        assert!(matches!(
            OptionSpec::from_raw(same_long, &claimed, "program"),
            Err(SpecError::Duplicate(_))
        ));

        let mut same_short = RawOption::new("config", "str", "c");
        same_short.short = Some("c".into());
        assert!(matches!(
            OptionSpec::from_raw(same_short, &claimed, "program"),
            Err(SpecError::Duplicate(_))
        ));
    }

    #[test]
    fn test_empty_help_is_value_error() {
        let mut raw = RawOption::new("cable", "str", "");
        assert!(matches!(build(raw.clone()), Err(SpecError::Value(_))));
        raw.help = HelpText::Lines(Vec::new());
        assert!(matches!(build(raw.clone()), Err(SpecError::Value(_))));
        raw.help = HelpText::Lines(vec!["ok".into(), String::new()]);
        assert!(matches!(build(raw), Err(SpecError::Value(_))));
    }

    #[test]
    fn test_describe_tokens() {
        let mut raw = RawOption::new("index", "int", "i");
        assert_eq!(build(raw.clone()).unwrap().describe(), "< index >");
        raw.short = Some("i".into());
        assert_eq!(build(raw.clone()).unwrap().describe(), "< index:i >");
        raw.optional = true;
        assert_eq!(build(raw.clone()).unwrap().describe(), "{ index:i }");
        raw.short = None;
        raw.multi = true;
        assert_eq!(build(raw).unwrap().describe(), "{ index }s");
    }
}
