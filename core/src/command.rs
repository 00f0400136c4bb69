//! Command records ("databases"): option aggregation and render order.

use std::cmp::Reverse;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SpecError};
use crate::naming::{Case, validate_name};
use crate::option::{ClaimedNames, OptionSpec};
use crate::raw::{RawFlatCommand, RawOption};

/// Positional argument bounds of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Minimum number of positional arguments.
    pub min: u64,
    /// Maximum number of positional arguments; `None` is unbounded.
    pub max: Option<u64>,
}

impl Default for Arity {
    fn default() -> Self {
        Self {
            min: 0,
            max: Some(0),
        }
    }
}

impl Arity {
    /// Parses a declared `[min, max]` pair where `max = -1` is unbounded.
    ///
    /// An absent declaration yields `[0, 0]`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Value`] unless the value is a two-element list of
    /// integers with `min >= 0` and `max >= min` or `max == -1`.
    pub fn from_value(value: Option<&Value>, command: &str) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        let malformed = || {
            SpecError::Value(format!(
                "arg of command '{command}' must be [min, max] with 0 <= min <= max or max = -1, but found {value}"
            ))
        };

        let bounds = value.as_array().ok_or_else(malformed)?;
        let [min, max] = bounds.as_slice() else {
            return Err(malformed());
        };
        let min = min.as_u64().ok_or_else(malformed)?;
        let max = max.as_i64().ok_or_else(malformed)?;

        match max {
            -1 => Ok(Self { min, max: None }),
            max if max >= 0 && max as u64 >= min => Ok(Self {
                min,
                max: Some(max as u64),
            }),
            _ => Err(malformed()),
        }
    }

    /// Upper bound as the runtime expects it, `-1` meaning unbounded.
    pub fn max_bound(&self) -> i64 {
        self.max.map_or(-1, |max| max as i64)
    }
}

/// One renderable command and its options.
///
/// Options keep declaration order; [`arrange`](CommandSpec::arrange)
/// provides the order used for runtime rule tables.
///
/// # Examples
///
/// ```
/// use argspec_core::{Arity, CommandSpec, RawOption};
///
/// let mut command = CommandSpec::new("fpga_status", vec!["Show status".into()], Arity::default(), false).unwrap();
/// command.add_raw_option(RawOption::new("cable", "str", "Cable name")).unwrap();
/// command.add_raw_option(RawOption::new("index", "int", "Device index")).unwrap();
/// assert_eq!(command.options().len(), 2);
/// assert_eq!(command.longest_token(), "< cable >".len());
/// assert!(command.add_raw_option(RawOption::new("cable", "flag", "again")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    help: Vec<String>,
    arity: Arity,
    hidden: bool,
    options: Vec<OptionSpec>,
    claimed: ClaimedNames,
    longest_token: usize,
}

impl CommandSpec {
    /// Creates a command without options.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Naming`] for a malformed name or
    /// [`SpecError::Value`] for empty help text.
    pub fn new(name: &str, help: Vec<String>, arity: Arity, hidden: bool) -> Result<Self> {
        validate_name(name, Case::Lower)?;
        if help.iter().all(|line| line.trim().is_empty()) {
            return Err(SpecError::Value(format!(
                "help of command '{name}' must not be empty"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            help,
            arity,
            hidden,
            options: Vec::new(),
            claimed: ClaimedNames::default(),
            longest_token: 0,
        })
    }

    /// Builds a command and all of its options from a raw declaration.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the command or any of its options.
    pub fn from_raw(name: &str, raw: RawFlatCommand) -> Result<Self> {
        let mut command = Self::new(name, raw.help.into_lines(), Arity::default(), raw.hidden)?;
        command.arity = Arity::from_value(raw.arg.as_ref(), name)?;
        for option in raw.option {
            command.add_raw_option(option)?;
        }
        debug!(
            command = %command.name,
            options = command.options.len(),
            "built command"
        );
        Ok(command)
    }

    /// Validates a raw option against this command and adds it.
    pub fn add_raw_option(&mut self, raw: RawOption) -> Result<()> {
        let option = OptionSpec::from_raw(raw, &self.claimed, &self.name)?;
        self.add_option(option)
    }

    /// Adds an already built option, claiming its names.
    ///
    /// The help-column width grows with every inserted option, hidden or
    /// not.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Duplicate`] if the option's long or short name is
    /// reserved or already claimed by this command.
    pub fn add_option(&mut self, option: OptionSpec) -> Result<()> {
        self.claimed.check_long(&option.name, &self.name)?;
        if let Some(short) = option.short {
            self.claimed.check_short(short, &option.name, &self.name)?;
        }
        self.claimed.claim(&option);
        self.longest_token = self.longest_token.max(option.describe().len());
        self.options.push(option);
        Ok(())
    }

    /// Options ordered by descending name length, declaration order kept
    /// within the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::{Arity, CommandSpec, RawOption};
    ///
    /// let mut command = CommandSpec::new("sort_me", vec!["h".into()], Arity::default(), false).unwrap();
    /// for name in ["abc", "abcde", "xyz", "abcdefg"] {
    ///     command.add_raw_option(RawOption::new(name, "flag", "f")).unwrap();
    /// }
    /// let order: Vec<&str> = command.arrange().iter().map(|o| o.name.as_str()).collect();
    /// assert_eq!(order, vec!["abcdefg", "abcde", "abc", "xyz"]);
    /// ```
    pub fn arrange(&self) -> Vec<&OptionSpec> {
        let mut ordered: Vec<&OptionSpec> = self.options.iter().collect();
        ordered.sort_by_key(|option| Reverse(option.name.len()));
        ordered
    }

    /// Number of options shown in the usage table.
    pub fn visible_option_count(&self) -> usize {
        self.options.iter().filter(|option| !option.hidden).count()
    }

    /// Command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help lines.
    pub fn help(&self) -> &[String] {
        &self.help
    }

    /// Positional argument bounds.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether the command is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Options in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Widest `describe()` token among all inserted options.
    pub fn longest_token(&self) -> usize {
        self.longest_token
    }
}
