//! Identifier rules shared by commands, sub-commands, and options.

use crate::error::{Result, SpecError};

/// Required letter case for an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// `a-z`, used for command and option names.
    Lower,
    /// `A-Z`.
    Upper,
}

impl Case {
    fn accepts(self, c: char) -> bool {
        match self {
            Case::Lower => c.is_ascii_lowercase(),
            Case::Upper => c.is_ascii_uppercase(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Case::Lower => "lower",
            Case::Upper => "upper",
        }
    }
}

/// Validates an identifier.
///
/// The name must be at least two characters long. The first character is a
/// letter in the required case; every later character is a letter in the
/// required case, an ASCII digit, or `_`.
///
/// # Examples
///
/// ```
/// use argspec_core::{Case, validate_name};
///
/// assert!(validate_name("a_1", Case::Lower).is_ok());
/// assert!(validate_name("A1", Case::Lower).is_err());
/// assert!(validate_name("1a", Case::Lower).is_err());
/// ```
///
/// # Errors
///
/// Returns [`SpecError::Naming`] describing the first offending character.
pub fn validate_name(name: &str, case: Case) -> Result<()> {
    if name.chars().count() < 2 {
        return Err(SpecError::Naming(format!(
            "name must be at least two characters, but found '{name}'"
        )));
    }

    for (i, c) in name.chars().enumerate() {
        let ok = case.accepts(c) || (i > 0 && (c.is_ascii_digit() || c == '_'));
        if !ok {
            return Err(SpecError::Naming(format!(
                "expect '{c}' in '{name}' to be alphanumeric in {} case or '_', \
                 and the first character must be a letter",
                case.label()
            )));
        }
    }

    Ok(())
}
