//! Cross-schema registry of claimed top-level command names.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, SpecError};

/// Top-level names claimed during one compilation run.
///
/// Seeded from auxiliary schemas that are compiled elsewhere, then grown by
/// the primary schema. Any collision is fatal.
///
/// # Examples
///
/// ```
/// use argspec_core::Registry;
///
/// let mut registry = Registry::new();
/// registry.seed_auxiliary(["programmer", "model_config"]).unwrap();
/// assert!(registry.claim("utst").is_ok());
/// assert!(registry.claim("programmer").is_err());
/// assert!(registry.claim("utst").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    claimed: HashSet<String>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records names that are already defined by auxiliary schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Duplicate`] if a name appears twice across the
    /// auxiliary schemas.
    pub fn seed_auxiliary<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for name in names {
            if !self.claimed.insert(name.to_string()) {
                return Err(SpecError::Duplicate(format!(
                    "command '{name}' is defined more than once in the auxiliary schemas"
                )));
            }
        }
        debug!(claimed = self.claimed.len(), "seeded registry");
        Ok(())
    }

    /// Claims a top-level name of the schema being compiled.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Duplicate`] if the name is already claimed.
    pub fn claim(&mut self, name: &str) -> Result<()> {
        if !self.claimed.insert(name.to_string()) {
            return Err(SpecError::Duplicate(format!(
                "command '{name}' is already defined"
            )));
        }
        Ok(())
    }

    /// Claims the qualified name `<group>_<member>` of a group member.
    ///
    /// Members share the class namespace of top-level commands, so a
    /// member may not shadow a top-level name or another group's member.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::Duplicate`] if the qualified name is taken.
    pub fn claim_member(&mut self, group: &str, member: &str) -> Result<()> {
        let qualified = format!("{group}_{member}");
        if !self.claimed.insert(qualified.clone()) {
            return Err(SpecError::Duplicate(format!(
                "sub-command '{member}' of group '{group}' generates '{qualified}', which is already defined"
            )));
        }
        Ok(())
    }

    /// Returns `true` if `name` has been claimed.
    pub fn contains(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Number of claimed names.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Returns `true` if nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auxiliary_duplicates_are_fatal() {
        let mut registry = Registry::new();
        let err = registry
            .seed_auxiliary(["programmer", "bitstream", "programmer"])
            .unwrap_err();
        assert!(matches!(err, SpecError::Duplicate(ref m) if m.contains("programmer")));
    }

    #[test]
    fn test_claim_grows_the_set() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.claim("utst").unwrap();
        registry.claim("program").unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("utst"));
        assert!(!registry.contains("other"));
    }

    #[test]
    fn test_member_names_share_the_namespace() {
        let mut registry = Registry::new();
        registry.claim("utst_sub0").unwrap();
        registry.claim("utst").unwrap();
        let err = registry.claim_member("utst", "sub0").unwrap_err();
        assert!(matches!(err, SpecError::Duplicate(ref m) if m.contains("utst_sub0")));

        registry.claim_member("utst", "sub1").unwrap();
        assert!(registry.claim("utst_sub1").is_err());
    }

    #[test]
    fn test_claim_rejects_auxiliary_names() {
        let mut registry = Registry::new();
        registry.seed_auxiliary(["programmer"]).unwrap();
        assert!(matches!(
            registry.claim("programmer"),
            Err(SpecError::Duplicate(_))
        ));
    }
}
