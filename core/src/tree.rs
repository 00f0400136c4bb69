//! Command tree assembly: single commands and sub-command groups.
//!
//! A flat declaration becomes [`CommandNode::Single`]. A list declaration
//! becomes a [`SubcommandGroup`] whose members are full commands named
//! `<group>_<member>`, plus a synthesized help text listing the members.

use std::collections::HashSet;

use tracing::debug;

use crate::command::CommandSpec;
use crate::error::{Result, SpecError};
use crate::naming::{Case, validate_name};
use crate::option::{RESERVED_LONG, RESERVED_MEMBERS, RESERVED_PREFIX};
use crate::raw::{RawCommand, RawGroup, RawGroupEntry};

/// Minimum number of members in a group.
pub const MIN_GROUP_MEMBERS: usize = 2;

/// One sub-command of a group.
#[derive(Debug, Clone)]
pub struct GroupMember {
    /// Unqualified sub-command name.
    pub name: String,
    /// One-line description listed in the group help.
    pub description: String,
    /// The sub-command, named `<group>_<name>`.
    pub spec: CommandSpec,
}

impl GroupMember {
    /// Whether the member is left out of the visible listing.
    pub fn hidden(&self) -> bool {
        self.spec.hidden()
    }
}

/// A dispatcher over at least two named sub-commands.
#[derive(Debug, Clone)]
pub struct SubcommandGroup {
    name: String,
    main_help: Vec<String>,
    members: Vec<GroupMember>,
}

impl SubcommandGroup {
    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author-supplied help of the dispatcher.
    pub fn main_help(&self) -> &[String] {
        &self.main_help
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// Width of the longest member name, hidden members included.
    pub fn longest_member_name(&self) -> usize {
        self.members
            .iter()
            .map(|member| member.name.len())
            .max()
            .unwrap_or(0)
    }

    /// Full help text of the dispatcher.
    ///
    /// The main help is followed by a "Supported sub commands" listing and
    /// a footer explaining how to reach per-sub-command help. Hidden members
    /// are listed only when `include_hidden` is set.
    pub fn help_lines(&self, include_hidden: bool) -> Vec<String> {
        let width = self.longest_member_name();
        let mut lines = self.main_help.clone();
        lines.push(String::new());
        lines.push("  Supported sub commands:".to_string());
        for member in &self.members {
            if member.hidden() && !include_hidden {
                continue;
            }
            lines.push(format!(
                "    {:<width$} : {}",
                member.name, member.description
            ));
        }
        lines.push(String::new());
        lines.push(format!(
            "  Note: Use \"{} <sub command> --help\" to show more detail of the sub command",
            self.name
        ));
        lines
    }
}

/// A validated top-level command.
#[derive(Debug, Clone)]
pub enum CommandNode {
    /// A single command with options.
    Single(CommandSpec),
    /// A dispatcher over sub-commands.
    Group(SubcommandGroup),
}

impl CommandNode {
    /// Top-level name.
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Single(spec) => spec.name(),
            CommandNode::Group(group) => group.name(),
        }
    }
}

/// Builds the command tree for one top-level declaration.
///
/// # Examples
///
/// ```
/// use argspec_core::{CommandNode, RawCommand, assemble};
/// use serde_json::json;
///
/// let raw = RawCommand::from_value("utst", json!([
///     {"help": "Unit test group"},
///     {"sub0": {"desc": "First", "help": "sub0 help"}},
///     {"sub1": {"desc": "Second", "help": "sub1 help"}}
/// ])).unwrap();
/// let CommandNode::Group(group) = assemble("utst", raw).unwrap() else {
///     panic!("expected a group");
/// };
/// assert_eq!(group.members()[1].spec.name(), "utst_sub1");
/// ```
///
/// # Errors
///
/// Propagates command and option errors, and for groups returns
/// [`SpecError::SchemaShape`] for a missing or repeated help entry or too few
/// members, and [`SpecError::Duplicate`] for a repeated member name.
pub fn assemble(name: &str, raw: RawCommand) -> Result<CommandNode> {
    match raw {
        RawCommand::Flat(flat) => CommandSpec::from_raw(name, flat).map(CommandNode::Single),
        RawCommand::Group(group) => assemble_group(name, group).map(CommandNode::Group),
    }
}

fn assemble_group(name: &str, raw: RawGroup) -> Result<SubcommandGroup> {
    validate_name(name, Case::Lower)?;

    let mut main_help: Option<Vec<String>> = None;
    let mut members = Vec::new();
    let mut seen = HashSet::new();

    for entry in raw.entries {
        match entry {
            RawGroupEntry::Help(help) => {
                if main_help.is_some() {
                    return Err(SpecError::SchemaShape(format!(
                        "group '{name}' declares more than one help entry"
                    )));
                }
                let lines = help.into_lines();
                if lines.iter().all(|line| line.trim().is_empty()) {
                    return Err(SpecError::Value(format!(
                        "help of group '{name}' must not be empty"
                    )));
                }
                main_help = Some(lines);
            }
            RawGroupEntry::Member {
                name: sub,
                desc,
                command,
            } => {
                validate_name(&sub, Case::Lower)?;
                if sub == RESERVED_LONG
                    || sub.starts_with(RESERVED_PREFIX)
                    || RESERVED_MEMBERS.contains(&sub.as_str())
                {
                    return Err(SpecError::Naming(format!(
                        "sub-command name '{sub}' of group '{name}' is reserved"
                    )));
                }
                if !seen.insert(sub.clone()) {
                    return Err(SpecError::Duplicate(format!(
                        "sub-command '{sub}' is declared twice in group '{name}'"
                    )));
                }
                if desc.trim().is_empty() {
                    return Err(SpecError::Value(format!(
                        "desc of sub-command '{sub}' in group '{name}' must not be empty"
                    )));
                }
                let spec = CommandSpec::from_raw(&format!("{name}_{sub}"), command)?;
                members.push(GroupMember {
                    name: sub,
                    description: desc,
                    spec,
                });
            }
        }
    }

    let Some(main_help) = main_help else {
        return Err(SpecError::SchemaShape(format!(
            "group '{name}' must declare exactly one help entry"
        )));
    };
    if members.len() < MIN_GROUP_MEMBERS {
        return Err(SpecError::SchemaShape(format!(
            "group '{name}' needs at least {MIN_GROUP_MEMBERS} sub-commands, but found {}",
            members.len()
        )));
    }

    debug!(group = name, members = members.len(), "assembled group");

    Ok(SubcommandGroup {
        name: name.to_string(),
        main_help,
        members,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn group(value: Value) -> Result<SubcommandGroup> {
        let raw = RawCommand::from_value("utst", value)?;
        match assemble("utst", raw)? {
            CommandNode::Group(group) => Ok(group),
            CommandNode::Single(_) => panic!("expected a group"),
        }
    }

    #[test]
    fn test_flat_declaration_is_single() {
        let raw = RawCommand::from_value("program", json!({"help": "p"})).unwrap();
        let node = assemble("program", raw).unwrap();
        assert!(matches!(node, CommandNode::Single(_)));
        assert_eq!(node.name(), "program");
    }

    #[test]
    fn test_group_with_one_member_fails() {
        let err = group(json!([
            {"help": "h"},
            {"sub0": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(_)));
    }

    #[test]
    fn test_group_without_help_fails() {
        let err = group(json!([
            {"sub0": {"desc": "d", "help": "h"}},
            {"sub1": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(_)));
    }

    #[test]
    fn test_group_with_two_help_entries_fails() {
        let err = group(json!([
            {"help": "h"},
            {"sub0": {"desc": "d", "help": "h"}},
            {"help": "again"},
            {"sub1": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(_)));
    }

    #[test]
    fn test_group_repeated_member_is_duplicate() {
        let err = group(json!([
            {"help": "h"},
            {"sub0": {"desc": "d", "help": "h"}},
            {"sub0": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::Duplicate(_)));
    }

    #[test]
    fn test_group_member_names_are_validated() {
        let err = group(json!([
            {"help": "h"},
            {"Sub0": {"desc": "d", "help": "h"}},
            {"sub1": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::Naming(_)));

        let err = group(json!([
            {"help": "h"},
            {"m_sub": {"desc": "d", "help": "h"}},
            {"sub1": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::Naming(_)));

        let err = group(json!([
            {"help": "h"},
            {"print": {"desc": "d", "help": "h"}},
            {"sub1": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::Naming(ref m) if m.contains("print")));
    }

    #[test]
    fn test_member_options_are_validated() {
        let err = group(json!([
            {"help": "h"},
            {"sub0": {"desc": "d", "help": "h", "option": [
                {"name": "debug", "type": "flag", "multi": true, "help": "d"}
            ]}},
            {"sub1": {"desc": "d", "help": "h"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, SpecError::SchemaShape(_)));
    }

    #[test]
    fn test_group_help_lists_members_aligned() {
        let group = group(json!([
            {"help": ["Unit test group", "second line"]},
            {"sub0": {"desc": "First sub command", "help": "h"}},
            {"longer_sub": {"desc": "Second sub command", "help": "h"}},
            {"secret": {"desc": "Hidden sub command", "help": "h", "hidden": true}}
        ]))
        .unwrap();

        assert_eq!(group.members()[0].spec.name(), "utst_sub0");
        assert_eq!(group.longest_member_name(), "longer_sub".len());

        let visible = group.help_lines(false);
        assert_eq!(
            visible,
            vec![
                "Unit test group",
                "second line",
                "",
                "  Supported sub commands:",
                "    sub0       : First sub command",
                "    longer_sub : Second sub command",
                "",
                "  Note: Use \"utst <sub command> --help\" to show more detail of the sub command",
            ]
        );

        let all = group.help_lines(true);
        assert!(all.contains(&"    secret     : Hidden sub command".to_string()));
    }
}
