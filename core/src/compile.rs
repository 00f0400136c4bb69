//! One compilation run: registry, assembly, and rendering per top-level name.

use tracing::{debug, info};

use crate::error::Result;
use crate::raw::{RawCommand, RawSchema};
use crate::registry::Registry;
use crate::render::render;
use crate::tree::{CommandNode, assemble};

/// Rendered fragments of one top-level command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    /// Top-level name.
    pub name: String,
    /// Header fragment.
    pub declaration: String,
    /// Source fragment.
    pub definition: String,
}

/// Compiles a schema into rendered fragments, in declaration order.
///
/// Names of the `auxiliary` schemas are claimed first and their
/// declarations are otherwise ignored. Each primary name is then claimed
/// before its declaration is resolved, so a duplicate is reported without
/// validating any of its options. Group members are claimed as
/// `<group>_<member>`, the name their generated class is derived from.
///
/// # Examples
///
/// ```
/// use argspec_core::{RawSchema, SpecError, compile};
///
/// let schema = RawSchema::from_json_str(r#"{
///     "list_cable": { "help": "List cables", "option": [
///         { "name": "verbose", "short": "v", "type": "flag", "help": "Show more" }
///     ]}
/// }"#).unwrap();
/// let rendered = compile(&schema, &[]).unwrap();
/// assert_eq!(rendered[0].name, "list_cable");
///
/// let other = RawSchema::from_json_str(r#"{ "list_cable": { "help": "elsewhere" } }"#).unwrap();
/// assert!(matches!(compile(&schema, &[other]), Err(SpecError::Duplicate(_))));
/// ```
///
/// # Errors
///
/// Returns the first validation error; nothing is rendered in that case.
pub fn compile(schema: &RawSchema, auxiliary: &[RawSchema]) -> Result<Vec<RenderedCommand>> {
    let mut registry = Registry::new();
    registry.seed_auxiliary(auxiliary.iter().flat_map(|aux| aux.names()))?;

    let mut rendered = Vec::with_capacity(schema.len());
    for (name, value) in schema.entries() {
        registry.claim(name)?;
        let raw = RawCommand::from_value(name, value.clone())?;
        let node = assemble(name, raw)?;
        if let CommandNode::Group(group) = &node {
            for member in group.members() {
                registry.claim_member(name, &member.name)?;
            }
        }
        let output = render(&node);
        debug!(
            command = %name,
            declaration_bytes = output.declaration.len(),
            definition_bytes = output.definition.len(),
            "rendered command"
        );
        rendered.push(RenderedCommand {
            name: name.clone(),
            declaration: output.declaration,
            definition: output.definition,
        });
    }

    info!(
        commands = rendered.len(),
        auxiliary = auxiliary.len(),
        "compiled schema"
    );
    Ok(rendered)
}
