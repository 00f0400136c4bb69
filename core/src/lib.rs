//! Schema model, validation, and rendering for generated command parsers.
//!
//! This crate turns a declarative description of CLI commands into C++
//! fragments for the `CFGArg` runtime:
//!
//! - [`RawSchema`] / [`RawCommand`]: the typed JSON boundary; a top-level
//!   declaration is either a flat command or a sub-command group.
//! - [`OptionSpec`]: one option with its kind, short name, and resolved
//!   default.
//! - [`CommandSpec`]: a command with arity, help, and options, unique per
//!   command.
//! - [`SubcommandGroup`]: a dispatcher over at least two sub-commands.
//! - [`Registry`]: top-level names claimed across all schemas of a run.
//! - [`render`]: the deterministic text emitter.
//!
//! [`compile`] runs the whole pipeline and stops at the first
//! [`SpecError`].
//!
//! # Example
//!
//! ```
//! use argspec_core::*;
//!
//! let schema = RawSchema::from_json_str(r#"{
//!     "fpga_status": {
//!         "help": "Show the FPGA status",
//!         "arg": [0, 1],
//!         "option": [
//!             { "name": "cable", "short": "c", "type": "str", "default": "1", "help": "Cable name" },
//!             { "name": "index", "short": "d", "type": "int", "default": 1, "help": "Device index" }
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let rendered = compile(&schema, &[]).unwrap();
//! assert!(rendered[0].declaration.contains("    std::string cable = \"1\";\n"));
//! assert!(rendered[0].declaration.contains("    uint64_t index = 1;\n"));
//! ```

mod command;
mod compile;
mod error;
mod naming;
mod option;
mod raw;
mod registry;
mod render;
mod tree;

pub use command::{Arity, CommandSpec};
pub use compile::{RenderedCommand, compile};
pub use error::{Result, SpecError};
pub use naming::{Case, validate_name};
pub use option::{
    ClaimedNames, DefaultValue, OptionKind, OptionSpec, RESERVED_LONG, RESERVED_MEMBERS,
    RESERVED_PREFIX, RESERVED_SHORT,
};
pub use raw::{
    GROUP_HELP_KEY, HelpText, RawCommand, RawFlatCommand, RawGroup, RawGroupEntry, RawOption,
    RawSchema,
};
pub use registry::Registry;
pub use render::{
    ENUM_WRAP_WIDTH, Rendered, class_name, command_help, render, render_command, render_group,
    wrap_variants,
};
pub use tree::{CommandNode, GroupMember, MIN_GROUP_MEMBERS, SubcommandGroup, assemble};
