//! Rendering of validated commands into `CFGArg` C++ fragments.
//!
//! Every command yields a declaration fragment (the `CFGArg_<NAME>` class)
//! and a definition fragment (help literal plus constructor). Output is a
//! pure function of the validated input.

use crate::command::CommandSpec;
use crate::option::{DefaultValue, OptionKind, OptionSpec};
use crate::tree::{CommandNode, SubcommandGroup};

/// Maximum width of one `Valid input is` segment.
pub const ENUM_WRAP_WIDTH: usize = 50;

/// Base class and rule record of the runtime.
const BASE_CLASS: &str = "CFGArg";

const ENUM_PREFIX: &str = "Valid input is \"";

/// Declaration and definition text of one top-level command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Class declarations, for the header.
    pub declaration: String,
    /// Help literals and constructors, for the source file.
    pub definition: String,
}

/// Renders a single command or a group.
pub fn render(node: &CommandNode) -> Rendered {
    match node {
        CommandNode::Single(spec) => render_command(spec),
        CommandNode::Group(group) => render_group(group),
    }
}

/// Generated class name for a command, e.g. `CFGArg_FPGA_STATUS`.
pub fn class_name(command: &str) -> String {
    format!("{BASE_CLASS}_{}", command.to_uppercase())
}

/// Renders one command.
///
/// # Examples
///
/// ```
/// use argspec_core::{Arity, CommandSpec, RawOption, render_command};
///
/// let mut command = CommandSpec::new("list_cable", vec!["List cables".into()], Arity::default(), false).unwrap();
/// command.add_raw_option(RawOption::new("verbose", "flag", "Show more")).unwrap();
/// let rendered = render_command(&command);
/// assert!(rendered.declaration.starts_with("class CFGArg_LIST_CABLE : public CFGArg\n"));
/// assert!(rendered.declaration.contains("    bool verbose = false;\n"));
/// assert!(rendered.definition.contains("CFGArg_RULE(\"verbose\", char(0), \"flag\""));
/// ```
pub fn render_command(spec: &CommandSpec) -> Rendered {
    let class = class_name(spec.name());

    let mut declaration = class_head(&class);
    for option in spec.options() {
        declaration.push_str(&format!("    {}\n", field_declaration(option)));
    }
    declaration.push_str("};\n\n");

    let mut definition = help_literal(&format!("{class}_HELP"), &command_help(spec));
    definition.push_str(&format!("{class}::{class}() :\n"));
    definition.push_str(&format!(
        "  {BASE_CLASS}(\"{}\", {}, {}, {}, {{",
        spec.name(),
        spec.hidden(),
        spec.arity().min,
        spec.arity().max_bound()
    ));

    let rules = spec.arrange();
    if rules.is_empty() {
        definition.push_str("},\n");
    } else {
        definition.push('\n');
        for (i, option) in rules.iter().enumerate() {
            definition.push_str(&format!("    {}", rule(option)));
            definition.push_str(if i + 1 < rules.len() { ",\n" } else { "},\n" });
        }
    }
    definition.push_str(&format!("    {class}_HELP)\n"));
    definition.push_str("{\n}\n\n");

    Rendered {
        declaration,
        definition,
    }
}

/// Renders a group: every member class, then the dispatcher class.
pub fn render_group(group: &SubcommandGroup) -> Rendered {
    let mut rendered = Rendered::default();
    for member in group.members() {
        let part = render_command(&member.spec);
        rendered.declaration.push_str(&part.declaration);
        rendered.definition.push_str(&part.definition);
    }

    let class = class_name(group.name());

    rendered.declaration.push_str(&class_head(&class));
    for member in group.members() {
        rendered.declaration.push_str(&format!(
            "    {} {};\n",
            class_name(member.spec.name()),
            member.name
        ));
    }
    rendered
        .declaration
        .push_str("    std::map<std::string, CFGArg*> m_sub_arg_map;\n");
    rendered.declaration.push_str("};\n\n");

    rendered.definition.push_str(&help_literal(
        &format!("{class}_HELP"),
        &group.help_lines(false),
    ));
    rendered.definition.push_str(&help_literal(
        &format!("{class}_HIDDEN_HELP"),
        &group.help_lines(true),
    ));
    rendered
        .definition
        .push_str(&format!("{class}::{class}() :\n"));
    rendered.definition.push_str(&format!(
        "  {BASE_CLASS}(\"{}\", false, {class}_HELP, {class}_HIDDEN_HELP)\n",
        group.name()
    ));
    rendered.definition.push_str("{\n");
    for member in group.members() {
        rendered.definition.push_str(&format!(
            "  m_sub_arg_map[\"{0}\"] = &{0};\n",
            member.name
        ));
    }
    rendered.definition.push_str("}\n\n");

    rendered
}

/// Help text of a command as shown by the runtime.
///
/// Lists the command help, then, when at least one option is visible, the
/// marker legend and a usage table padded to the command's widest token.
pub fn command_help(spec: &CommandSpec) -> Vec<String> {
    let mut lines = spec.help().to_vec();
    if spec.visible_option_count() == 0 {
        return lines;
    }

    let width = spec.longest_token();
    let pad = " ".repeat(width);

    lines.push(String::new());
    lines.push("  Explanation:".to_string());
    lines.push("    <> : option/argument is required".to_string());
    lines.push("    {} : option/argument is optional".to_string());
    lines.push("    s  : option can be specified more than once".to_string());
    lines.push(String::new());
    lines.push("  Usage:".to_string());

    for option in spec.options().iter().filter(|option| !option.hidden) {
        let (first, rest) = option
            .help
            .split_first()
            .map_or(("", &[][..]), |(first, rest)| (first.as_str(), rest));
        lines.push(format!("    {:<width$} : {first}", option.describe()));
        for line in rest {
            lines.push(format!("    {pad}   {line}"));
        }
        if option.kind == OptionKind::Enum {
            let segments = wrap_variants(&option.variants, ENUM_WRAP_WIDTH);
            let indent = " ".repeat(ENUM_PREFIX.len());
            let last = segments.len().saturating_sub(1);
            for (i, segment) in segments.iter().enumerate() {
                let lead = if i == 0 { ENUM_PREFIX } else { indent.as_str() };
                let close = if i == last { "\"" } else { "" };
                lines.push(format!("    {pad}   {lead}{segment}{close}"));
            }
        }
    }

    lines.push(String::new());
    lines.push("  Note: Use --help=option to show more detail of the option".to_string());
    lines
}

/// Splits `|`-joined enum members into segments of at most `width`
/// characters.
///
/// Every segment but the last keeps its trailing `|`, so concatenating the
/// segments restores `variants.join("|")`. A single member longer than
/// `width` gets a segment of its own.
///
/// # Examples
///
/// ```
/// use argspec_core::wrap_variants;
///
/// let variants: Vec<String> = ["alpha", "beta", "gamma"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(wrap_variants(&variants, 12), vec!["alpha|beta|", "gamma"]);
/// assert_eq!(wrap_variants(&variants, 50), vec!["alpha|beta|gamma"]);
/// ```
pub fn wrap_variants(variants: &[String], width: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for (i, variant) in variants.iter().enumerate() {
        let last = i + 1 == variants.len();
        let piece = variant.len() + usize::from(!last);
        if !current.is_empty() && current.len() + piece > width {
            segments.push(std::mem::take(&mut current));
        }
        current.push_str(variant);
        if !last {
            current.push('|');
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

fn class_head(class: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("class {class} : public {BASE_CLASS}\n"));
    out.push_str("{\n");
    out.push_str("public:\n");
    out.push_str(&format!("    {class}();\n"));
    out.push_str(
        "    bool parse(int argc, const char **argv, std::vector<std::string>* errors = nullptr) {\n",
    );
    out.push_str("            return CFGArg::parse(argc, argv, errors); }\n");
    out.push_str("    void print() { CFGArg::print(); }\n");
    out
}

fn help_literal(constant: &str, lines: &[String]) -> String {
    let mut out = format!("const char * {constant} = R\"\"\"\"(\n");
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(")\"\"\"\";\n\n");
    out
}

fn field_declaration(option: &OptionSpec) -> String {
    let ty = match (option.kind, option.multiple) {
        (OptionKind::Flag, _) => "bool",
        (OptionKind::Int, false) => "uint64_t",
        (OptionKind::Int, true) => "std::vector<uint64_t>",
        (OptionKind::Str | OptionKind::Enum, false) => "std::string",
        (OptionKind::Str | OptionKind::Enum, true) => "std::vector<std::string>",
    };
    let value = match &option.default {
        DefaultValue::Bool(b) => b.to_string(),
        DefaultValue::Int(n) => n.to_string(),
        DefaultValue::Str(s) => cpp_string(s),
        DefaultValue::Unset => String::new(),
    };
    if option.multiple || option.default == DefaultValue::Unset {
        format!("{ty} {} = {{{value}}};", option.name)
    } else {
        format!("{ty} {} = {value};", option.name)
    }
}

fn rule(option: &OptionSpec) -> String {
    let short = option
        .short
        .map_or_else(|| "char(0)".to_string(), |c| format!("'{c}'"));
    format!(
        "{BASE_CLASS}_RULE({}, {short}, \"{}\", {}, {}, {}, &{}, {}, {})",
        cpp_string(&option.name),
        option.kind.tag(),
        option.optional,
        option.multiple,
        option.hidden,
        option.name,
        string_list(&option.help),
        string_list(&option.variants)
    )
}

fn string_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| cpp_string(item)).collect();
    format!("{{{}}}", quoted.join(", "))
}

fn cpp_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
