use std::fs;
use std::path::{Path, PathBuf};

use argspec_loader::{
    GeneratedArtifacts, GeneratorConfig, SchemaInputs, assemble_artifacts, write_if_changed,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "argspec-gen", version)]
#[command(about = "Generate CFGArg command-line parsers from JSON schemas")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a schema and write the header and source files.
    Generate(GenerateArgs),
    /// Validate a schema without writing anything.
    Check(InputArgs),
    /// Print one generated file to stdout.
    Print(PrintArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Primary JSON schema whose commands are generated.
    #[arg(long)]
    input: PathBuf,
    /// Auxiliary JSON schema whose command names are already taken (repeatable).
    #[arg(long = "aux")]
    auxiliary: Vec<PathBuf>,
    /// Optional YAML generator configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output header path.
    #[arg(long)]
    header: PathBuf,
    /// Output source path.
    #[arg(long)]
    source: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Part {
    Header,
    Source,
}

#[derive(Debug, Args)]
struct PrintArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Which generated file to print.
    #[arg(long, value_enum, default_value_t = Part::Header)]
    part: Part,
    /// Header name included by the source (default: <input stem>_auto.h).
    #[arg(long)]
    header_name: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Check(args) => run_check(args),
        Command::Print(args) => run_print(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let header_name = file_name(&args.header)?;
    let artifacts = compile_artifacts(&args.input, &header_name)?;

    for (path, text) in [
        (&args.header, &artifacts.header),
        (&args.source, &artifacts.source),
    ] {
        ensure_parent_dir(path)?;
        let written = write_if_changed(path, text)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
        if written {
            info!(path = %path.display(), "updated");
        }
    }

    println!(
        "Generated '{}' and '{}' from '{}'.",
        args.header.display(),
        args.source.display(),
        args.input.input.display()
    );
    Ok(())
}

fn run_check(args: InputArgs) -> Result<(), String> {
    let (inputs, _) = load_inputs(&args)?;
    let commands = inputs.compile().map_err(|e| e.to_string())?;
    println!(
        "Validated {} command(s) in '{}'.",
        commands.len(),
        args.input.display()
    );
    Ok(())
}

fn run_print(args: PrintArgs) -> Result<(), String> {
    let header_name = match args.header_name {
        Some(name) => name,
        None => default_header_name(&args.input.input)?,
    };
    let artifacts = compile_artifacts(&args.input, &header_name)?;
    match args.part {
        Part::Header => print!("{}", artifacts.header),
        Part::Source => print!("{}", artifacts.source),
    }
    Ok(())
}

/// Loads the configuration (if any) and every schema named on the command
/// line or in the configuration.
fn load_inputs(args: &InputArgs) -> Result<(SchemaInputs, GeneratorConfig), String> {
    let config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let inputs = SchemaInputs::builder(&args.input)
        .auxiliaries(config.auxiliary.iter())
        .auxiliaries(args.auxiliary.iter())
        .load()
        .map_err(|e| e.to_string())?;
    Ok((inputs, config))
}

fn compile_artifacts(args: &InputArgs, header_name: &str) -> Result<GeneratedArtifacts, String> {
    let (inputs, config) = load_inputs(args)?;
    let commands = inputs.compile().map_err(|e| e.to_string())?;
    Ok(assemble_artifacts(
        inputs.input_name(),
        header_name,
        &commands,
        &config,
    ))
}

fn file_name(path: &Path) -> Result<String, String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| format!("'{}' has no file name", path.display()))
}

fn default_header_name(input: &Path) -> Result<String, String> {
    let name = file_name(input)?;
    let stem = name.split('.').next().unwrap_or_default();
    Ok(format!("{stem}_auto.h"))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::{Cli, Command, Part, default_header_name, file_name};

    #[test]
    fn test_default_header_name_uses_stem() {
        assert_eq!(
            default_header_name(Path::new("dir/cfg_args.json")).unwrap(),
            "cfg_args_auto.h"
        );
    }

    #[test]
    fn test_file_name_requires_a_name() {
        assert_eq!(file_name(Path::new("out/x.h")).unwrap(), "x.h");
        assert!(file_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_generate_collects_repeated_aux() {
        let cli = Cli::try_parse_from([
            "argspec-gen",
            "-vv",
            "generate",
            "--input",
            "a.json",
            "--header",
            "a.h",
            "--source",
            "a.cpp",
            "--aux",
            "b.json",
            "--aux",
            "c.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.input.auxiliary.len(), 2);
        assert!(args.input.config.is_none());
    }

    #[test]
    fn test_print_defaults_to_header() {
        let cli = Cli::try_parse_from(["argspec-gen", "print", "--input", "a.json"]).unwrap();
        let Command::Print(args) = cli.command else {
            panic!("expected print");
        };
        assert!(matches!(args.part, Part::Header));
        assert!(args.header_name.is_none());
    }
}
