use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tool_schema_core::{
    FieldDefinition, FieldRegistry, OverrideMap, ValidateOptions, compile_merged, merge_fields,
    validate_fields,
};
use tool_schema_extract::{Node, extract_fields};
use tool_schema_host::{EngineConfig, MemorySink, ToolDefinition, ToolDescriptor, ToolScope};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "tool-schema")]
#[command(version)]
#[command(about = "Extract, merge, and compile tool input schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the fields found in a UI tree.
    Extract(ExtractArgs),
    /// Merge fields with overrides and print the compiled schema.
    Compile(CompileArgs),
    /// Check a field list for consistency issues.
    Validate(ValidateArgs),
    /// Run the full pipeline for one tool and print its registration.
    Build(BuildArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// UI tree JSON file (`-` for stdin).
    #[arg(long)]
    tree: PathBuf,
}

#[derive(Debug, Args)]
struct CompileArgs {
    /// Field list JSON file (`-` for stdin).
    #[arg(long)]
    fields: PathBuf,
    /// Override map JSON file keyed by field name.
    #[arg(long)]
    overrides: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Field list JSON file (`-` for stdin).
    #[arg(long)]
    fields: PathBuf,
    /// Fail on the first issue.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// UI tree JSON file (`-` for stdin).
    #[arg(long)]
    tree: PathBuf,
    /// Override map JSON file keyed by field name.
    #[arg(long)]
    overrides: Option<PathBuf>,
    /// JSON list of dynamically registered fields.
    #[arg(long)]
    registered: Option<PathBuf>,
    /// Engine configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tool name.
    #[arg(long, default_value = "tool")]
    name: String,
    /// Tool description.
    #[arg(long, default_value = "")]
    description: String,
}

fn main() {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Extract(args) => run_extract(args),
        Command::Compile(args) => run_compile(args),
        Command::Validate(args) => run_validate(args),
        Command::Build(args) => run_build(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_extract(args: ExtractArgs) -> Result<(), String> {
    let tree: Node = read_json(&args.tree)?;
    let fields = extract_fields(&tree);
    print_json(&fields)
}

fn run_compile(args: CompileArgs) -> Result<(), String> {
    let fields: Vec<FieldDefinition> = read_json(&args.fields)?;
    let overrides = read_overrides(args.overrides.as_deref())?;

    let merged = merge_fields(&fields, &overrides, &FieldRegistry::new());
    debug!(fields = merged.len(), "Merged fields");
    println!("{}", compile_merged(&merged).to_json_string_pretty());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let fields: Vec<FieldDefinition> = read_json(&args.fields)?;
    let options = ValidateOptions {
        dev_mode: true,
        strict: args.strict,
    };

    let issues = validate_fields(&fields, &options).map_err(|err| err.to_string())?;
    for issue in &issues {
        println!("{issue}");
    }
    println!(
        "Validated {} field(s): {} issue(s).",
        fields.len(),
        issues.len()
    );
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let tree: Node = read_json(&args.tree)?;
    let overrides = read_overrides(args.overrides.as_deref())?;
    let registered: Vec<FieldDefinition> = match &args.registered {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => EngineConfig::default(),
    };

    let definition = ToolDefinition::new(args.name.clone(), args.description, |_| {
        Err("tool-schema build does not execute tools".to_string())
    });
    let mut scope = ToolScope::builder(definition)
        .config(config)
        .overrides(overrides)
        .build();

    let mut fields = scope.field_scope();
    for field in registered {
        fields.register(field);
    }

    let mut sink = MemorySink::new();
    let tree_fields = extract_fields(&tree);
    let tool = scope
        .publish(&tree_fields, &mut sink)
        .map_err(|err| err.to_string())?;
    let registration = sink
        .get(&args.name)
        .ok_or_else(|| format!("Tool '{}' was not registered", args.name))?;

    let output = BuildOutput {
        descriptor: registration.descriptor(),
        schema_checksum: &tool.checksum,
        issues: tool.issues.iter().map(ToString::to_string).collect(),
    };
    print_json(&output)
}

/// Registration descriptor plus build diagnostics, in descriptor key order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput<'a> {
    #[serde(flatten)]
    descriptor: ToolDescriptor<'a>,
    schema_checksum: &'a str,
    issues: Vec<String>,
}

fn read_overrides(path: Option<&Path>) -> Result<OverrideMap, String> {
    match path {
        Some(path) => read_json(path),
        None => Ok(OverrideMap::new()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        raw
    } else {
        fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?
    };
    serde_json::from_str(&raw).map_err(|err| format!("Invalid JSON in '{}': {err}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|err| format!("Failed to serialize output: {err}"))?;
    println!("{raw}");
    Ok(())
}
