//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Run parameterized query definitions and inspect their view data.
#[derive(Debug, Parser)]
#[command(name = "qdeck", version, about)]
pub struct Cli {
    /// Log debug events to stderr (overridden by QDECK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for structured results
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the variables a definition's template declares
    Vars(DefinitionArgs),

    /// Print the final query text with variables substituted
    Render(BindingArgs),

    /// Execute a definition against fixtures and print the view data
    Run(RunArgs),

    /// List the available view types
    Views,
}

#[derive(Debug, Args)]
pub struct DefinitionArgs {
    /// Definition file (.yaml, .yml or .json)
    pub definition: PathBuf,
}

#[derive(Debug, Args)]
pub struct BindingArgs {
    #[command(flatten)]
    pub definition: DefinitionArgs,

    /// Set a variable's value
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_key_val)]
    pub vars: Vec<(String, String)>,

    /// Set a variable's type (string, number, boolean, date)
    #[arg(long = "type", value_name = "NAME=TYPE", value_parser = parse_key_val)]
    pub types: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub bindings: BindingArgs,

    /// Executor answers keyed by data source id
    #[arg(long, value_name = "FILE")]
    pub fixtures: PathBuf,

    /// View type to process with, instead of the definition's own
    #[arg(long)]
    pub view: Option<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
