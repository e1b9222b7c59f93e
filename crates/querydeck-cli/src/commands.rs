//! Command handlers. Each returns the text to print on stdout.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use querydeck::{Panel, ProcessorRegistry, QueryDefinition, VariableType, ViewDefinition};
use tracing::{debug, warn};

use crate::cli::{BindingArgs, Cli, Command, DefinitionArgs, RunArgs};
use crate::fixtures::FixtureExecutor;
use crate::output::{self, OutputFormat};

pub async fn dispatch(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Vars(args) => vars(args, cli.output),
        Command::Render(args) => render(args),
        Command::Run(args) => run(args, cli.output).await,
        Command::Views => views(cli.output),
    }
}

fn load(args: &DefinitionArgs) -> Result<QueryDefinition> {
    let mut definition = QueryDefinition::from_path(&args.definition)?;
    definition.sync_variables();
    debug!(
        id = %definition.id,
        variables = definition.variables.len(),
        "loaded definition"
    );
    Ok(definition)
}

/// Loads the definition and applies `--type` then `--var` overrides.
fn load_bound(args: &BindingArgs) -> Result<QueryDefinition> {
    let mut definition = load(&args.definition)?;

    for (name, ty) in &args.types {
        let var_type = VariableType::from(ty.as_str());
        if !var_type.is_known() {
            warn!(variable = %name, var_type = %ty, "unknown type, value will be quoted");
        }
        match definition.variables.iter_mut().find(|v| &v.name == name) {
            Some(variable) => variable.var_type = var_type,
            None => warn!(variable = %name, "template has no such variable"),
        }
    }
    for (name, value) in &args.vars {
        if !definition.set_value(name, value.as_str()) {
            warn!(variable = %name, "template has no such variable");
        }
    }
    Ok(definition)
}

pub fn vars(args: &DefinitionArgs, format: OutputFormat) -> Result<String> {
    let definition = load(args)?;
    Ok(output::serialize(&definition.variables, format)?)
}

pub fn render(args: &BindingArgs) -> Result<String> {
    let definition = load_bound(args)?;
    let request = definition.to_request();

    for name in request.unresolved() {
        warn!(placeholder = %name, "placeholder left unresolved");
    }
    Ok(request.final_query() + "\n")
}

pub async fn run(args: &RunArgs, format: OutputFormat) -> Result<String> {
    let definition = load_bound(&args.bindings)?;
    definition.validate()?;
    let request = definition.to_request();
    request.validate()?;

    let executor = FixtureExecutor::from_path(&args.fixtures)?;
    let view = args.view.as_deref().unwrap_or(&definition.view);
    let panel = Panel::new(
        Arc::new(executor),
        Arc::new(ProcessorRegistry::with_builtins()),
    );

    let state = panel
        .refresh(&request, view, definition.view_config.clone())
        .await
        .completed()
        .ok_or_else(|| anyhow!("refresh was superseded"))?;

    if let Some(error) = state.error() {
        bail!(error);
    }
    let data = state
        .data()
        .with_context(|| format!("view '{view}' produced no data"))?;
    Ok(output::serialize(data, format)?)
}

pub fn views(format: OutputFormat) -> Result<String> {
    let registry = ProcessorRegistry::with_builtins();
    let definitions: Vec<&ViewDefinition> = registry.definitions().collect();
    Ok(output::serialize(&definitions, format)?)
}
