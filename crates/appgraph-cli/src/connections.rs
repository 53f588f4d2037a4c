use anyhow::{Context, Result};
use appgraph_core::{
    partition_resources, read_resource_list, AppGraphConfig, AppGraphError, GenericResource,
    HyperlinkMode, OutputFormat,
};
use appgraph_graph::{compute, display_with, DisplayOptions};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Path that selects standard input instead of a file.
const STDIN_PATH: &str = "-";

#[derive(Args, Debug)]
pub struct ConnectionsArgs {
    /// Application name
    #[arg(short, long)]
    pub application: String,

    /// JSON list of the resources scoped to the application ("-" for stdin)
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "resources",
        required_unless_present = "resources"
    )]
    pub application_resources: Option<PathBuf>,

    /// JSON list of the resources scoped to the application's environment
    #[arg(long, value_name = "FILE", conflicts_with = "resources")]
    pub environment_resources: Option<PathBuf>,

    /// Environment name, used to split a combined --resources listing
    #[arg(short, long, requires = "resources")]
    pub environment: Option<String>,

    /// Combined JSON list of resources, split by their application and environment
    #[arg(long, value_name = "FILE", requires = "environment")]
    pub resources: Option<PathBuf>,

    /// Terminal hyperlinks for cloud console links (auto, always, never)
    #[arg(long)]
    pub hyperlinks: Option<HyperlinkMode>,
}

/// Build the application graph and render it in the configured output format.
pub fn execute(args: &ConnectionsArgs, config: &AppGraphConfig, is_terminal: bool) -> Result<String> {
    let (application_resources, environment_resources) = load_inputs(args)?;
    info!(
        application = %args.application,
        application_resources = application_resources.len(),
        environment_resources = environment_resources.len(),
        "computing application graph"
    );

    let graph = compute(&args.application, &application_resources, &environment_resources);

    match config.display.output {
        OutputFormat::Text => {
            let mode = args.hyperlinks.unwrap_or(config.display.hyperlinks);
            let options = DisplayOptions {
                hyperlinks: mode.enabled(is_terminal),
            };
            Ok(display_with(&graph, &options))
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&graph)
                .context("Failed to serialize application graph")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn load_inputs(args: &ConnectionsArgs) -> Result<(Vec<GenericResource>, Vec<GenericResource>)> {
    match (&args.resources, &args.environment, &args.application_resources) {
        (Some(path), Some(environment), _) => {
            let resources = read_list(path)?;
            Ok(partition_resources(&resources, &args.application, environment))
        }
        (None, _, Some(path)) => {
            if is_stdin(path) && args.environment_resources.as_deref().is_some_and(is_stdin) {
                return Err(AppGraphError::InvalidInput(
                    "--application-resources and --environment-resources cannot both read from standard input"
                        .to_string(),
                )
                .into());
            }
            let application = read_list(path)?;
            let environment = match &args.environment_resources {
                Some(path) => read_list(path)?,
                None => Vec::new(),
            };
            Ok((application, environment))
        }
        _ => Err(AppGraphError::InvalidInput(
            "either --application-resources or --resources with --environment is required"
                .to_string(),
        )
        .into()),
    }
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new(STDIN_PATH)
}

fn read_list(path: &Path) -> Result<Vec<GenericResource>> {
    if is_stdin(path) {
        return read_resource_list(std::io::stdin().lock())
            .context("Failed to read resources from standard input");
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open resource list {}", path.display()))?;
    read_resource_list(BufReader::new(file))
        .with_context(|| format!("Failed to read resource list {}", path.display()))
}
