use anyhow::{bail, Context, Result};
use appgraph_core::{ConfigManager, LoggingConfig, OutputFormat};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod connections;

use connections::ConnectionsArgs;

const DEFAULT_CONFIG_FILE: &str = ".appgraph.toml";

#[derive(Parser)]
#[command(name = "appgraph")]
#[command(about = "AppGraph CLI - Resolve and display application connection graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./.appgraph.toml, then ~/.appgraph/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, global = true)]
    output: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resources of an application and how they connect
    Connections(ConnectionsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the active configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let mut manager =
        ConfigManager::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(output) = cli.output {
        manager.config_mut().display.output = output;
    }

    init_logging(&manager.config().logging, cli.verbose);

    match &cli.command {
        Commands::Connections(args) => {
            let is_terminal = atty::is(atty::Stream::Stdout);
            connections::execute(args, manager.config(), is_terminal)
        }
        Commands::Config(cmd) => execute_config_command(cmd, &manager),
    }
}

fn execute_config_command(cmd: &ConfigCommands, manager: &ConfigManager) -> Result<String> {
    match cmd {
        ConfigCommands::Show => {
            let source = match manager.config_path() {
                Some(path) => path.display().to_string(),
                None => "defaults".to_string(),
            };
            let toml = manager.to_toml().context("Failed to render configuration")?;
            Ok(format!("# source: {}\n{}", source, toml))
        }
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ConfigManager::create_default_config(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(format!("{} {}\n", "Created".green(), path.display()))
        }
    }
}

/// Logs go to stderr so the report on stdout stays byte-exact.
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    // "json" needs the tracing-subscriber json feature; compact is the closest fallback.
    let result = match logging.format.as_str() {
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
