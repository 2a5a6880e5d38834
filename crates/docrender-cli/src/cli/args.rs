use crate::cli::{commands::Commands, handlers};
use crate::config::{expand_path, CliConfig};
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::PathBuf;

/// docrender - publish document templates and render documents
#[derive(Parser, Debug)]
#[command(
    name = "docrender",
    author = "Docrender Team",
    version,
    about = "docrender - publish document templates and render documents",
    long_about = "Command-line client for the document rendering API.

QUICK START:
  docrender config set username <name>   # Store credentials
  docrender config set password <secret>
  docrender upload                       # Publish shape, script and data
  docrender run                          # Render and download the result

INSPECTION:
  docrender info                         # Server name and version
  docrender services                     # Services, resources and jobs
  docrender delete-service <id>          # Remove a service

CONFIGURATION:
  docrender config show                  # Show configuration
  DOCRENDER_API__PASSWORD=...            # Override any key from the environment"
)]
pub struct Args {
    /// Configuration file path [default: ~/.config/docrender/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Resolve the config file path, expanding a leading tilde
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(expand_path(path)),
            None => CliConfig::default_path(),
        }
    }

    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config_path = self.config_path()?;
        let load = || CliConfig::load(&config_path);

        match self.command {
            Commands::Info => handlers::info::handle_info(&load()?, self.json).await,
            Commands::Upload => handlers::upload::handle_upload(&load()?, self.json).await,
            Commands::Run => handlers::run::handle_run(&load()?, self.json).await,
            Commands::Services => handlers::services::handle_services(&load()?, self.json).await,
            Commands::DeleteService { id } => {
                handlers::services::handle_delete_service(&load()?, &id).await
            }
            Commands::Config { action } => {
                handlers::config::handle_config(action, &config_path, self.json).await
            }
        }
    }
}
