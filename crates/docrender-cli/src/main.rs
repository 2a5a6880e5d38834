//! Main entry point for the docrender CLI

use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;
use clap_verbosity_flag::LevelFilter;
use color_eyre::eyre::{eyre, Result};
use docrender_cli::cli::Args;
use docrender_common::logging::{self, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle shell completions first (must be before argument parsing)
    CompleteEnv::with_factory(Args::command).complete();

    let args = Args::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    match args.verbosity.log_level_filter() {
        LevelFilter::Off | LevelFilter::Error => {}
        _ => {
            std::env::set_var("RUST_LIB_BACKTRACE", "1");
        }
    }

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logging::init_cli_logging(
        &args.verbosity,
        "docrender=info,docrender_cli=info,docrender_sdk=info",
        format,
    )
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await?)
}
