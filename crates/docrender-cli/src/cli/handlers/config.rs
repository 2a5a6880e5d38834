//! Configuration commands

use crate::cli::ConfigAction;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{compress_path, json_output, print_success};
use std::path::Path;

/// Handle `config show|get|set`
pub async fn handle_config(action: ConfigAction, config_path: &Path, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = CliConfig::load(config_path)?;
            let map = config.to_map();

            if json {
                json_output(&map)?;
            } else {
                println!("Configuration ({}):", compress_path(config_path));
                for (key, value) in &map {
                    println!("  {key} = {value}");
                }
            }
        }
        ConfigAction::Get { key } => {
            let config = CliConfig::load(config_path)?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = CliConfig::load_file(config_path)?;
            config.set(&key, &value)?;
            config.save_to_path(config_path).await?;
            print_success(&format!("Set {key} in {}", compress_path(config_path)));
        }
    }

    Ok(())
}
