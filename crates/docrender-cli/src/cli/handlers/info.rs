//! Server info command

use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{json_output, print_info};
use tracing::{debug, warn};

/// Handle the `info` command - authenticate and show server identity
pub async fn handle_info(config: &CliConfig, json: bool) -> Result<()> {
    let client = config.client()?;
    debug!("Querying server info at {}", client.base_url());

    let result = async {
        client.authenticate().await?;
        client.info().await
    }
    .await;

    if !client.release().await {
        warn!("Session release failed");
    }
    let info = result?;

    if json {
        json_output(&info)?;
    } else {
        print_info(&format!("Server: {} {}", info.name, info.version));
        println!("  URL:  {}", client.base_url());
        println!("  User: {}", client.session().username());
    }

    Ok(())
}
