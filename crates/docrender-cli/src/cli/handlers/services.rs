//! Service inspection commands

use crate::config::CliConfig;
use crate::error::Result;
use crate::output::table_output::{self, ServiceOverview};
use crate::output::{json_output, print_success};
use docrender_sdk::DocumentClient;
use tracing::{debug, warn};

/// Handle the `services` command - list services with resources and jobs
pub async fn handle_services(config: &CliConfig, json: bool) -> Result<()> {
    let client = config.client()?;
    let result = collect_overviews(&client).await;
    release(&client).await;
    let overviews = result?;

    if json {
        json_output(&overviews)?;
    } else if overviews.is_empty() {
        println!("No services found.");
    } else {
        table_output::display_services(&overviews);
        table_output::display_service_details(&overviews);
        println!("\nTotal: {} services", overviews.len());
    }

    Ok(())
}

/// Handle the `delete-service` command
pub async fn handle_delete_service(config: &CliConfig, id: &str) -> Result<()> {
    let client = config.client()?;
    let result = async {
        client.authenticate().await?;
        client.delete_service(id).await
    }
    .await;
    release(&client).await;
    result?;

    print_success(&format!("Deleted service: {id}"));
    Ok(())
}

async fn collect_overviews(
    client: &DocumentClient,
) -> docrender_sdk::Result<Vec<ServiceOverview>> {
    client.authenticate().await?;

    let services = client.list_services().await?;
    let mut overviews = Vec::with_capacity(services.len());
    for service in services {
        debug!("Fetching resources and jobs of service {}", service.id);
        let resources = client.list_resources(&service.id).await?;
        let jobs = client.list_jobs(&service.id).await?;
        overviews.push(ServiceOverview {
            service,
            resources,
            jobs,
        });
    }

    Ok(overviews)
}

async fn release(client: &DocumentClient) {
    if !client.release().await {
        warn!("Session release failed");
    }
}
