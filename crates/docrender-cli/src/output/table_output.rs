//! Table formatting for CLI output

use chrono::{DateTime, Local, Utc};
use docrender_sdk::{Job, Resource, Service};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// A service together with what hangs off it
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOverview {
    pub service: Service,
    pub resources: Vec<Resource>,
    pub jobs: Vec<Job>,
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Display services in table format
pub fn display_services(overviews: &[ServiceOverview]) {
    #[derive(Tabled)]
    struct ServiceRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Shape")]
        shape: String,
        #[tabled(rename = "Active")]
        active: String,
        #[tabled(rename = "Resources")]
        resources: usize,
        #[tabled(rename = "Jobs")]
        jobs: usize,
        #[tabled(rename = "Modified")]
        modified: String,
    }

    let rows: Vec<ServiceRow> = overviews
        .iter()
        .map(|overview| ServiceRow {
            id: overview.service.id.clone(),
            shape: overview.service.shape.clone(),
            active: if overview.service.active { "yes" } else { "no" }.to_string(),
            resources: overview.resources.len(),
            jobs: overview.jobs.len(),
            modified: format_timestamp(overview.service.timestamps.modified),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");
}

/// Display the resources and jobs of each service
pub fn display_service_details(overviews: &[ServiceOverview]) {
    #[derive(Tabled)]
    struct DetailRow {
        #[tabled(rename = "Service")]
        service: String,
        #[tabled(rename = "Kind")]
        kind: &'static str,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Detail")]
        detail: String,
    }

    let rows: Vec<DetailRow> = overviews
        .iter()
        .flat_map(|overview| {
            let service = overview.service.id.clone();
            let resources = overview.resources.iter().map({
                let service = service.clone();
                move |resource| DetailRow {
                    service: service.clone(),
                    kind: "resource",
                    id: resource.id.clone(),
                    name: resource.name.clone(),
                    detail: format!(
                        "{} ({} bytes)",
                        resource.content_type, resource.content_length
                    ),
                }
            });
            let jobs = overview.jobs.iter().map(move |job| DetailRow {
                service: service.clone(),
                kind: "job",
                id: job.id.clone(),
                name: job.output.name.clone(),
                detail: job.status.clone(),
            });
            resources.chain(jobs).collect::<Vec<_>>()
        })
        .collect();

    if rows.is_empty() {
        return;
    }

    let mut table = Table::new(rows);
    table.with(Style::modern());
    println!("{table}");
}
