//! Upload workflow: make the remote service match the local files

use super::{
    authenticate, base_name, find_service, finish, DocumentFiles, ProgressReporter,
    StepResultExt, WorkflowError, CLEANUP_RESOURCE_NAME, DATA_CONTENT_TYPE,
    SCRIPT_CONTENT_TYPE, SHAPE_CONTENT_TYPE,
};
use crate::types::Service;
use crate::DocumentClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// What an upload changed on the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub service_id: String,
    pub shape: String,
    /// True when the service did not exist and was created
    pub created: bool,
    /// Names of files uploaded as new resources
    pub uploaded: Vec<String>,
    /// Names of resources whose bytes were replaced
    pub updated: Vec<String>,
    /// Names of resources that were deleted
    pub deleted: Vec<String>,
}

/// Ensures a service exists for the shape file and its resources are current
pub struct Reconciler {
    client: DocumentClient,
    files: DocumentFiles,
    reporter: Arc<dyn ProgressReporter>,
}

impl Reconciler {
    pub fn new(
        client: DocumentClient,
        files: DocumentFiles,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            client,
            files,
            reporter,
        }
    }

    /// Run the upload. The session is released before this returns.
    pub async fn upload(self) -> Result<UploadReport, WorkflowError> {
        let result = self.reconcile().await;
        finish(&self.client, self.reporter.as_ref(), result).await
    }

    async fn reconcile(&self) -> Result<UploadReport, WorkflowError> {
        authenticate(&self.client).await?;

        let shape_name = base_name(&self.files.shape_file);
        let mut services = self.client.list_services().await.step("List services")?;

        let mut report = UploadReport {
            shape: shape_name.clone(),
            ..Default::default()
        };

        let selected = match find_service(&services, &shape_name).cloned() {
            Some(service) => {
                self.reporter
                    .step(&format!("Service: {} is already on server", service.shape));
                service
            }
            None => {
                let service = self.publish(&shape_name, &mut report).await?;
                services.push(service.clone());
                self.reporter
                    .success(&format!("Service: {shape_name} was uploaded"));
                service
            }
        };

        for service in &services {
            self.reporter
                .step(&format!("Service: {} : {}", service.shape, service.id));
        }

        self.reconcile_resources(&selected, &mut report).await?;

        report.service_id = selected.id;
        info!(
            "Reconciled service {} (created: {}, updated: {}, deleted: {})",
            report.service_id,
            report.created,
            report.updated.len(),
            report.deleted.len()
        );
        Ok(report)
    }

    /// Create the service and upload whichever local files exist
    async fn publish(
        &self,
        shape_name: &str,
        report: &mut UploadReport,
    ) -> Result<Service, WorkflowError> {
        if !self.files.shape_file.is_file() {
            return Err(WorkflowError::MissingFile {
                path: self.files.shape_file.clone(),
            });
        }

        let created = self
            .client
            .create_service(shape_name)
            .await
            .step(format!("Failed to create service for {shape_name}"))?;
        report.created = true;
        debug!("Created service {} for {}", created.id, shape_name);

        let uploads = [
            (&self.files.shape_file, SHAPE_CONTENT_TYPE),
            (&self.files.script_file, SCRIPT_CONTENT_TYPE),
            (&self.files.data_file, DATA_CONTENT_TYPE),
        ];
        for (file, content_type) in uploads {
            if !file.is_file() {
                debug!("Skipping {}, not present locally", file.display());
                continue;
            }
            let name = base_name(file);
            self.client
                .upload_resource(&created.id, file, content_type)
                .await
                .step(format!("Failed to upload {name}"))?;
            report.uploaded.push(name);
        }

        self.client
            .get_service(&created.id)
            .await
            .step(format!("Failed to fetch service {}", created.id))
    }

    /// Refresh the data resource and drop cleanup-marker resources
    async fn reconcile_resources(
        &self,
        service: &Service,
        report: &mut UploadReport,
    ) -> Result<(), WorkflowError> {
        let data_name = base_name(&self.files.data_file);
        let resources = self
            .client
            .list_resources(&service.id)
            .await
            .step(format!("List resources of service {}", service.id))?;

        for resource in &resources {
            self.reporter.step(&format!(
                "  Service {} has resource {}",
                service.id, resource.name
            ));

            if resource.name == data_name {
                self.client
                    .update_resource(
                        &service.id,
                        &resource.id,
                        &self.files.data_file,
                        DATA_CONTENT_TYPE,
                    )
                    .await
                    .step(format!("Failed to update resource {}", resource.name))?;
                report.updated.push(resource.name.clone());
            }

            if resource.name == CLEANUP_RESOURCE_NAME {
                self.client
                    .delete_resource(&service.id, &resource.id)
                    .await
                    .step(format!("Failed to delete resource {}", resource.name))?;
                report.deleted.push(resource.name.clone());
            }
        }

        Ok(())
    }
}
