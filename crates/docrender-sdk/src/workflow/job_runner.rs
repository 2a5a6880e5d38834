//! Run workflow: submit the data file, wait for the render, fetch the result
//!
//! A run always starts from zero outstanding jobs for the service. The job
//! status is polled under a fixed budget; between reads the cancellation
//! token is checked, so an operator can stop waiting without the in-flight
//! request being cut off.

use super::{
    authenticate, base_name, find_service, finish, DocumentFiles, PollPolicy, ProgressReporter,
    StepResultExt, WorkflowError, DATA_CONTENT_TYPE, RESULT_CONTENT_TYPE,
};
use crate::types::JobStatus;
use crate::DocumentClient;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub service_id: String,
    pub job_id: String,
    /// Stale jobs deleted before the new one was created
    pub removed_jobs: usize,
    /// Status reads until the job finished
    pub polls: u32,
    pub output: PathBuf,
    pub output_bytes: u64,
}

/// Renders the local data file through an existing service
pub struct JobRunner {
    client: DocumentClient,
    files: DocumentFiles,
    policy: PollPolicy,
    reporter: Arc<dyn ProgressReporter>,
}

impl JobRunner {
    pub fn new(
        client: DocumentClient,
        files: DocumentFiles,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            client,
            files,
            policy: PollPolicy::default(),
            reporter,
        }
    }

    /// Override the polling interval and budget
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the job. The session is released before this returns.
    pub async fn run(self, cancel: CancellationToken) -> Result<RunReport, WorkflowError> {
        let result = self.execute(&cancel).await;
        finish(&self.client, self.reporter.as_ref(), result).await
    }

    async fn execute(&self, cancel: &CancellationToken) -> Result<RunReport, WorkflowError> {
        authenticate(&self.client).await?;

        let shape_name = base_name(&self.files.shape_file);
        let result_name = base_name(&self.files.result_file);

        let services = self.client.list_services().await.step("List services")?;
        let service_id = find_service(&services, &shape_name)
            .map(|service| service.id.clone())
            .ok_or_else(|| WorkflowError::NotFound {
                shape: shape_name.clone(),
            })?;

        let removed_jobs = self.clear_jobs(&service_id).await?;

        let job_id = self
            .client
            .create_job(&service_id, &result_name, RESULT_CONTENT_TYPE)
            .await
            .step(format!("Failed to create job on service {service_id}"))?
            .id;
        self.reporter.step(&format!("Created job {job_id}"));

        self.reporter
            .step(&format!("Sending {}", self.files.data_file.display()));
        self.client
            .submit_job_input(&service_id, &job_id, &self.files.data_file, DATA_CONTENT_TYPE)
            .await
            .step(format!("Failed to send input for job {job_id}"))?;

        let polls = self.wait_for_completion(&service_id, &job_id, cancel).await?;

        let output_bytes = self.download_output(&service_id, &job_id).await?;
        self.reporter.success(&format!(
            "Downloaded: {}",
            self.files.result_file.display()
        ));

        self.client
            .delete_job(&service_id, &job_id)
            .await
            .step(format!("Failed to delete job {job_id}"))?;
        self.reporter.step(&format!("Deleted job: {job_id}"));

        info!(
            "Job {} on service {} rendered {} bytes after {} polls",
            job_id, service_id, output_bytes, polls
        );

        Ok(RunReport {
            service_id,
            job_id,
            removed_jobs,
            polls,
            output: self.files.result_file.clone(),
            output_bytes,
        })
    }

    /// Stream the job output next to the result file and move it into place
    /// once complete; on failure the previous result stays untouched
    async fn download_output(
        &self,
        service_id: &str,
        job_id: &str,
    ) -> Result<u64, WorkflowError> {
        let result_file = &self.files.result_file;
        let dir = match result_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Removed on drop unless persisted
        let staging = tempfile::Builder::new()
            .prefix(".docrender-")
            .suffix(".part")
            .tempfile_in(dir)?
            .into_temp_path();

        let mut output = tokio::fs::File::create(&staging).await?;
        let written = self
            .client
            .fetch_job_output(service_id, job_id, &mut output)
            .await
            .step(format!("Failed to download output of job {job_id}"))?;
        drop(output);

        staging
            .persist(result_file)
            .map_err(|e| WorkflowError::Io(e.error))?;

        Ok(written)
    }

    /// Delete every existing job of the service
    async fn clear_jobs(&self, service_id: &str) -> Result<usize, WorkflowError> {
        let jobs = self
            .client
            .list_jobs(service_id)
            .await
            .step(format!("List jobs of service {service_id}"))?;

        for job in &jobs {
            debug!("Deleting stale job {} ({})", job.id, job.status);
            self.client
                .delete_job(service_id, &job.id)
                .await
                .step(format!("Failed to delete job {}", job.id))?;
        }

        Ok(jobs.len())
    }

    /// Poll until the job finishes; returns the number of status reads
    async fn wait_for_completion(
        &self,
        service_id: &str,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<u32, WorkflowError> {
        let mut attempts = 0u32;

        loop {
            let job = self
                .client
                .read_job(service_id, job_id)
                .await
                .step(format!("Failed to read job {job_id}"))?;
            attempts += 1;

            match job.state() {
                JobStatus::Finished => return Ok(attempts),
                JobStatus::Canceled => {
                    return Err(WorkflowError::RemoteCanceled {
                        job_id: job_id.to_string(),
                    })
                }
                JobStatus::InProgress(status) => {
                    if cancel.is_cancelled() {
                        return Err(WorkflowError::LocalCanceled {
                            job_id: job_id.to_string(),
                        });
                    }
                    if attempts >= self.policy.max_attempts {
                        return Err(WorkflowError::GaveUp {
                            service_id: service_id.to_string(),
                            job_id: job_id.to_string(),
                            attempts,
                        });
                    }

                    debug!("Job {} is {}, attempt {}", job_id, status, attempts);
                    self.reporter.step("Waiting");
                    tokio::time::sleep(self.policy.interval).await;
                }
            }
        }
    }
}
