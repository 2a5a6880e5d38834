//! Operator workflows built on [`DocumentClient`]
//!
//! - [`Reconciler`]: make the remote service and its resources match the
//!   local shape, script and data files
//! - [`JobRunner`]: render the data file through the service and download
//!   the result
//!
//! Both take ownership of a fresh client, run their remote calls strictly in
//! sequence, report progress through a [`ProgressReporter`], and release the
//! session before returning whatever the outcome.

pub mod job_runner;
pub mod reconcile;
pub mod reporter;

pub use job_runner::{JobRunner, RunReport};
pub use reconcile::{Reconciler, UploadReport};
pub use reporter::{ProgressReporter, TracingReporter};

use crate::error::ApiError;
use crate::types::Service;
use crate::DocumentClient;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

/// Content type of the shape (template) file
pub const SHAPE_CONTENT_TYPE: &str = "application/vnd.ws-doc";
/// Content type of the script file
pub const SCRIPT_CONTENT_TYPE: &str = "text/javascript";
/// Content type of the data file, both as resource and as job input
pub const DATA_CONTENT_TYPE: &str = "text/xml";
/// Content type requested for rendered output
pub const RESULT_CONTENT_TYPE: &str = "application/pdf";
/// Resources with exactly this name are deleted during reconciliation
pub const CLEANUP_RESOURCE_NAME: &str = "test.xml";

/// Delay between job status reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Status reads before a run gives up
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 100;

/// Local files that make up one document definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFiles {
    pub shape_file: PathBuf,
    pub script_file: PathBuf,
    pub data_file: PathBuf,
    pub result_file: PathBuf,
}

/// Job polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Why a workflow stopped early
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Login was rejected or the token response was unusable
    #[error("{message}")]
    AuthFailed { message: String },

    /// A remote call answered with a failure
    #[error("{context}: {source}")]
    RequestFailed {
        context: String,
        #[source]
        source: ApiError,
    },

    /// No remote service matches the local shape file
    #[error("No service found for shape {shape}")]
    NotFound { shape: String },

    /// A required local file is absent
    #[error("{} does not exist", path.display())]
    MissingFile { path: PathBuf },

    /// Reading or writing a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The job never reached a terminal state within the polling budget
    #[error("Giving up on service/job {service_id}/{job_id} after {attempts} attempts")]
    GaveUp {
        service_id: String,
        job_id: String,
        attempts: u32,
    },

    /// The server reported the job as canceled
    #[error("Canceled: {job_id}")]
    RemoteCanceled { job_id: String },

    /// The operator asked the run to stop
    #[error("Run of job {job_id} canceled")]
    LocalCanceled { job_id: String },
}

impl WorkflowError {
    /// Attach context to a failed client call
    pub(crate) fn request(context: impl Into<String>, error: ApiError) -> Self {
        match error {
            ApiError::Authentication { message } => WorkflowError::AuthFailed { message },
            ApiError::Io(e) => WorkflowError::Io(e),
            source => WorkflowError::RequestFailed {
                context: context.into(),
                source,
            },
        }
    }

    /// True for either side canceling a job run
    pub fn is_canceled(&self) -> bool {
        matches!(
            self,
            WorkflowError::RemoteCanceled { .. } | WorkflowError::LocalCanceled { .. }
        )
    }
}

/// `.step("...")?` on client results
pub(crate) trait StepResultExt<T> {
    fn step(self, context: impl Into<String>) -> Result<T, WorkflowError>;
}

impl<T> StepResultExt<T> for crate::Result<T> {
    fn step(self, context: impl Into<String>) -> Result<T, WorkflowError> {
        self.map_err(|e| WorkflowError::request(context, e))
    }
}

/// File name component of a path, empty when there is none
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First service whose shape equals `shape` exactly
pub(crate) fn find_service<'a>(services: &'a [Service], shape: &str) -> Option<&'a Service> {
    services.iter().find(|service| service.shape == shape)
}

/// Log in up front so a bad password is reported as such
pub(crate) async fn authenticate(client: &DocumentClient) -> Result<(), WorkflowError> {
    client
        .authenticate()
        .await
        .map_err(|e| WorkflowError::AuthFailed {
            message: format!("Failed to authenticate {}: {}", client.session().username(), e),
        })
}

/// Report a failure, then release the session regardless of the outcome
pub(crate) async fn finish<T>(
    client: &DocumentClient,
    reporter: &dyn ProgressReporter,
    result: Result<T, WorkflowError>,
) -> Result<T, WorkflowError> {
    if let Err(e) = &result {
        error!("Workflow failed: {}", e);
        reporter.warn(&e.to_string());
    }

    if !client.release().await {
        warn!("Session release failed");
    }

    result
}
