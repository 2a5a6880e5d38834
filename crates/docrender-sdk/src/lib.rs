//! # docrender SDK
//!
//! Client for the document rendering API plus the two operator workflows
//! built on it:
//!
//! - [`DocumentClient`]: typed operations on services, resources and jobs,
//!   with transparent login and token renewal
//! - [`workflow::Reconciler`]: publish a shape and keep its resources current
//! - [`workflow::JobRunner`]: render a data file and download the result

pub mod auth;
pub mod client;
pub mod error;
pub mod types;
pub mod workflow;

pub use auth::{AuthSession, AuthToken, Credentials, DEFAULT_RENEWAL_MARGIN};
pub use client::{ClientBuilder, DocumentClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, Result};
pub use types::{Created, Job, JobOutputSpec, JobStatus, Resource, ServerInfo, Service};
pub use workflow::{
    DocumentFiles, JobRunner, PollPolicy, ProgressReporter, Reconciler, TracingReporter,
    WorkflowError,
};
