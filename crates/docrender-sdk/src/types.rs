//! Type definitions for the document API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed service type for document templates
pub const SERVICE_TYPE_MERGE: &str = "merge";

/// Fixed service version sent on creation
pub const SERVICE_VERSION: &str = "1.0";

/// Fixed job type: single input, single output
pub const JOB_TYPE_SISO: &str = "siso";

/// Server identity returned by `GET /`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Creation and modification times of a remote record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Timestamps {
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// A published document template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    /// Base file name of the template the service was created from
    pub shape: String,
    pub active: bool,
    pub version: String,
    pub timestamps: Timestamps,
}

/// Body of `POST /services`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    #[serde(rename = "type")]
    pub service_type: String,
    pub shape: String,
    pub active: bool,
    pub version: String,
}

impl NewService {
    /// Active merge service for the given shape file name
    pub fn merge(shape: impl Into<String>) -> Self {
        Self {
            service_type: SERVICE_TYPE_MERGE.to_string(),
            shape: shape.into(),
            active: true,
            version: SERVICE_VERSION.to_string(),
        }
    }
}

/// A file attached to a service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "content-type")]
    pub content_type: String,
    #[serde(rename = "content-length")]
    pub content_length: u64,
}

/// Expected rendered artifact of a job
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JobOutputSpec {
    pub name: String,
    #[serde(rename = "content-type")]
    pub content_type: String,
}

/// Body of `POST /services/{id}/jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInput {
    #[serde(rename = "type")]
    pub job_type: String,
    pub active: bool,
    pub output: JobOutputSpec,
}

impl JobInput {
    pub fn siso(output_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            job_type: JOB_TYPE_SISO.to_string(),
            active: true,
            output: JobOutputSpec {
                name: output_name.into(),
                content_type: content_type.into(),
            },
        }
    }
}

/// One rendering run against a service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub active: bool,
    pub output: JobOutputSpec,
    pub service_id: String,
    /// Server-owned status string, see [`Job::state`]
    pub status: String,
    pub timestamps: Timestamps,
}

impl Job {
    pub fn state(&self) -> JobStatus {
        JobStatus::from(self.status.as_str())
    }
}

/// Client view of a job status string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Finished,
    Canceled,
    /// Anything the server reports that is not terminal
    InProgress(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::InProgress(_))
    }
}

impl From<&str> for JobStatus {
    fn from(status: &str) -> Self {
        match status {
            "finished" => JobStatus::Finished,
            "canceled" => JobStatus::Canceled,
            other => JobStatus::InProgress(other.to_string()),
        }
    }
}

/// Minimal response of creation calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Created {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_uses_dashed_field_names() {
        let resource: Resource = serde_json::from_value(json!({
            "id": "r1",
            "name": "invoice.xml",
            "content-type": "text/xml",
            "content-length": 512,
        }))
        .unwrap();

        assert_eq!(resource.content_type, "text/xml");
        assert_eq!(resource.content_length, 512);
    }

    #[test]
    fn test_job_input_wire_format() {
        let body =
            serde_json::to_value(JobInput::siso("generated.pdf", "application/pdf")).unwrap();
        assert_eq!(
            body,
            json!({
                "type": "siso",
                "active": true,
                "output": {"name": "generated.pdf", "content-type": "application/pdf"},
            })
        );
    }

    #[test]
    fn test_new_service_wire_format() {
        let body = serde_json::to_value(NewService::merge("invoice.shape")).unwrap();
        assert_eq!(
            body,
            json!({"type": "merge", "shape": "invoice.shape", "active": true, "version": "1.0"})
        );
    }

    #[test]
    fn test_job_status_mapping() {
        assert_eq!(JobStatus::from("finished"), JobStatus::Finished);
        assert_eq!(JobStatus::from("canceled"), JobStatus::Canceled);
        assert_eq!(
            JobStatus::from("Finished"),
            JobStatus::InProgress("Finished".into())
        );
        assert!(!JobStatus::from("queued").is_terminal());
    }

    #[test]
    fn test_service_tolerates_missing_fields() {
        let service: Service = serde_json::from_value(json!({
            "id": "s1",
            "shape": "invoice.shape",
            "timestamps": {"created": "2024-03-01T10:00:00Z"},
        }))
        .unwrap();

        assert_eq!(service.shape, "invoice.shape");
        assert!(service.timestamps.created.is_some());
        assert!(service.timestamps.modified.is_none());
    }
}
