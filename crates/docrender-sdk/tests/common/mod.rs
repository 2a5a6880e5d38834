//! Shared fixtures for workflow tests
#![allow(dead_code)]

use chrono::Utc;
use docrender_sdk::{ClientBuilder, DocumentClient, DocumentFiles, ProgressReporter};
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const SERVICE_ID: &str = "svc-1";
pub const JOB_ID: &str = "job-9";

/// Collects every reported line
#[derive(Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push(message);
    }

    fn success(&self, message: &str) {
        self.push(message);
    }

    fn warn(&self, message: &str) {
        self.push(message);
    }
}

/// Answers `POST /authenticate` with a token valid for one hour
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "access_token_expires_at": Utc::now() + chrono::Duration::hours(1),
            "refresh_token": "refresh-token",
            "refresh_token_expires_at": Utc::now() + chrono::Duration::days(1),
        })))
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> DocumentClient {
    ClientBuilder::default()
        .base_url(server.uri())
        .credentials("operator", "secret")
        .build()
        .unwrap()
}

/// Document files under `dir`; only the flagged ones are created on disk
pub fn document_files(dir: &Path, shape: bool, script: bool, data: bool) -> DocumentFiles {
    let files = DocumentFiles {
        shape_file: dir.join("invoice.shape"),
        script_file: dir.join("invoice.js"),
        data_file: dir.join("invoice.xml"),
        result_file: dir.join("generated.pdf"),
    };

    if shape {
        std::fs::write(&files.shape_file, b"<shape/>").unwrap();
    }
    if script {
        std::fs::write(&files.script_file, b"function render() {}").unwrap();
    }
    if data {
        std::fs::write(&files.data_file, b"<invoice><total>42</total></invoice>").unwrap();
    }

    files
}

pub fn service_json(id: &str, shape: &str) -> serde_json::Value {
    json!({
        "id": id,
        "type": "merge",
        "shape": shape,
        "active": true,
        "version": "1.0",
        "timestamps": {"created": "2024-03-01T10:00:00Z", "modified": "2024-03-01T10:00:00Z"},
    })
}

pub fn resource_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "content-type": "text/xml",
        "content-length": 36,
    })
}

pub fn job_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "type": "siso",
        "active": true,
        "output": {"name": "generated.pdf", "content-type": "application/pdf"},
        "service_id": SERVICE_ID,
        "status": status,
        "timestamps": {},
    })
}

/// Serves job reads from a fixed status script, repeating the last entry.
/// Optionally cancels a token once a given number of reads was served.
pub struct StatusSequence {
    statuses: Vec<&'static str>,
    calls: AtomicUsize,
    cancel_at: Option<(usize, CancellationToken)>,
}

impl StatusSequence {
    pub fn new(statuses: Vec<&'static str>) -> Self {
        Self {
            statuses,
            calls: AtomicUsize::new(0),
            cancel_at: None,
        }
    }

    pub fn cancel_after(mut self, reads: usize, token: CancellationToken) -> Self {
        self.cancel_at = Some((reads, token));
        self
    }
}

impl Respond for StatusSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let served = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((reads, token)) = &self.cancel_at {
            if served >= *reads {
                token.cancel();
            }
        }

        let index = (served - 1).min(self.statuses.len() - 1);
        ResponseTemplate::new(200).set_body_json(job_json(JOB_ID, self.statuses[index]))
    }
}

/// Mounts job creation, input submission and output download for `JOB_ID`
pub async fn mount_job_endpoints(server: &MockServer, output: &'static [u8]) {
    Mock::given(method("POST"))
        .and(path(format!("/services/{SERVICE_ID}/jobs")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": JOB_ID})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/services/{SERVICE_ID}/jobs/{JOB_ID}/input")))
        .respond_with(ResponseTemplate::new(202))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/services/{SERVICE_ID}/jobs/{JOB_ID}/output")))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(output.to_vec(), "application/pdf"),
        )
        .mount(server)
        .await;
}

/// Number of requests received for a method and path
pub async fn request_count(server: &MockServer, verb: &str, url_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == url_path)
        .count()
}
