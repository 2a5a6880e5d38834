//! HTTP client for the document API
//!
//! `DocumentClient` exposes one method per remote action on the service,
//! resource and job families. Every protected call first asks the owned
//! [`AuthSession`] for a valid token, so login and renewal are transparent
//! to callers.
//!
//! # Usage
//!
//! ```rust,no_run
//! use docrender_sdk::ClientBuilder;
//!
//! # async fn example() -> docrender_sdk::Result<()> {
//! let client = ClientBuilder::default()
//!     .base_url("https://api.woodston.ee/v1/")
//!     .credentials("operator", "secret")
//!     .build()?;
//!
//! for service in client.list_services().await? {
//!     println!("{} {}", service.id, service.shape);
//! }
//! client.release().await;
//! # Ok(())
//! # }
//! ```

use crate::{
    auth::{AuthSession, Credentials, DEFAULT_RENEWAL_MARGIN},
    error::{ApiError, Result},
    types::{Created, Job, JobInput, NewService, Resource, ServerInfo, Service},
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Default API URL when not specified
pub const DEFAULT_API_URL: &str = "https://api.woodston.ee/v1/";

/// Default timeout in seconds for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 1200;

/// Join a base URI and a relative endpoint path with exactly one slash
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP client for the document API
pub struct DocumentClient {
    http_client: reqwest::Client,
    base_url: String,
    session: AuthSession,
}

impl DocumentClient {
    /// Create a new client (private - use ClientBuilder instead)
    fn new(
        credentials: Credentials,
        timeout: Duration,
        connect_timeout: Option<Duration>,
        renewal_margin: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers);
        if let Some(connect_timeout) = connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http_client = builder.build().map_err(ApiError::HttpClient)?;

        Ok(Self {
            base_url: credentials.base_url.clone(),
            session: AuthSession::new(http_client.clone(), credentials, renewal_margin),
            http_client,
        })
    }

    /// The session backing this client
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ===== Session =====

    /// Log in now (or reuse a valid token)
    pub async fn authenticate(&self) -> Result<()> {
        self.session.ensure().await.map(|_| ())
    }

    /// Best-effort logout, see [`AuthSession::release`]
    pub async fn release(&self) -> bool {
        self.session.release().await
    }

    // ===== Server =====

    /// Fetch server identity
    pub async fn info(&self) -> Result<ServerInfo> {
        self.get("").await
    }

    // ===== Services =====

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        self.get("services").await
    }

    pub async fn get_service(&self, service_id: &str) -> Result<Service> {
        self.get(&format!("services/{service_id}")).await
    }

    /// Create an active merge service for a shape file name
    pub async fn create_service(&self, shape: &str) -> Result<Created> {
        self.post("services", &NewService::merge(shape)).await
    }

    pub async fn delete_service(&self, service_id: &str) -> Result<()> {
        self.delete(&format!("services/{service_id}")).await
    }

    // ===== Resources =====

    pub async fn list_resources(&self, service_id: &str) -> Result<Vec<Resource>> {
        self.get(&format!("services/{service_id}/resources")).await
    }

    /// Upload a local file as a new resource of the service
    pub async fn upload_resource(
        &self,
        service_id: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<()> {
        let path = format!("services/{service_id}/resources");
        self.send_file(Method::POST, &path, file, content_type)
            .await
            .map(|_| ())
    }

    /// Replace the bytes of an existing resource
    pub async fn update_resource(
        &self,
        service_id: &str,
        resource_id: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<()> {
        let path = format!("services/{service_id}/resources/{resource_id}");
        self.send_file(Method::PUT, &path, file, content_type)
            .await
            .map(|_| ())
    }

    pub async fn delete_resource(&self, service_id: &str, resource_id: &str) -> Result<()> {
        self.delete(&format!("services/{service_id}/resources/{resource_id}"))
            .await
    }

    // ===== Jobs =====

    pub async fn list_jobs(&self, service_id: &str) -> Result<Vec<Job>> {
        self.get(&format!("services/{service_id}/jobs")).await
    }

    /// Create a single-input single-output job
    pub async fn create_job(
        &self,
        service_id: &str,
        output_name: &str,
        content_type: &str,
    ) -> Result<Created> {
        let input = JobInput::siso(output_name, content_type);
        self.post(&format!("services/{service_id}/jobs"), &input)
            .await
    }

    /// Read a job, including its current status
    pub async fn read_job(&self, service_id: &str, job_id: &str) -> Result<Job> {
        self.get(&format!("services/{service_id}/jobs/{job_id}"))
            .await
    }

    pub async fn delete_job(&self, service_id: &str, job_id: &str) -> Result<()> {
        self.delete(&format!("services/{service_id}/jobs/{job_id}"))
            .await
    }

    /// Submit a local file as the job's input
    pub async fn submit_job_input(
        &self,
        service_id: &str,
        job_id: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<()> {
        let path = format!("services/{service_id}/jobs/{job_id}/input");
        self.send_file(Method::POST, &path, file, content_type)
            .await
            .map(|_| ())
    }

    /// Stream the job output into `sink`, returning the number of bytes written
    pub async fn fetch_job_output<W>(
        &self,
        service_id: &str,
        job_id: &str,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let path = format!("services/{service_id}/jobs/{job_id}/output");
        let request = self
            .http_client
            .get(join_url(&self.base_url, &path))
            .header(ACCEPT, "*/*");
        let request = self.apply_auth(request).await?;

        debug!("GET /{}", path);
        let response = request.send().await.map_err(ApiError::HttpClient)?;
        let mut response = self.check_status(response, &path).await?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(ApiError::HttpClient)? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        debug!("Received {} bytes of output for job {}", written, job_id);
        Ok(written)
    }

    // ===== Private Helper Methods =====

    /// Apply authentication to request
    async fn apply_auth(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.ensure().await?;
        Ok(request.header("Authorization", format!("Bearer {}", token)))
    }

    /// Generic GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http_client.get(join_url(&self.base_url, path));
        let request = self.apply_auth(request).await?;

        debug!("GET /{}", path);
        let response = request.send().await.map_err(ApiError::HttpClient)?;
        self.handle_response(response, path).await
    }

    /// Generic POST request
    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self
            .http_client
            .post(join_url(&self.base_url, path))
            .json(body);
        let request = self.apply_auth(request).await?;

        debug!("POST /{}", path);
        let response = request.send().await.map_err(ApiError::HttpClient)?;
        self.handle_response(response, path).await
    }

    /// Generic DELETE request without body
    async fn delete(&self, path: &str) -> Result<()> {
        let request = self.http_client.delete(join_url(&self.base_url, path));
        let request = self.apply_auth(request).await?;

        debug!("DELETE /{}", path);
        let response = request.send().await.map_err(ApiError::HttpClient)?;
        self.check_status(response, path).await.map(|_| ())
    }

    /// Send a whole local file as the raw request body
    async fn send_file(
        &self,
        method: Method,
        path: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<Response> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let request = self
            .http_client
            .request(method.clone(), join_url(&self.base_url, path))
            .header(CONTENT_TYPE, content_type)
            .header(
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            )
            .body(bytes);
        let request = self.apply_auth(request).await?;

        debug!("{} /{} ({})", method, path, file_name);
        let response = request.send().await.map_err(ApiError::HttpClient)?;
        self.check_status(response, path).await
    }

    /// Handle successful response
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        path: &str,
    ) -> Result<T> {
        let response = self.check_status(response, path).await?;
        let body = response.bytes().await.map_err(ApiError::HttpClient)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Pass 2xx responses through, turn everything else into an error
    async fn check_status(&self, response: Response, path: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        debug!("/{} answered {}: {}", path, status, error_text);

        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                resource: format!("/{path}"),
            }),
            _ => Err(ApiError::RequestFailed {
                status,
                message: error_text,
            }),
        }
    }
}

/// Builder for constructing a DocumentClient with custom configuration
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    renewal_margin: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the API
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the Basic credentials used to obtain tokens
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Renew tokens this long before they expire
    pub fn renewal_margin(mut self, margin: Duration) -> Self {
        self.renewal_margin = Some(margin);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DocumentClient> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let username = self
            .username
            .filter(|username| !username.is_empty())
            .ok_or_else(|| ApiError::InvalidRequest {
                message: "A username is required, use credentials()".into(),
            })?;
        let credentials = Credentials::new(base_url, username, self.password.unwrap_or_default());

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        DocumentClient::new(
            credentials,
            timeout,
            self.connect_timeout,
            self.renewal_margin.unwrap_or(DEFAULT_RENEWAL_MARGIN),
        )
    }
}
