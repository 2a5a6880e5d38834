//! Configuration management for the docrender CLI
//!
//! Values are layered: built-in defaults, then the TOML file, then
//! `DOCRENDER_` environment variables (`DOCRENDER_API__PASSWORD` sets
//! `api.password`).

use crate::error::{CliError, Result};
use docrender_sdk::{
    ClientBuilder, DocumentClient, DocumentFiles, PollPolicy, DEFAULT_API_URL,
    DEFAULT_TIMEOUT_SECS,
};
use docrender_sdk::workflow::{DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "DOCRENDER_";

/// Folder under the documents directory holding the sample document
pub const EXAMPLES_DIR_NAME: &str = "Document Examples";

const MASKED: &str = "********";

/// CLI configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub api: ApiConfig,
    pub files: FilesConfig,
    pub polling: PollingConfig,
}

/// API endpoint and credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Renew the token this long before it expires
    pub renewal_margin_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            renewal_margin_secs: docrender_sdk::DEFAULT_RENEWAL_MARGIN.as_secs(),
        }
    }
}

/// Local document files. Empty paths mean "use the sample document".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    pub shape_file: PathBuf,
    pub script_file: PathBuf,
    pub data_file: PathBuf,
    pub result_file: PathBuf,
}

/// Job polling budget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

impl CliConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::internal("Failed to determine config directory"))?;
        Ok(config_dir.join("docrender").join("config.toml"))
    }

    /// Load defaults, the TOML file at `path` (if present) and environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| CliError::config(e.to_string()))
    }

    /// Load defaults and the file only; used when the file is written back so
    /// environment secrets never end up on disk
    pub fn load_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration file: {}", path.display());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| CliError::config(e.to_string()))
    }

    /// Save configuration to specific path
    pub async fn save_to_path(&self, path: &Path) -> Result<()> {
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {e}")))?;

        tokio::fs::write(path, content).await?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get configuration value by key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "api.base_url" | "api-url" => self.api.base_url.clone(),
            "api.username" | "username" => self.api.username.clone(),
            "api.password" | "password" => self.api.password.clone(),
            "api.timeout_secs" | "timeout" => self.api.timeout_secs.to_string(),
            "api.renewal_margin_secs" | "renewal-margin" => {
                self.api.renewal_margin_secs.to_string()
            }
            "files.shape_file" | "shape" => display_path(&self.files.shape_file),
            "files.script_file" | "script" => display_path(&self.files.script_file),
            "files.data_file" | "data" => display_path(&self.files.data_file),
            "files.result_file" | "result" => display_path(&self.files.result_file),
            "polling.interval_ms" | "poll-interval" => self.polling.interval_ms.to_string(),
            "polling.max_attempts" | "max-attempts" => self.polling.max_attempts.to_string(),
            _ => {
                return Err(CliError::invalid_argument(format!(
                    "Unknown configuration key: {key}"
                )))
            }
        };
        Ok(value)
    }

    /// Set configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" | "api-url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(CliError::invalid_argument(
                        "API URL must start with http:// or https://",
                    ));
                }
                self.api.base_url = value.to_string();
            }
            "api.username" | "username" => self.api.username = value.to_string(),
            "api.password" | "password" => self.api.password = value.to_string(),
            "api.timeout_secs" | "timeout" => {
                self.api.timeout_secs = parse_positive(value, "Timeout")?;
            }
            "api.renewal_margin_secs" | "renewal-margin" => {
                self.api.renewal_margin_secs = value.parse().map_err(|_| {
                    CliError::invalid_argument("Renewal margin must be a number of seconds")
                })?;
            }
            "files.shape_file" | "shape" => self.files.shape_file = PathBuf::from(value),
            "files.script_file" | "script" => self.files.script_file = PathBuf::from(value),
            "files.data_file" | "data" => self.files.data_file = PathBuf::from(value),
            "files.result_file" | "result" => self.files.result_file = PathBuf::from(value),
            "polling.interval_ms" | "poll-interval" => {
                self.polling.interval_ms = value.parse().map_err(|_| {
                    CliError::invalid_argument("Poll interval must be a number of milliseconds")
                })?;
            }
            "polling.max_attempts" | "max-attempts" => {
                let attempts = parse_positive(value, "Max attempts")?;
                self.polling.max_attempts = u32::try_from(attempts)
                    .map_err(|_| CliError::invalid_argument("Max attempts is too large"))?;
            }
            _ => {
                return Err(CliError::invalid_argument(format!(
                    "Unknown configuration key: {key}"
                )));
            }
        }
        Ok(())
    }

    /// All configuration values by canonical key, password masked
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let password = if self.api.password.is_empty() {
            String::new()
        } else {
            MASKED.to_string()
        };

        BTreeMap::from([
            ("api.base_url".to_string(), self.api.base_url.clone()),
            ("api.username".to_string(), self.api.username.clone()),
            ("api.password".to_string(), password),
            (
                "api.timeout_secs".to_string(),
                self.api.timeout_secs.to_string(),
            ),
            (
                "api.renewal_margin_secs".to_string(),
                self.api.renewal_margin_secs.to_string(),
            ),
            (
                "files.shape_file".to_string(),
                display_path(&self.files.shape_file),
            ),
            (
                "files.script_file".to_string(),
                display_path(&self.files.script_file),
            ),
            (
                "files.data_file".to_string(),
                display_path(&self.files.data_file),
            ),
            (
                "files.result_file".to_string(),
                display_path(&self.files.result_file),
            ),
            (
                "polling.interval_ms".to_string(),
                self.polling.interval_ms.to_string(),
            ),
            (
                "polling.max_attempts".to_string(),
                self.polling.max_attempts.to_string(),
            ),
        ])
    }

    /// Resolve the local document files, falling back to the sample document
    /// when none is configured
    pub fn document_files(&self) -> DocumentFiles {
        let files = &self.files;
        let unset = [
            &files.shape_file,
            &files.script_file,
            &files.data_file,
            &files.result_file,
        ]
        .iter()
        .all(|path| path.as_os_str().is_empty());

        if unset {
            return sample_document_files();
        }

        DocumentFiles {
            shape_file: expand_path(&files.shape_file),
            script_file: expand_path(&files.script_file),
            data_file: expand_path(&files.data_file),
            result_file: expand_path(&files.result_file),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.polling.interval_ms),
            max_attempts: self.polling.max_attempts,
        }
    }

    /// Build a fresh API client from the `api` section
    pub fn client(&self) -> Result<DocumentClient> {
        let client = ClientBuilder::new()
            .base_url(&self.api.base_url)
            .credentials(&self.api.username, &self.api.password)
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .renewal_margin(Duration::from_secs(self.api.renewal_margin_secs))
            .build()?;
        Ok(client)
    }
}

/// `<documents>/Document Examples/invoice.*`
pub fn sample_document_files() -> DocumentFiles {
    let dir = dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(EXAMPLES_DIR_NAME);

    DocumentFiles {
        shape_file: dir.join("invoice.shape"),
        script_file: dir.join("invoice.js"),
        data_file: dir.join("invoice.xml"),
        result_file: dir.join("generated.pdf"),
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(path_str) => PathBuf::from(shellexpand::tilde(path_str).as_ref()),
        None => path.to_path_buf(),
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn parse_positive(value: &str, what: &str) -> Result<u64> {
    let number: u64 = value
        .parse()
        .map_err(|_| CliError::invalid_argument(format!("{what} must be a positive number")))?;
    if number == 0 {
        return Err(CliError::invalid_argument(format!(
            "{what} must be greater than 0"
        )));
    }
    Ok(number)
}
