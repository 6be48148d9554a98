use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::disposition::filename_from_disposition;
use crate::{
    BackendError, ConnectionReport, RunDownload, StatusSnapshot, TemplateUpload, UNKNOWN_ERROR,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const RUN_PATH: &str = "/api/run";
const STATUS_PATH: &str = "/api/status";
const TEST_CONNECTION_PATH: &str = "/api/test-connection";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Prefix for every endpoint, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to `POST /api/run`, which blocks while the document is generated.
    pub run_timeout: Duration,
    /// Applies to status polls and connection tests.
    pub request_timeout: Duration,
    pub max_download_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            run_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(60),
            max_download_bytes: 50 * 1024 * 1024,
        }
    }
}

impl BackendSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// The three calls the dashboard makes against the automation backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `POST /api/run`; resolves once the generated document has been received.
    async fn run(&self, template: Option<TemplateUpload>) -> Result<RunDownload, BackendError>;

    /// `GET /api/status`.
    async fn status(&self) -> Result<StatusSnapshot, BackendError>;

    /// `POST /api/test-connection` for one service key.
    async fn test_connection(&self, service: &str) -> Result<ConnectionReport, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn read_download(&self, response: reqwest::Response) -> Result<Vec<u8>, BackendError> {
        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(BackendError::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(BackendError::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn run(&self, template: Option<TemplateUpload>) -> Result<RunDownload, BackendError> {
        let mut form = Form::new();
        if let Some(upload) = template {
            form = form.part(
                "template",
                Part::bytes(upload.bytes).file_name(upload.file_name),
            );
        }

        let response = self
            .client
            .post(self.settings.endpoint(RUN_PATH))
            .timeout(self.settings.run_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Err(application_error(status.as_u16(), &body));
        }

        let filename = filename_from_disposition(
            response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok()),
        );
        let bytes = self.read_download(response).await?;
        Ok(RunDownload { filename, bytes })
    }

    async fn status(&self) -> Result<StatusSnapshot, BackendError> {
        let response = self
            .client
            .get(self.settings.endpoint(STATUS_PATH))
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn test_connection(&self, service: &str) -> Result<ConnectionReport, BackendError> {
        let form = Form::new().text("service", service.to_string());
        let response = self
            .client
            .post(self.settings.endpoint(TEST_CONNECTION_PATH))
            .timeout(self.settings.request_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        // Failures use the same `{ok, message}` shape, so the status code is not consulted.
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| BackendError::Decode(err.to_string()))
}

fn application_error(status: u16, body: &[u8]) -> BackendError {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => BackendError::Application {
            status,
            message: error_message(&value),
        },
        Err(err) => BackendError::Decode(err.to_string()),
    }
}

/// Picks the first usable of `detail` / `message`, falling back to [`UNKNOWN_ERROR`].
fn error_message(body: &Value) -> String {
    ["detail", "message"]
        .iter()
        .find_map(|field| match body.get(field)? {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::String(_) | Value::Null | Value::Bool(false) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Timeout(err.to_string());
    }
    BackendError::Network(err.to_string())
}
