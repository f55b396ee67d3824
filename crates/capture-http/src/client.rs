use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use capture::{
    ApiError, CaptureApi, ContainerId, Process, UploadFile, WorkflowId, WorkflowSnapshot,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::{ClientConfig, ClientConfigError};

/// [`CaptureApi`] over the Capture API's REST routes.
///
/// The Basic credential header and the JSON `Accept` header are built once
/// here and sent with every request. Cloning shares the connection pool.
#[derive(Clone)]
pub struct HttpCaptureApi {
    client: Client,
    base_url: Url,
}

impl HttpCaptureApi {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// [`ClientConfigError`] when the base URL or credentials are unusable or
    /// the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientConfigError> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            basic_credentials(&config.username, &config.password)?,
        );

        let mut builder = Client::builder().default_headers(headers);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// Base URL every route is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Cannot fail: parse_base_url rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl CaptureApi for HttpCaptureApi {
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    async fn upload_file(&self, file: &UploadFile) -> Result<Vec<String>, ApiError> {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = Form::new().part(file.file_name.clone(), part);

        let response = self
            .client
            .post(self.endpoint(&["files"]))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    #[instrument(skip(self))]
    async fn get_workflow(
        &self,
        workflow_id: &WorkflowId,
        container_id: ContainerId,
    ) -> Result<WorkflowSnapshot, ApiError> {
        let container = container_id.to_string();
        let url = self.endpoint(&["portal", &container, "workflow", workflow_id.as_str()]);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    #[instrument(skip(self, process), fields(workflow_id = %process.workflow_id))]
    async fn submit_process(
        &self,
        container_id: ContainerId,
        process: &Process,
    ) -> Result<Process, ApiError> {
        let container = container_id.to_string();
        let url = self.endpoint(&["portal", &container, "process"]);

        let response = self
            .client
            .post(url)
            .json(process)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientConfigError> {
    let invalid = |reason: String| ClientConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("expected an http or https URL".to_string()));
    }
    Ok(url)
}

fn basic_credentials(username: &str, password: &str) -> Result<HeaderValue, ClientConfigError> {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|_| ClientConfigError::InvalidCredentials)?;
    value.set_sensitive(true);
    Ok(value)
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport {
        message: err.to_string(),
    }
}

/// Reads the body of `response`; success bodies are decoded as JSON, failure
/// bodies are returned verbatim.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let retry_after = retry_after(&response);
    let body = response.text().await.map_err(transport_error)?;
    debug!(status = status.as_u16(), bytes = body.len(), "capture api response");

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
            retry_after,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

/// Back-off requested by a 429 or 503 response. Only the delta-seconds form of
/// `Retry-After` is understood; an HTTP-date is ignored.
fn retry_after(response: &Response) -> Option<Duration> {
    if !matches!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    ) {
        return None;
    }
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
