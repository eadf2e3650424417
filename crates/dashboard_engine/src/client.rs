use std::time::Duration;

use dashboard_logging::{dashboard_debug, dashboard_warn};
use url::Url;

use crate::{FailureKind, FetchError, StartAccepted, StartPayload, StatusPayload};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Scheme and authority of the admin backend, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Path under which the parser routes are mounted.
    pub admin_prefix: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            admin_prefix: "admin/parser".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The two admin endpoints the dashboard consumes.
#[async_trait::async_trait]
pub trait AdminClient: Send + Sync {
    /// `POST <prefix>/run/<job>`.
    async fn start_job(&self, job: &str) -> Result<StartAccepted, FetchError>;

    /// `GET <prefix>/status`.
    async fn fetch_status(&self) -> Result<StatusPayload, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestAdminClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestAdminClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, tail: &str) -> Result<Url, FetchError> {
        let mut base = Url::parse(&self.settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let prefix = self.settings.admin_prefix.trim_matches('/');
        let relative = if prefix.is_empty() {
            tail.to_string()
        } else {
            format!("{prefix}/{tail}")
        };
        base.join(&relative)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl AdminClient for ReqwestAdminClient {
    async fn start_job(&self, job: &str) -> Result<StartAccepted, FetchError> {
        let url = self.endpoint(&format!("run/{job}"))?;
        dashboard_debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        // Error statuses may still carry a `{message}` body worth showing.
        let payload = serde_json::from_str::<StartPayload>(&body);

        if !status.is_success() {
            let message = payload
                .ok()
                .and_then(|payload| payload.message)
                .unwrap_or_else(|| status.to_string());
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let payload = payload.map_err(|err| {
            dashboard_warn!("start response for {} is not JSON: {}", job, err);
            FetchError::new(FailureKind::Decode, err.to_string())
        })?;
        if payload.status.as_deref() == Some("started") {
            Ok(StartAccepted {
                message: payload.message,
            })
        } else {
            Err(FetchError::new(
                FailureKind::Rejected,
                payload
                    .message
                    .unwrap_or_else(|| "failed to start the parser".to_string()),
            ))
        }
    }

    async fn fetch_status(&self) -> Result<StatusPayload, FetchError> {
        let url = self.endpoint("status")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
