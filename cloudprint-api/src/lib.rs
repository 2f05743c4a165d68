pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::CloudPrintApiError;
use endpoints::{
    jobs::{Job, SubmitJob, SubmitResponse},
    printers::Printer,
};
use repositories::*;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub const BASE_URL: &str = "https://www.google.com/cloudprint";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Client {
    inner: ApiClient,
    http_client: reqwest::Client,
    base_url: String,
    access_token: SecretString,
    timeout: Duration,
}

impl Client {
    pub fn new(access_token: &str) -> Self {
        Self::with_base_url(BASE_URL, access_token)
    }

    pub fn with_base_url(base_url: &str, access_token: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            inner: ApiClient::new(base_url).bearer_auth(access_token),
            http_client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            access_token: SecretString::from(access_token.to_string()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Per-request timeout for job submission
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, CloudPrintApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }

    /// All printers visible to the account, in the order the service lists them
    pub async fn list_printers(&self) -> Result<Vec<Printer>, CloudPrintApiError> {
        let response = self.send(Request::printers().search()).await?;
        tracing::debug!("Listed {} printers", response.printers.len());
        Ok(response.printers)
    }

    pub async fn submit(&self, job: SubmitJob) -> Result<Job, CloudPrintApiError> {
        let url = format!("{}/submit", self.base_url);

        let content = Part::bytes(job.content)
            .file_name(job.file_name)
            .mime_str(&job.content_type)?;
        let form = Form::new()
            .text("printerid", job.printer_id)
            .text("title", job.title)
            .text("ticket", job.ticket)
            .text("contentType", job.content_type)
            .part("content", content);

        let resp = self
            .http_client
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CloudPrintApiError::Status(status.as_u16(), body));
        }

        let data = resp.json::<SubmitResponse>().await?;
        if !data.success {
            return Err(CloudPrintApiError::Rejected(data.message));
        }

        let job = data.job.ok_or_else(|| {
            CloudPrintApiError::Rejected("response did not include a job".to_string())
        })?;
        tracing::info!("Submitted job {}", job.id);
        Ok(job)
    }
}

pub struct Request;

impl Request {
    pub fn new() -> Self {
        Self {}
    }

    pub fn printers() -> PrinterRepository {
        PrinterRepository::new()
    }

    pub fn jobs() -> JobRepository {
        JobRepository::new()
    }
}
