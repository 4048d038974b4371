use bytes::Bytes;
use recommender_core::{Analysis, Document, JobCollection, KeywordSet, ServiceError};
use recommender_logging::{rec_debug, rec_info};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode, Url};

use crate::wire::{self, KeywordsRequest};
use crate::{EngineError, GatewaySettings};

const ANALYZE_PATH: &str = "api/analyze/resume";
const KEYWORDS_PATH: &str = "api/keywords";
const JOBS_PATH: &str = "api/jobs";
const HEALTH_PATH: &str = "api/health";

/// Statuses from the analyze endpoint that mean "this document is unusable".
const DOCUMENT_REJECTED: [StatusCode; 3] = [
    StatusCode::BAD_REQUEST,
    StatusCode::UNSUPPORTED_MEDIA_TYPE,
    StatusCode::UNPROCESSABLE_ENTITY,
];

/// The only place that talks to the remote services.
///
/// Every call is a single attempt. Whatever goes wrong comes back as one of the
/// [`ServiceError`] variants.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn analyze_document(&self, document: &Document) -> Result<Analysis, ServiceError>;

    async fn extract_keywords(&self, summary: &str) -> Result<KeywordSet, ServiceError>;

    async fn fetch_jobs(&self, keywords: &KeywordSet) -> Result<JobCollection, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    client: reqwest::Client,
    base_url: Url,
    settings: GatewaySettings,
}

impl ReqwestGateway {
    pub fn new(settings: GatewaySettings) -> Result<Self, EngineError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::HttpClient(err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Probes the service's health endpoint.
    pub async fn health(&self) -> Result<(), ServiceError> {
        let request = self.client.get(self.endpoint(HEALTH_PATH)?);
        let body = self.exchange(request, false).await?;
        wire::parse_health(&body)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|err| ServiceError::validation(format!("bad endpoint {path}: {err}")))
    }

    /// Sends one request and returns the body of a 2xx response.
    async fn exchange(
        &self,
        request: RequestBuilder,
        rejects_document: bool,
    ) -> Result<Bytes, ServiceError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        rec_debug!("{} answered {}", response.url(), status);

        if status.is_success() {
            return response.bytes().await.map_err(map_reqwest_error);
        }

        // The server did answer; a body we cannot read still counts as a rejection.
        let body = response.bytes().await.unwrap_or_default();
        let detail = wire::error_detail(&body);
        if rejects_document && DOCUMENT_REJECTED.contains(&status) {
            return Err(ServiceError::validation(detail));
        }
        Err(ServiceError::server(status.as_u16(), detail))
    }
}

#[async_trait::async_trait]
impl Gateway for ReqwestGateway {
    async fn analyze_document(&self, document: &Document) -> Result<Analysis, ServiceError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(&document.content_type)
            .map_err(|err| {
                ServiceError::validation(format!(
                    "invalid content type {}: {err}",
                    document.content_type
                ))
            })?;
        let form = Form::new().part("file", part);

        rec_info!(
            "Uploading {:?} ({} bytes) for analysis",
            document.file_name,
            document.len()
        );
        let request = self.client.post(self.endpoint(ANALYZE_PATH)?).multipart(form);
        let body = self.exchange(request, true).await?;
        wire::parse_analysis(&body)
    }

    async fn extract_keywords(&self, summary: &str) -> Result<KeywordSet, ServiceError> {
        if summary.trim().is_empty() {
            return Err(ServiceError::validation("cannot extract keywords from an empty summary"));
        }

        let payload = serde_json::to_vec(&KeywordsRequest { summary })
            .map_err(|err| ServiceError::validation(err.to_string()))?;
        let request = self
            .client
            .post(self.endpoint(KEYWORDS_PATH)?)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        let body = self.exchange(request, false).await?;
        wire::parse_keywords(&body)
    }

    async fn fetch_jobs(&self, keywords: &KeywordSet) -> Result<JobCollection, ServiceError> {
        let mut url = self.endpoint(JOBS_PATH)?;
        url.query_pairs_mut()
            .append_pair("keywords", &keywords.to_query())
            .append_pair("rows", &self.settings.job_rows.to_string());

        rec_info!("Searching jobs for {:?}", keywords.to_query());
        let body = self.exchange(self.client.get(url), false).await?;
        wire::parse_jobs(&body)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, EngineError> {
    // Without a trailing slash `join` would replace the last path segment.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized).map_err(|err| EngineError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(EngineError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::unreachable(format!("timed out: {err}"));
    }
    if err.is_decode() {
        return ServiceError::incomplete(err.to_string());
    }
    if err.is_builder() {
        return ServiceError::validation(err.to_string());
    }
    ServiceError::unreachable(err.to_string())
}
