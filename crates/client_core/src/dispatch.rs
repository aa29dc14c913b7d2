use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{
    error::FailureReport,
    protocol::{ConvertResponse, CONVERT_PATH},
};
use tracing::{error, info, warn};
use url::Url;

use crate::{
    error::TransportError, progress::ProgressHandle, render::ResultRenderer,
    request::ConversionRequest,
};

/// What the user ends up seeing for one submission. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Error(FailureReport),
    LinkResult { download_url: String },
    BlobResult { payload: Bytes },
    Acknowledged,
}

impl ConversionOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Status, declared content type and body, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn declares_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(is_json_content_type)
    }
}

pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Json(ConvertResponse),
    Binary(Bytes),
}

/// The single place a response's kind is decided, from its headers.
pub fn classify_response(raw: RawResponse) -> Result<ResponsePayload, TransportError> {
    if raw.declares_json() {
        let decoded: ConvertResponse = serde_json::from_slice(&raw.body)?;
        return Ok(ResponsePayload::Json(decoded));
    }
    if !raw.is_success() {
        return Err(TransportError::Status { status: raw.status });
    }
    if raw.content_type.is_none() {
        warn!("conversion response has no content type; treating it as binary");
    }
    Ok(ResponsePayload::Binary(raw.body))
}

pub fn outcome_from_payload(payload: ResponsePayload) -> ConversionOutcome {
    match payload {
        ResponsePayload::Binary(payload) => ConversionOutcome::BlobResult { payload },
        ResponsePayload::Json(response) => {
            if let Some(message) = response.error.clone().filter(|message| !message.is_empty()) {
                return ConversionOutcome::Error(FailureReport::server(message));
            }
            if !response.is_success() {
                return ConversionOutcome::Error(FailureReport::transport(
                    "unexpected response from server",
                ));
            }
            match response.link() {
                Some(url) => ConversionOutcome::LinkResult {
                    download_url: url.to_string(),
                },
                None => ConversionOutcome::Acknowledged,
            }
        }
    }
}

#[async_trait]
pub trait ConversionTransport: Send + Sync {
    async fn send(&self, request: ConversionRequest) -> Result<RawResponse, TransportError>;
}

pub struct HttpConversionTransport {
    http: Client,
    endpoint: Url,
}

impl HttpConversionTransport {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            http: Client::new(),
            endpoint: endpoint_url(server_url, CONVERT_PATH)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

pub(crate) fn endpoint_url(server_url: &str, path: &str) -> Result<Url, TransportError> {
    Url::parse(server_url)
        .and_then(|base| base.join(path))
        .map_err(|source| TransportError::InvalidEndpoint {
            url: server_url.to_string(),
            source,
        })
}

#[async_trait]
impl ConversionTransport for HttpConversionTransport {
    async fn send(&self, request: ConversionRequest) -> Result<RawResponse, TransportError> {
        let form = request.into_form()?;
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Sends one request per submission and hands its outcome to the renderer.
pub struct ConversionRequestDispatcher {
    transport: Arc<dyn ConversionTransport>,
}

impl ConversionRequestDispatcher {
    pub fn new(transport: Arc<dyn ConversionTransport>) -> Self {
        Self { transport }
    }

    /// No timeout and no abort: a hung request leaves the submission in flight.
    pub async fn send(&self, request: ConversionRequest) -> ConversionOutcome {
        let files = request.total_files;
        let kind = request.kind;
        info!(files, ?kind, "submitting conversion request");
        match self
            .transport
            .send(request)
            .await
            .and_then(classify_response)
        {
            Ok(payload) => outcome_from_payload(payload),
            Err(err) => {
                error!("conversion request failed: {err}");
                ConversionOutcome::Error(FailureReport::transport(err))
            }
        }
    }

    /// Stops the progress readout before rendering, whatever the outcome.
    pub async fn dispatch(
        &self,
        request: ConversionRequest,
        mut progress: ProgressHandle,
        renderer: &ResultRenderer,
        known_total: Option<usize>,
    ) -> ConversionOutcome {
        let outcome = self.send(request).await;
        progress.stop();
        renderer.render(outcome, known_total).await.outcome
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
