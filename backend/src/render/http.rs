//! External rendering service client.
//!
//! POSTs `{ "request": ..., "document": ... }` as JSON and takes the response
//! body as the artifact (a PDF for the reference service).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::logs::log_warning;
use crate::error::{RenderError, RenderResult};
use crate::report::{Document, ReportRequest};

use super::Renderer;

/// Default number of attempts per document
const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Delay between attempts in milliseconds
const RETRY_DELAY_MS: u64 = 500;

#[derive(Serialize)]
struct RenderPayload<'a> {
    request: &'a ReportRequest,
    document: &'a Document,
}

/// Error body some renderers return on failure
#[derive(Debug, Deserialize)]
struct RendererErrorBody {
    error: String,
}

/// Client for an HTTP rendering service.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
    url: String,
    max_attempts: u32,
}

impl HttpRenderer {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_render(&self, payload: &RenderPayload<'_>) -> RenderResult<Vec<u8>> {
        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/pdf, application/octet-stream")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            let message = match serde_json::from_slice::<RendererErrorBody>(&body) {
                Ok(err) => err.error,
                Err(_) => text.chars().take(200).collect(),
            };
            return Err(RenderError::Status { status: status.as_u16(), message });
        }

        if body.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(body.to_vec())
    }
}

/// Transport failures and server-side errors are worth another attempt.
fn is_retryable(err: &RenderError) -> bool {
    match err {
        RenderError::Http(_) => true,
        RenderError::Status { status, .. } => *status >= 500,
        _ => false,
    }
}

impl Renderer for HttpRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    async fn render(&self, request: &ReportRequest, document: &Document) -> RenderResult<Vec<u8>> {
        let payload = RenderPayload { request, document };
        let mut attempt = 1;
        loop {
            match self.try_render(&payload).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    log_warning(format!(
                        "Render attempt {}/{} for {} failed: {}",
                        attempt, self.max_attempts, request.school.school_code, e
                    ));
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
